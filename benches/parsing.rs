use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dice_expression::{Dice, Expression, Faces, RollOptions};
use rand::{rngs::StdRng, SeedableRng};

pub fn benchmark_parsing(c: &mut Criterion) {
    c.bench_function("parse cursed dice", |b| {
        b.iter(|| Expression::parse(black_box("999d444")))
    });
    c.bench_function("parse multiple expressions", |b| {
        b.iter(|| Expression::parse(black_box("10d6r1 + 3dF - 100d20kh2r<3 + 100 for damage")))
    });
    c.bench_function("parse special", |b| {
        b.iter(|| Expression::parse(black_box("katamari")))
    });
}

pub fn benchmark_rolling(c: &mut Criterion) {
    c.bench_function("roll cursed dice", |b| {
        b.iter(|| {
            let dice = Dice::new(999, Faces::Standard(444), RollOptions::default());
            let mut rng = StdRng::seed_from_u64(1);
            dice.roll_all_with(&mut rng);
        });
    });
    c.bench_function("roll rerolling dice", |b| {
        b.iter(|| {
            let dice = Dice::new(1000, Faces::Standard(6), RollOptions::parse("r<6"));
            let mut rng = StdRng::seed_from_u64(1);
            dice.roll_all_with(&mut rng);
        });
    });
    c.bench_function("roll expression", |b| {
        let expression = Expression::parse("10d6r1 + 3dF - 100d20kh2r<3 + 100");
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| expression.roll_with(&mut rng));
    });
}

criterion_group!(benches, benchmark_parsing, benchmark_rolling);
criterion_main!(benches);
