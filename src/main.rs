use std::io::BufRead;

use dice_expression::roll;
use log::error;

/// Rolls the notation given as arguments, or every line of stdin when there are none.
fn main() {
    pretty_env_logger::init();

    let notation = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !notation.is_empty() {
        println!("{}", roll(&notation));
        return;
    }

    for line in std::io::stdin().lock().lines() {
        match line {
            Ok(line) => println!("{}", roll(&line)),
            Err(err) => {
                error!("could not read from stdin: {err}");
                std::process::exit(1);
            }
        }
    }
}
