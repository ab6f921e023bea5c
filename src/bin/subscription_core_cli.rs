use std::{env, process};

use subscription_core::{cli::output, cli::run_cli, init};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = run_cli(&args) {
        output::error(err);
        process::exit(1);
    }
}
