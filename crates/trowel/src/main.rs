//! Thin binary: the CLI lives in `src/cli/`, this file only invokes
//! [`cli::run`] and turns an error into a nonzero exit.

mod cli;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("{} {}", console::style("error:").red().bold(), err);
        std::process::exit(1);
    }
}
