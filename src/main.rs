mod cli;

use clap::Parser;
use cli::Cli;
use dispute_ledger::logger::Logger;

fn main() {
    let cli = Cli::parse();

    match cli::run(cli) {
        Ok(()) => {}
        Err(e) => {
            Logger::error(&e.to_string());
            std::process::exit(1);
        }
    }
}
