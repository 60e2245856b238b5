use clap::Parser;

use portal_app::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = portal_app::platform::run_app(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
