// idforge CLI entry point

use clap::Parser;
use idforge_cli::{
    output,
    router::{Cli, CommandRouter},
};

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = CommandRouter::run(cli) {
        output::print_error(&e.report(verbose));
        std::process::exit(1);
    }
}
