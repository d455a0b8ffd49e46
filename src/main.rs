use clap::Parser;
use miette::Result;
use tint::cli::{Cli, Commands};
use tint::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new(cli.quiet);
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Apply(args) => tint::cli::apply::run(args, config, &printer)?,
        Commands::Presets(args) => tint::cli::presets::run(args, config, &printer)?,
        Commands::Init(args) => tint::cli::init::run(args, &printer)?,
        Commands::Completions(args) => tint::cli::completions::run(args)?,
    }

    Ok(())
}
