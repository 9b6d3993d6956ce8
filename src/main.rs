use clap::Parser;
use element_locator::cli::commands::{cmd_context, cmd_locate, cmd_suggest};
use element_locator::cli::config::{Cli, Commands, load_config};
use element_locator::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let tracer = TraceLogger::from_option(cli.trace.as_deref());

    if cli.verbose > 1 {
        eprintln!("Config: {:?}", config.limits);
    }

    match cli.command {
        Commands::Locate {
            snapshot,
            index,
            interactive,
            prefer_identifier,
            format,
        } => {
            cmd_locate(
                &snapshot,
                index,
                interactive,
                prefer_identifier,
                &format,
                &config,
                &tracer,
                cli.verbose,
            )?;
        }
        Commands::Context { snapshot, index } => {
            cmd_context(&snapshot, index, cli.verbose)?;
        }
        Commands::Suggest {
            snapshot,
            index,
            format,
        } => {
            cmd_suggest(&snapshot, index, &format, &config, &tracer, cli.verbose)?;
        }
    }

    Ok(())
}
