use clap::Parser;
use sortcopy::config::{Cli, Command};
use sortcopy::Config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status after a Ctrl-C stop, as shells report SIGINT
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Organize(args) => {
            init_tracing(args.verbose);

            // Convert CLI args to Config - this validates immediately
            let config = Config::try_from(args)?;
            let report = sortcopy::commands::organize::run(config)?;

            println!("{}", report.render());
            if report.is_cancelled() {
                return Ok(ExitCode::from(EXIT_INTERRUPTED));
            }
        }
        Command::Check(paths) => {
            init_tracing(0);
            sortcopy::commands::check::run(&paths.source, &paths.destination)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// `RUST_LOG` wins; otherwise `-v` raises the default from warn.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
