use clap::Parser;
use pmanager::cli::{Cli, Commands};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => pmanager::cli::commands::init::execute(&cli, force),
        Commands::Add { ref site } => pmanager::cli::commands::add::execute(&cli, site.as_deref()),
        Commands::Read { ref site, print } => {
            pmanager::cli::commands::read::execute(&cli, site.as_deref(), print)
        }
        Commands::Delete { ref site, force } => {
            pmanager::cli::commands::delete::execute(&cli, site.as_deref(), force)
        }
    };

    if let Err(e) = result {
        pmanager::cli::output::error(&e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `PMANAGER_LOG` (default: warn).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env("PMANAGER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
