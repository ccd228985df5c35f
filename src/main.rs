//! Docquery CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docquery::cli::{self, Cli, Commands};
use docquery::domain::models::Config;
use docquery::infrastructure::config::ConfigLoader;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_ref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = run(&cli, &config).await;

    if let Err(err) = result {
        cli::handle_error(&err, cli.json);
    }
}

async fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Ingest { file } => {
            let services = cli::build_services(config, None)?;
            cli::commands::ingest::execute(&services, file, cli.json).await
        }
        Commands::Query {
            question,
            file,
            top_k,
        } => {
            let services = cli::build_services(config, *top_k)?;
            cli::commands::query::execute(&services, question, file.as_deref(), cli.json).await
        }
        Commands::Stats => {
            let services = cli::build_services(config, None)?;
            cli::commands::stats::execute(&services, config, cli.json).await
        }
    }
}
