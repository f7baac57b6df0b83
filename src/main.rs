use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use company_research::{cli, config, errors};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::Research(args) => cli::research::handle_research(args).await,
        cli::Commands::Validate(args) => handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            errors::ResearchError::Config(_) => 2,
            errors::ResearchError::InvalidRequest(_) => 3,
            errors::ResearchError::Upstream(_) => 4,
            errors::ResearchError::Synthesis(_) => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), errors::ResearchError> {
    let config = config::load_config(Some(Path::new(&args.config))).await?;
    println!("Configuration is valid: {}", args.config);
    println!("  results dir: {}", config.results_dir.display());
    println!("  llm provider: {}", config.llm.provider);
    Ok(())
}
