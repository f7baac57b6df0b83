use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "company-research", version, about = "Multi-source company research report generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Research one company and write the markdown report to disk
    Research(ResearchArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8000")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// YAML configuration overlay
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ResearchArgs {
    /// Company domain, e.g. example.com
    #[arg(short, long)]
    pub domain: String,

    /// Directory for the markdown report
    #[arg(short, long, default_value = "./results")]
    pub output: String,

    /// YAML configuration overlay
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to the YAML configuration file
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_research() {
        let cli = Cli::parse_from(["company-research", "-v", "research", "--domain", "acme.com"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Research(args) => {
                assert_eq!(args.domain, "acme.com");
                assert_eq!(args.output, "./results");
                assert!(args.config.is_none());
            }
            _ => panic!("expected research command"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["company-research", "serve"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 8000);
                assert_eq!(args.host, "0.0.0.0");
            }
            _ => panic!("expected serve command"),
        }
    }
}
