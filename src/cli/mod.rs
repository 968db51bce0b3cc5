pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(about = "Inkwell CLI - Operations interface for the blogging platform API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply the database schema (idempotent)")]
    Init,

    #[command(about = "Run the API server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides configuration)")]
        port: Option<u16>,
    },

    #[command(about = "Check API database connectivity")]
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Init => commands::init::handle(output_format).await,
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Health => commands::health::handle(output_format).await,
    }
}
