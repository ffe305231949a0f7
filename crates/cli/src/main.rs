use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "inventory-chat")]
#[command(about = "Inventory chat assistant with policy-checked database actions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chat HTTP API
    Serve {
        #[arg(short, long, default_value = "37778")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Create or update the database tables
    Migrate,
    /// Print the schema snapshot given to the model
    Schema,
    /// Print the prompt built for a message
    Prompt {
        /// Username the prompt is built for
        #[arg(short, long)]
        user: String,
        /// Build the prompt for an admin
        #[arg(long)]
        admin: bool,
        text: String,
    },
}

pub(crate) fn get_database_url() -> Result<String> {
    std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable must be set"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Schema => commands::schema::run().await?,
        Commands::Prompt { user, admin, text } => commands::prompt::run(&user, admin, &text).await?,
    }

    Ok(())
}
