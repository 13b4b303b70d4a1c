//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;

use acty_core::{config, logging};

mod commands;
mod navigator;

#[derive(Parser)]
#[command(name = "acty")]
#[command(version)]
#[command(about = "Track activities against an acty API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// API base URL (overrides config.toml)
    #[arg(long, global = true, env = config::API_URL_ENV, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Signin {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out (clear the stored session token)
    Signout,

    /// Create an account
    Register,

    /// Manage activities
    Activities {
        #[command(subcommand)]
        command: ActivityCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ActivityCommands {
    /// Lists activities
    List,
    /// Adds an activity
    Add {
        /// What the activity is
        #[arg(short, long)]
        content: String,
        /// When it happens (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Updates an activity (partial update)
    Edit {
        /// The ID of the activity to edit
        #[arg(value_name = "ID")]
        id: String,
        #[arg(short, long)]
        content: String,
        #[arg(short, long)]
        date: String,
    },
    /// Replaces an activity (full update)
    Replace {
        /// The ID of the activity to replace
        #[arg(value_name = "ID")]
        id: String,
        #[arg(short, long)]
        content: String,
        #[arg(short, long)]
        date: String,
    },
    /// Deletes an activity
    Delete {
        /// The ID of the activity to delete
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let ctx = commands::Context::new(config, cli.api_url);

    // default to the activity list
    let Some(command) = cli.command else {
        return commands::activities::list(&ctx).await;
    };

    match command {
        Commands::Signin { username, password } => {
            commands::auth::signin(&ctx, username, password).await
        }
        Commands::Signout => commands::auth::signout(&ctx),
        Commands::Register => commands::auth::register(),

        Commands::Activities { command } => match command {
            ActivityCommands::List => commands::activities::list(&ctx).await,
            ActivityCommands::Add { content, date } => {
                commands::activities::add(&ctx, content, date).await
            }
            ActivityCommands::Edit { id, content, date } => {
                commands::activities::edit(&ctx, &id, content, date).await
            }
            ActivityCommands::Replace { id, content, date } => {
                commands::activities::replace(&ctx, &id, content, date).await
            }
            ActivityCommands::Delete { id } => commands::activities::delete(&ctx, &id).await,
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
