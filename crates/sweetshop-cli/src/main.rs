mod commands;

use clap::{Args, Parser, Subcommand};
use commands::ClientContext;
use std::path::PathBuf;
use std::time::Duration;
use sweetshop_client::{ALL_CATEGORIES, Filters, SweetCatalog};
use sweetshop_core::api_types::CreateSweetRequest;
use sweetshop_core::{Price, Role, SweetId, SweetPatch};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sweetshop", version, about = "Sweet Shop terminal client and operator tools")]
struct Cli {
    /// Base URL of the REST API
    #[arg(long, global = true, env = "SWEETSHOP_API", default_value = "http://localhost:8080/api")]
    api: String,

    /// Where the login session is kept (default: ~/.sweetshop/session.json)
    #[arg(long, global = true, env = "SWEETSHOP_TOKEN_FILE")]
    session_file: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account (role `user`)
    Register {
        username: String,
        /// Read from stdin when omitted
        #[arg(long, env = "SWEETSHOP_PASSWORD")]
        password: Option<String>,
    },

    /// Log in and save the session token
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long, env = "SWEETSHOP_PASSWORD")]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// List every sweet
    List,

    /// Search by name, category and price range
    Search {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Interactive search: each line typed replaces the name filter
    Browse {
        #[command(flatten)]
        filters: FilterArgs,

        /// Quiet period before a typed query is sent
        #[arg(long, default_value_t = 300)]
        delay_ms: u64,
    },

    /// Show one sweet
    Show { id: SweetId },

    /// Purchase a sweet
    Buy {
        id: SweetId,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },

    /// Add a sweet (admin)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: Price,
        #[arg(long)]
        quantity: u32,
    },

    /// Change fields of a sweet (admin)
    Edit {
        id: SweetId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<Price>,
        #[arg(long)]
        quantity: Option<u32>,
    },

    /// Delete a sweet (admin)
    Remove { id: SweetId },

    /// Add stock to a sweet (admin)
    Restock {
        id: SweetId,
        #[arg(long, short)]
        quantity: u32,
    },

    /// Insert the sample catalog directly into the database
    Seed {
        #[command(flatten)]
        db: DatabaseArgs,

        /// Insert even when the inventory is not empty
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Set a user's role directly in the database
    Promote {
        username: String,

        #[arg(long, default_value = "admin")]
        role: Role,

        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// Token signing key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new signing keypair
    Generate {
        /// Directory for private.key / public.key; prints to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Case-insensitive part of the name
    #[arg(long)]
    name: Option<String>,

    /// Exact category; "All" means any
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    min_price: Option<Price>,

    #[arg(long)]
    max_price: Option<Price>,
}

impl From<FilterArgs> for Filters {
    fn from(args: FilterArgs) -> Self {
        Filters {
            name: args.name.unwrap_or_default(),
            category: args.category.filter(|c| c != ALL_CATEGORIES),
            min_price: args.min_price,
            max_price: args.max_price,
        }
    }
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    /// SQLite file used by the server
    #[arg(long = "database", env = "SWEETSHOP_DATABASE_PATH", default_value = "data/sweetshop.sqlite")]
    path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = ClientContext::new(cli.api, cli.session_file, cli.json);

    match cli.cmd {
        Command::Register { username, password } => {
            commands::account::register(&ctx, &username, password).await?
        }
        Command::Login { username, password } => {
            commands::account::login(&ctx, &username, password).await?
        }
        Command::Logout => commands::account::logout(&ctx)?,

        Command::List => commands::shop::list(&ctx).await?,
        Command::Search { filters } => commands::shop::search(&ctx, filters.into()).await?,
        Command::Browse { filters, delay_ms } => {
            let mut catalog = SweetCatalog::new(ctx.authenticated()?);
            catalog.set_filters(filters.into());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            commands::browse::browse(
                &mut catalog,
                stdin,
                Duration::from_millis(delay_ms),
                &mut std::io::stdout(),
            )
            .await?;
        }
        Command::Show { id } => commands::shop::show(&ctx, id).await?,
        Command::Buy { id, quantity } => commands::shop::buy(&ctx, id, quantity).await?,

        Command::Add {
            name,
            category,
            price,
            quantity,
        } => {
            let request = CreateSweetRequest {
                name: Some(name),
                category: Some(category),
                price: Some(price),
                quantity: Some(quantity),
            };
            commands::shop::add(&ctx, request).await?
        }
        Command::Edit {
            id,
            name,
            category,
            price,
            quantity,
        } => {
            let patch = SweetPatch {
                name,
                category,
                price,
                quantity,
            };
            commands::shop::edit(&ctx, id, patch).await?
        }
        Command::Remove { id } => commands::shop::remove(&ctx, id).await?,
        Command::Restock { id, quantity } => commands::shop::restock(&ctx, id, quantity).await?,

        Command::Seed { db, force } => {
            commands::seed::seed(&db.path, force).await?;
        }
        Command::Promote { username, role, db } => {
            commands::promote::promote(&db.path, &username, role).await?;
        }
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },
    }

    Ok(())
}
