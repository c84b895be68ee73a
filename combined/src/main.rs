//! User API server binary.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth_service_lib::{AuthServiceConfig, Authenticator, LogResetTokenSender, TokenIssuer};
use gateway_lib::{AppState, GatewayConfig};
use user_service_lib::config::{StorageBackend, UserServiceConfig};
use user_service_lib::service::UserManager;

#[derive(Parser)]
#[command(name = "user-api")]
#[command(about = "User management REST API with JWT authentication")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind host (default: SERVER_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (default: SERVER_PORT, PORT or 8080)
        #[arg(long)]
        port: Option<u16>,
        /// Use the in-memory store regardless of STORAGE_BACKEND
        #[arg(long)]
        in_memory: bool,
    },
    /// Manage database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables and run all migrations
    Fresh,
}

impl From<MigrateAction> for user_service_lib::MigrateAction {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => Self::Up,
            MigrateAction::Down => Self::Down,
            MigrateAction::Status => Self::Status,
            MigrateAction::Fresh => Self::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => serve(host, port, in_memory).await?,
        Commands::Migrate { action } => {
            let config = UserServiceConfig::from_env();
            user_service_lib::run_migrations(&config.database, action.into()).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let gateway_config = GatewayConfig::from_env().with_host(host).with_port(port);
    let auth_config = AuthServiceConfig::from_env()?;

    let mut user_config = UserServiceConfig::from_env();
    if in_memory {
        user_config.storage = StorageBackend::Memory;
    }

    let storage = user_service_lib::connect_storage(&user_config).await?;
    info!(backend = %storage.backend, "Storage initialised");

    let user_service = Arc::new(UserManager::new(storage.repository.clone()));
    let auth_service = Arc::new(
        Authenticator::new(
            storage.repository,
            TokenIssuer::from_config(&auth_config.jwt),
            Arc::new(LogResetTokenSender),
        )
        .with_reset_ttl(auth_config.password_reset_ttl()),
    );

    gateway_lib::run_server(&gateway_config, AppState::new(user_service, auth_service)).await
}
