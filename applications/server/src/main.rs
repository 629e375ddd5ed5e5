/// Maria Server - user management service
use clap::{Parser, Subcommand};
use maria_core::NewUserRequest;
use maria_server::{api, config::ServerConfig, services::UserManager, state::AppState, UserService};
use maria_storage::SqliteUserStore;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "maria-server")]
#[command(about = "User management HTTP service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a new user
    AddUser {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Login name
        #[arg(short, long)]
        user_name: String,
        /// Display alias
        #[arg(short, long)]
        alias: String,
        /// Contact address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "maria_server=info,maria_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config.as_deref()).await?;
        }
        Commands::AddUser {
            config,
            user_name,
            alias,
            email,
        } => {
            let request = NewUserRequest::new(user_name, alias, email);
            add_user(config.as_deref(), &request).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path)?;
    config.validate()?;

    tracing::info!("Starting Maria Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let store = open_store(&config).await?;
    tracing::info!("Database connected");

    let users = Arc::new(UserService::new(store));
    let app = api::router(AppState::new(users));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config_path: Option<&Path>, request: &NewUserRequest) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path)?;
    config.validate()?;

    if let Err(missing) = request.validate() {
        anyhow::bail!("invalid user: {}", missing.replace('\n', ", "));
    }

    let store = open_store(&config).await?;
    let user = UserService::new(store).create_user(request).await?;

    println!("{}", serde_json::to_string_pretty(&user)?);

    Ok(())
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteUserStore> {
    if let Some(dir) = database_dir(&config.storage.database_url) {
        tokio::fs::create_dir_all(dir).await?;
    }

    let store =
        SqliteUserStore::connect(&config.storage.database_url, config.storage.max_connections)
            .await?;
    Ok(store)
}

/// Parent directory of a file-backed `SQLite` URL
fn database_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;

    if path.is_empty() || path == ":memory:" {
        return None;
    }

    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}
