//! Auth Demo - mock JWT authentication API
//! Mission: Show the login → token → protected route flow end to end

use anyhow::{Context, Result};
use authdemo_backend::{auth::PasswordVerifier, build_router, config, AppState, Config};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "authdemo")]
#[command(about = "Mock JWT authentication API with avatar uploads")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Bind address, overrides HOST
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print a bcrypt hash for a password
    HashPassword {
        password: String,

        #[arg(long, env = "BCRYPT_COST", default_value = "10")]
        cost: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_env();
    init_tracing();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::HashPassword { password, cost } => {
            let hash = PasswordVerifier::new(cost)?.hash(&password).await?;
            println!("{}", hash);
            Ok(())
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!("🚀 Auth API Demo starting");
    info!("📝 Environment: {}", config.app_env);

    let state = AppState::from_config(&config).await?;
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);
    info!("🔐 Test credentials: admin / admin");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authdemo_backend=debug,authdemo=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
