use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use product_service::auth::issue_token;
use product_service::config::AppConfig;
use product_service::{app, AppState};

#[derive(Parser)]
#[command(name = "product-service", version, about = "Product catalog microservice")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Interface to bind")]
        host: Option<String>,
        #[arg(long, short, help = "Port to listen on")]
        port: Option<u16>,
    },

    #[command(about = "Mint a bearer token signed with the configured secret")]
    Token {
        #[arg(help = "Token subject (becomes the principal name)")]
        subject: String,
        #[arg(long, value_delimiter = ',', help = "Comma-separated roles")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up SECURITY_JWT_SECRET etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_service=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Token { subject, roles } => {
            let token = issue_token(&config.security, &subject, roles)?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting product-service in {:?} mode", config.environment);
    if !config.security.auth_enabled {
        tracing::warn!("Authentication is disabled; every request is accepted");
    }

    let bind_addr = config.bind_addr();
    let state = AppState::new(config).context("failed to build authentication chain")?;
    tracing::info!(
        products = state.products.store().size(),
        authenticators = ?state.auth.names(),
        "Catalog ready"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("product-service listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
