use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront::api::{create_routes, AppState};
use storefront::auth::{BcryptHasher, JwtService, TokenIssuer};
use storefront::config::{rollback_migrations, run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use storefront::repositories::{PgProductRepository, PgUserRepository};
use storefront::services::{ProductService, UserService};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "User and product CRUD service over REST and GraphQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending migrations
    Migrate,
    /// Revert all migrations
    Rollback,
    /// Load seed data from a directory of JSON files
    Seed {
        #[arg(long, default_value = "seeds")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let pool = DatabaseConfig::from_env()?.create_pool().await?;
    let hasher = BcryptHasher::new(config.bcrypt_cost);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool, hasher).await,
        Command::Migrate => run_migrations(&pool).await,
        Command::Rollback => rollback_migrations(&pool).await,
        Command::Seed { dir } => DatabaseSeeder::new(pool, &hasher, dir).seed_all().await,
    }
}

async fn serve(config: AppConfig, pool: sqlx::PgPool, hasher: BcryptHasher) -> Result<()> {
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtService::new(&config.jwt_secret).with_expiry(
        chrono::Duration::minutes(config.access_ttl_minutes),
        chrono::Duration::days(config.refresh_ttl_days),
    ));

    let users = UserService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(hasher),
        tokens.clone(),
    );
    let products = ProductService::new(Arc::new(PgProductRepository::new(pool)));

    let app = create_routes(AppState::new(users, products, tokens));

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(environment = %config.environment, "storefront listening on http://{}", address);
    info!("GraphQL playground at http://{}/playground", address);

    axum::serve(listener, app).await?;
    Ok(())
}
