use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use prakriti_server::{QuestionsConfig, ServiceConfig, ServiceState, StorageConfig, serve};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StorageMode {
    Auto,
    Memory,
    Postgres,
    Supabase,
}

#[derive(Debug, Parser)]
#[command(name = "prakritid", version, about = "Prakriti questionnaire HTTP service")]
struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "127.0.0.1:3000", env = "PRAKRITI_LISTEN")]
    listen: SocketAddr,
    /// Response store backend. `auto` picks postgres when a database url is
    /// configured, else supabase when its url and key are set, else memory.
    #[arg(long, value_enum, default_value_t = StorageMode::Auto, env = "PRAKRITI_STORAGE")]
    storage: StorageMode,
    /// PostgreSQL url for response persistence.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Max PostgreSQL pool connections.
    #[arg(long, default_value_t = 5, env = "PRAKRITI_PG_MAX_CONNECTIONS")]
    pg_max_connections: u32,
    /// Supabase project url.
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,
    /// Supabase anon key.
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    supabase_key: Option<String>,
    /// JSON file replacing the built-in questions.
    #[arg(long, env = "PRAKRITI_QUESTIONS")]
    questions: Option<PathBuf>,
}

fn resolve_storage(cli: &Cli) -> anyhow::Result<StorageConfig> {
    let supabase = match (&cli.supabase_url, &cli.supabase_key) {
        (Some(url), Some(key)) => Some(StorageConfig::supabase(url, key)),
        _ => None,
    };

    let storage = match cli.storage {
        StorageMode::Memory => StorageConfig::Memory,
        StorageMode::Postgres => {
            let database_url = cli.database_url.clone().ok_or_else(|| {
                anyhow::anyhow!("storage=postgres requires --database-url or DATABASE_URL")
            })?;
            StorageConfig::postgres(database_url, cli.pg_max_connections)
        }
        StorageMode::Supabase => supabase.ok_or_else(|| {
            anyhow::anyhow!(
                "storage=supabase requires --supabase-url/SUPABASE_URL and --supabase-key/SUPABASE_ANON_KEY"
            )
        })?,
        StorageMode::Auto => {
            if let Some(database_url) = cli.database_url.clone() {
                StorageConfig::postgres(database_url, cli.pg_max_connections)
            } else {
                supabase.unwrap_or(StorageConfig::Memory)
            }
        }
    };

    Ok(storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "prakriti_server=info,prakriti=info,info".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let storage = resolve_storage(&cli)?;
    info!(backend = storage.label(), "storage resolved");
    let questions = cli
        .questions
        .clone()
        .map(QuestionsConfig::File)
        .unwrap_or_default();

    let state = ServiceState::bootstrap(ServiceConfig { storage, questions }).await?;

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!("prakriti-server listening on {}", listener.local_addr()?);
    serve(listener, state).await?;

    Ok(())
}
