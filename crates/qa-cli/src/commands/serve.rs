//! Web server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use qa_core::auth::TokenService;
use qa_core::config::{Config, CorsPolicy};
use qa_web::AppState;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "8000", env = "QA_PORT")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "QA_HOST")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (with --log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let ip: IpAddr = args
        .host
        .parse()
        .with_context(|| format!("invalid host address '{}'", args.host))?;
    let addr = SocketAddr::new(ip, args.port);

    let pool = Arc::new(qa_db::init_pool(&config.database_path)?);
    let tokens = TokenService::new(&config.secret_key, config.access_token_minutes);
    let state = AppState::new(pool, tokens);

    println!();
    println!("  {} {}", "Q&A Dashboard".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}        http://{}", "API".green(), addr);
    println!("  {}  ws://{}/ws", "WebSocket".green(), addr);
    println!("  {}   {}", "Database".green(), config.database_path.display());
    match &config.cors {
        CorsPolicy::AllowAll => {
            println!("  {}       {}", "CORS".green(), "any origin".yellow())
        }
        CorsPolicy::Origins(origins) => {
            println!("  {}       {}", "CORS".green(), origins.join(", "))
        }
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    qa_web::run_server(state, &config.cors, addr).await
}
