use anyhow::Result;
use tracing::level_filters::LevelFilter;

use shooter_recipes::config::ServerConfig;
use shooter_recipes::logging::init_logging;
use shooter_recipes::server::start_server;

fn print_help() {
    eprintln!("Shooter recipes server");
    eprintln!();
    eprintln!("Usage: shooters-server [--bind <ADDR>] [--port <PORT>] [--data-file <PATH>] [--log-dir <DIR>]");
    eprintln!("  --bind <ADDR>       Address to listen on (default 127.0.0.1, env SHOOTERS_BIND)");
    eprintln!("  --port <PORT>       Port to listen on (default 5000, env SHOOTERS_PORT)");
    eprintln!("  --data-file <PATH>  JSON document to serve (default ./data.json, env SHOOTERS_DATA_FILE)");
    eprintln!("  --log-dir <DIR>     Write daily log files here instead of stderr (env SHOOTERS_LOG_DIR)");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = ServerConfig::from_env()?.apply_args(args)?;
    let _log_guard = init_logging(config.log_dir.as_deref(), LevelFilter::INFO)?;

    tracing::info!("Shooter recipes server v{}", shooter_recipes::VERSION);
    let handle = start_server(&config).await?;
    tracing::info!("Serving recipes on {}", handle.base_url());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupted, shutting down");
    handle.stop().await
}
