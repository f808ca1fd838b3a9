mod cli;
mod config;
mod logging;
mod monitor;
mod process;
mod shutdown;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout carries the timestamped log lines.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match cli::parse_config(std::env::args()) {
        Ok(config) => config,
        Err(err) => {
            println!("{err}");
            return;
        }
    };

    tracing::info!(
        process_name = %config.process_name,
        max_lifetime_minutes = config.max_lifetime_minutes,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "procwatch starting"
    );
    println!("Press 'q' to quit the monitoring...");

    let sink: Arc<dyn logging::LogSink> = Arc::new(logging::DualSink::open("log.txt"));
    let token = CancellationToken::new();
    let monitor = tokio::spawn(monitor::run(config, sink, token.clone()));

    shutdown::wait_for_quit(token, monitor).await;
    tracing::info!("procwatch stopped");
}
