mod app_context;
mod config;
mod jobs;
mod monitor;
mod notifier;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::app_context::AppContext;
use crate::config::load_config;
use crate::jobs::run_monitor_job;

const CONFIG_PATH: &str = "config.toml";

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_json_logging();

    let config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let app_context = match AppContext::new(config) {
        Ok(app_context) => app_context,
        Err(error) => {
            log::error!("Startup error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "healthwatch starting prometheus_url={}",
        app_context.config.prometheus_url
    );

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("shutdown_requested signal=ctrl_c"),
            Err(error) => {
                log::error!("shutdown signal listener failed: {}", error);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = run_monitor_job(&app_context) => {}
        _ = shutdown => {}
    }

    ExitCode::SUCCESS
}
