use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env before anything reads RUST_LOG, LOG_FORMAT or the config overrides
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(event = "panic", %instance, message = %info, "unhandled panic occurred");
    }));

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_invalid", error = %format!("{e:#}"), "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        %instance,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        backend = ?cfg.storage.backend,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "user api starting"
    );

    match rt.block_on(server::run(cfg, server::startup::shutdown_signal())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "run_failed", error = %format!("{e:#}"), "user api stopped with an error");
            ExitCode::FAILURE
        }
    }
}
