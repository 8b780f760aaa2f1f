mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let state = build_state(&config).await?;

    if config.run_once {
        scheduler::run_proximity_refresh(&state).await;
        return Ok(());
    }

    scheduler::run_proximity_scheduler(state, config.refresh_interval).await;
    Ok(())
}
