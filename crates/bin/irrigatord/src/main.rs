use irrigatord::Irrigator;
use irrigatord::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let irrigator = Irrigator::from_config(&config)?;

    // Relays keep their last state across restarts; start from all closed.
    irrigator.close_all();

    let mut interval = tokio::time::interval(config.sample_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let recorded = irrigator.tick();
                tracing::trace!(recorded, "sampled flow counters");
            }
            res = &mut shutdown => {
                res?;
                tracing::info!("shutting down");
                break;
            }
        }
    }

    let left_open = irrigator.close_all();
    tracing::info!(state = %irrigator.snapshot_json()?, left_open, "final faucet state");

    Ok(())
}
