//! Perspective batch annotator entrypoint.

use mimalloc::MiMalloc;

use perspective::config::Config;
use perspective::lifecycle::ShutdownSignal;
use perspective::pipeline::{Pipeline, RunOutcome};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        input = %config.input_path.display(),
        result = %config.result_path().display(),
        subject_column = %config.subject_column,
        metrics = ?config.metrics,
        concurrency = config.concurrency,
        inter_batch_delay_ms = config.inter_batch_delay.as_millis() as u64,
        checkpoint_interval = config.checkpoint_interval,
        max_rows_per_minute = ?config.scheduler_config().max_rows_per_minute(),
        api_key = %config.redacted_api_key(),
        "Perspective batch starting"
    );

    let shutdown = ShutdownSignal::new();
    let listener = shutdown.listen_for_os_signals();

    let pipeline = Pipeline::from_config(config, shutdown)?;
    let report = pipeline.run().await;
    listener.abort();
    let report = report?;

    if report.outcome == RunOutcome::AlreadyComplete {
        println!("All texts have been analyzed already!");
    }
    print!("{report}");

    if report.outcome == RunOutcome::Interrupted {
        tracing::warn!(
            next_index = report.next_index(),
            "Stopped early; rerun with the same settings to resume"
        );
    }

    Ok(())
}
