use std::future::Future;
use std::time::Instant;
use tracing::info;

/// Awaits `fut` and, when `enabled`, logs how long it took under `step`.
pub async fn timed<F, T>(step: &str, enabled: bool, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let output = fut.await;

    if enabled {
        let elapsed = start.elapsed();
        info!(
            step,
            elapsed_ms = elapsed.as_millis() as u64,
            "Time taken for {}: {:.3} seconds",
            step,
            elapsed.as_secs_f64()
        );
    }

    output
}
