use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::debug;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for up to `config.epochs` epochs and returns the loss of
/// the **last completed epoch** (`0.0` if no epoch ran).
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// An epoch that has started always runs to completion.
pub fn train_loop(network: &mut Network, config: &TrainConfig) -> Result<f64> {
    let mut last_loss = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            debug!(epoch, "stop flag set; ending training");
            break;
        }

        let t_start = Instant::now();
        let loss = network.train()?;
        last_loss = loss;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(epoch, "progress receiver dropped; ending training");
                break;
            }
        }
    }

    Ok(last_loss)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
