use rand::Rng;
use tracing::{trace, warn};

use crate::error::{NetError, Result};
use crate::network::network::Network;

impl Network {
    /// Randomly re-draws weights.
    ///
    /// With chance `1 / probability` a mutation round happens: every weight
    /// then independently has a `1 / (neurons_in_its_layer * 10)` chance of
    /// being replaced by a fresh uniform value in `[-1, 1]`. Biases are never
    /// touched. Returns whether a round happened; a round marks the network
    /// dirty even if no weight ended up changing.
    pub fn mutate<R: Rng + ?Sized>(&mut self, probability: u32, rng: &mut R) -> Result<bool> {
        if probability == 0 {
            warn!("mutation probability must be positive");
            return Err(NetError::ZeroMutationProbability);
        }
        if rng.gen_range(0..probability) != 0 {
            return Ok(false);
        }

        let mut replaced = 0usize;
        for slots in self.layout.layers() {
            let odds = slots.neurons * 10;
            for weight in &mut self.arena[slots.weight_span()] {
                if rng.gen_range(0..odds) == 0 {
                    *weight = rng.gen_range(-1.0..=1.0);
                    replaced += 1;
                }
            }
        }

        self.mark_dirty();
        trace!(replaced, "mutation round");
        Ok(true)
    }
}
