use rand::Rng;
use tracing::warn;

use crate::error::{NetError, Result};
use crate::network::network::Network;

impl Network {
    /// Copies half of every neuron's weights from `source` into `self`.
    ///
    /// Per neuron a coin flip picks either the first half (`0..w/2`) or the
    /// second half (`w/2..w`) of its `w` weights; that half is taken from
    /// `source`, the other half is kept. Both networks must have the same
    /// shape in every layer, output layer included. Biases and the dataset are
    /// untouched.
    pub fn crossover<R: Rng + ?Sized>(&mut self, source: &Network, rng: &mut R) -> Result<()> {
        self.check_compatible(source)?;

        for (dst, src) in self.layout.layers().iter().zip(source.layout.layers()) {
            let half = dst.fan_in / 2;
            for neuron in 0..dst.neurons {
                let span = if rng.gen_bool(0.5) {
                    half..dst.fan_in
                } else {
                    0..half
                };
                let to = dst.weights_of(neuron).start;
                let from = src.weights_of(neuron).start;
                self.arena[to + span.start..to + span.end]
                    .copy_from_slice(&source.arena[from + span.start..from + span.end]);
            }
        }

        self.mark_dirty();
        Ok(())
    }

    fn check_compatible(&self, other: &Network) -> Result<()> {
        if self.layer_count() != other.layer_count() {
            warn!(dst = self.layer_count(), src = other.layer_count(), "layer counts differ");
            return Err(NetError::LayerCountMismatch {
                dst: self.layer_count(),
                src: other.layer_count(),
            });
        }

        let pairs = self.layout.layers().iter().zip(other.layout.layers());
        for (layer, (dst, src)) in pairs.enumerate() {
            if dst.neurons != src.neurons {
                warn!(layer, dst = dst.neurons, src = src.neurons, "neuron counts differ");
                return Err(NetError::NeuronCountMismatch {
                    layer,
                    dst: dst.neurons,
                    src: src.neurons,
                });
            }
            // every neuron in a layer shares the same fan-in
            if dst.fan_in != src.fan_in {
                warn!(layer, dst = dst.fan_in, src = src.fan_in, "weight counts differ");
                return Err(NetError::WeightCountMismatch {
                    layer,
                    neuron: 0,
                    dst: dst.fan_in,
                    src: src.fan_in,
                });
            }
        }
        Ok(())
    }
}
