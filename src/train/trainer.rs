use tracing::{trace, warn};

use crate::activation::ActivationMode;
use crate::arena::Layout;
use crate::error::{NetError, Result};
use crate::loss::mse::MseLoss;
use crate::network::forward::forward;
use crate::network::network::Network;

impl Network {
    /// Mean squared error of the network over its whole dataset.
    ///
    /// Each row's input columns are copied into the input vector and a forward
    /// pass is run, so inputs and neuron values reflect the last row afterwards.
    pub fn dataset_error(&mut self) -> f64 {
        dataset_error(&self.layout, &mut self.arena, self.activation)
    }

    /// Runs one training epoch and returns the dataset error measured before
    /// any parameter moved.
    ///
    /// Every trainable parameter (hidden-layer biases and all weights, layer by
    /// layer) is nudged by ε, the dataset error is remeasured, the parameter is
    /// restored and then stepped by `learning_step * (perturbed - base) / ε`.
    /// The baseline is measured once per epoch, so later parameters see the
    /// effect of earlier updates in their error difference.
    pub fn train(&mut self) -> Result<f64> {
        if self.layout.rows() == 0 {
            warn!("cannot train without a dataset");
            return Err(NetError::MissingDataset);
        }

        let (activation, epsilon, step) = (self.activation, self.epsilon, self.learning_step);
        let layout = &self.layout;
        let arena = &mut self.arena;

        let base = dataset_error(layout, arena, activation);
        for offset in layout.parameters() {
            let saved = arena[offset];
            arena[offset] = saved + epsilon;
            let perturbed = dataset_error(layout, arena, activation);
            arena[offset] = saved - step * ((perturbed - base) / epsilon);
        }

        self.mark_dirty();
        trace!(error = base, "finished epoch");
        Ok(base)
    }
}

fn dataset_error(layout: &Layout, arena: &mut [f64], activation: ActivationMode) -> f64 {
    let rows = layout.rows();
    let input_width = layout.input_width();
    let mut total = 0.0;

    for row in 0..rows {
        let cells = layout.dataset_row(row);
        let targets = cells.start + input_width..cells.end;
        arena.copy_within(cells.start..targets.start, layout.inputs().start);

        forward(layout, arena, activation);
        total += MseLoss::squared_error(&arena[layout.outputs()], &arena[targets]);
    }

    total / rows as f64
}
