use crate::activation::ActivationMode;
use crate::arena::Layout;
use crate::network::network::Network;

impl Network {
    /// Recomputes every neuron value from the current inputs and parameters.
    ///
    /// Hidden neurons take `activation(Σ w·x + bias)`; output neurons take the
    /// raw weighted sum, with no bias and no activation.
    pub fn calculate(&mut self) {
        forward(&self.layout, &mut self.arena, self.activation);
    }
}

/// Forward pass over a raw arena. Shared with the trainer, which needs to run
/// it while holding disjoint borrows of the network's fields.
pub(crate) fn forward(layout: &Layout, arena: &mut [f64], activation: ActivationMode) {
    let layers = layout.layers();
    let last = layers.len() - 1;

    for (index, slots) in layers.iter().enumerate() {
        let source = if index == 0 {
            layout.inputs()
        } else {
            layers[index - 1].value_span()
        };
        let bias = arena[slots.bias];

        for neuron in 0..slots.neurons {
            let sum = arena[slots.weights_of(neuron)]
                .iter()
                .zip(&arena[source.clone()])
                .fold(0.0, |acc, (w, x)| acc + x * w);

            arena[slots.value(neuron)] = if index == last {
                sum
            } else {
                activation.apply(sum + bias)
            };
        }
    }
}
