use rand::Rng;
use tracing::{debug, warn};

use crate::activation::ActivationMode;
use crate::arena::{LayerSlots, Layout};
use crate::error::{NetError, Result};

/// Finite-difference step and learning step of a freshly built network.
pub const DEFAULT_EPSILON: f64 = 0.01;
pub const DEFAULT_LEARNING_STEP: f64 = 0.01;

/// A fully-connected feedforward network together with its training data.
///
/// Inputs, biases, neuron values, weights and the dataset all live in a single
/// `f64` arena; [`Layout`] maps every logical position onto an arena offset.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) dirty: bool,
    pub(crate) activation: ActivationMode,
    pub(crate) epsilon: f64,
    pub(crate) learning_step: f64,
    pub(crate) layout: Layout,
    pub(crate) arena: Vec<f64>,
}

impl Network {
    /// Builds a network from `[inputs, hidden..., outputs]` widths with room
    /// for `rows` training rows, drawing initial weights from the thread RNG.
    pub fn create(config: &[usize], rows: usize) -> Result<Network> {
        Network::create_with_rng(config, rows, &mut rand::thread_rng())
    }

    /// Like [`Network::create`], drawing initial weights from `rng`.
    ///
    /// Weights are uniform in `[-1, 1]`; inputs, biases, neuron values and the
    /// dataset start at zero. Activation is enabled and both ε and the
    /// learning step are `0.01`.
    pub fn create_with_rng<R: Rng + ?Sized>(
        config: &[usize],
        rows: usize,
        rng: &mut R,
    ) -> Result<Network> {
        let layout = Layout::from_config(config, rows)?;
        let mut arena = layout.allocate()?;
        for slots in layout.layers() {
            for weight in &mut arena[slots.weight_span()] {
                *weight = rng.gen_range(-1.0..=1.0);
            }
        }

        debug!(
            ?config,
            rows,
            bytes = layout.bytes(),
            parameters = layout.parameter_count(),
            "created network"
        );

        Ok(Network {
            dirty: false,
            activation: ActivationMode::Enabled,
            epsilon: DEFAULT_EPSILON,
            learning_step: DEFAULT_LEARNING_STEP,
            layout,
            arena,
        })
    }

    /// Builds a network into an empty slot. Fails with
    /// [`NetError::AlreadyAllocated`] if the slot still holds a network; the
    /// slot is never left partially populated.
    pub fn create_in<'a, R: Rng + ?Sized>(
        slot: &'a mut Option<Network>,
        config: &[usize],
        rows: usize,
        rng: &mut R,
    ) -> Result<&'a mut Network> {
        if slot.is_some() {
            warn!("refusing to build into a populated slot");
            return Err(NetError::AlreadyAllocated);
        }
        let network = Network::create_with_rng(config, rows, rng)?;
        Ok(slot.insert(network))
    }

    /// Drops the network held in `slot`, if any, leaving the slot empty.
    pub fn release(slot: &mut Option<Network>) {
        if let Some(network) = slot.take() {
            debug!(bytes = network.arena_bytes(), "released network");
        }
    }

    /// Reassembles a network from a decoded layout and arena.
    pub(crate) fn from_parts(
        layout: Layout,
        arena: Vec<f64>,
        activation: ActivationMode,
        epsilon: f64,
        learning_step: f64,
    ) -> Network {
        debug_assert_eq!(layout.len(), arena.len());
        Network {
            dirty: false,
            activation,
            epsilon,
            learning_step,
            layout,
            arena,
        }
    }

    // -----------------------------------------------------------------------
    // Shape
    // -----------------------------------------------------------------------

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn input_width(&self) -> usize {
        self.layout.input_width()
    }

    pub fn output_width(&self) -> usize {
        self.layout.output_width()
    }

    pub fn layer_count(&self) -> usize {
        self.layout.layers().len()
    }

    pub fn layer_width(&self, layer: usize) -> Result<usize> {
        Ok(self.layer_slots(layer)?.neurons)
    }

    pub fn dataset_rows(&self) -> usize {
        self.layout.rows()
    }

    pub fn dataset_cols(&self) -> usize {
        self.layout.cols()
    }

    /// Total occupied size of the network's arena in bytes.
    pub fn arena_bytes(&self) -> usize {
        self.layout.bytes()
    }

    // -----------------------------------------------------------------------
    // Hyperparameters and state flags
    // -----------------------------------------------------------------------

    /// Whether the network changed since it was last saved or loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn activation(&self) -> ActivationMode {
        self.activation
    }

    pub fn set_activation(&mut self, mode: ActivationMode) {
        self.activation = mode;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn learning_step(&self) -> f64 {
        self.learning_step
    }

    /// Both values must be strictly positive; on error neither is changed.
    pub fn set_epsilon_and_learning_step(&mut self, epsilon: f64, step: f64) -> Result<()> {
        if !(epsilon > 0.0) {
            warn!(epsilon, "epsilon must be positive");
            return Err(NetError::InvalidEpsilon(epsilon));
        }
        if !(step > 0.0) {
            warn!(step, "learning step must be positive");
            return Err(NetError::InvalidLearningStep(step));
        }
        self.epsilon = epsilon;
        self.learning_step = step;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------------

    pub fn inputs(&self) -> &[f64] {
        &self.arena[self.layout.inputs()]
    }

    pub fn set_inputs(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.input_width() {
            warn!(expected = self.input_width(), actual = values.len(), "input length mismatch");
            return Err(NetError::LengthMismatch {
                expected: self.input_width(),
                actual: values.len(),
            });
        }
        self.arena[self.layout.inputs()].copy_from_slice(values);
        Ok(())
    }

    pub fn set_input(&mut self, index: usize, value: f64) -> Result<()> {
        check_index("input", index, self.input_width())?;
        self.arena[index] = value;
        Ok(())
    }

    /// Output layer values as of the last [`Network::calculate`].
    pub fn outputs(&self) -> &[f64] {
        &self.arena[self.layout.outputs()]
    }

    pub fn output(&self, index: usize) -> Result<f64> {
        check_index("output", index, self.output_width())?;
        Ok(self.outputs()[index])
    }

    /// Sets the inputs, runs a forward pass and returns a copy of the outputs.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.set_inputs(inputs)?;
        self.calculate();
        Ok(self.outputs().to_vec())
    }

    // -----------------------------------------------------------------------
    // Parameters
    // -----------------------------------------------------------------------

    pub fn neuron_value(&self, layer: usize, neuron: usize) -> Result<f64> {
        let slots = self.layer_slots(layer)?;
        check_index("neuron", neuron, slots.neurons)?;
        Ok(self.arena[slots.value(neuron)])
    }

    pub fn bias(&self, layer: usize) -> Result<f64> {
        Ok(self.arena[self.layer_slots(layer)?.bias])
    }

    pub fn set_bias(&mut self, layer: usize, value: f64) -> Result<()> {
        let offset = self.layer_slots(layer)?.bias;
        self.arena[offset] = value;
        Ok(())
    }

    /// The weight sequence of one neuron, ordered like the preceding layer.
    pub fn weights(&self, layer: usize, neuron: usize) -> Result<&[f64]> {
        let slots = self.layer_slots(layer)?;
        check_index("neuron", neuron, slots.neurons)?;
        Ok(&self.arena[slots.weights_of(neuron)])
    }

    pub fn weight(&self, layer: usize, neuron: usize, index: usize) -> Result<f64> {
        let offset = self.weight_offset(layer, neuron, index)?;
        Ok(self.arena[offset])
    }

    pub fn set_weight(&mut self, layer: usize, neuron: usize, index: usize, value: f64) -> Result<()> {
        let offset = self.weight_offset(layer, neuron, index)?;
        self.arena[offset] = value;
        Ok(())
    }

    fn weight_offset(&self, layer: usize, neuron: usize, index: usize) -> Result<usize> {
        let slots = self.layer_slots(layer)?;
        check_index("neuron", neuron, slots.neurons)?;
        check_index("weight", index, slots.fan_in)?;
        Ok(slots.weights_of(neuron).start + index)
    }

    fn layer_slots(&self, layer: usize) -> Result<&LayerSlots> {
        self.layout.layer(layer).ok_or_else(|| {
            warn!(layer, layers = self.layer_count(), "layer index out of range");
            NetError::IndexOutOfRange {
                what: "layer",
                index: layer,
                len: self.layer_count(),
            }
        })
    }

    // -----------------------------------------------------------------------
    // Dataset
    // -----------------------------------------------------------------------

    pub fn dataset_value(&self, row: usize, col: usize) -> Result<f64> {
        let offset = self.dataset_offset(row, col)?;
        Ok(self.arena[offset])
    }

    pub fn set_dataset_value(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let offset = self.dataset_offset(row, col)?;
        self.arena[offset] = value;
        Ok(())
    }

    /// One dataset row: training inputs followed by target outputs.
    pub fn dataset_row(&self, row: usize) -> Result<&[f64]> {
        check_index("row", row, self.dataset_rows())?;
        Ok(&self.arena[self.layout.dataset_row(row)])
    }

    pub fn set_dataset_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        check_index("row", row, self.dataset_rows())?;
        check_len(self.dataset_cols(), values.len())?;
        self.arena[self.layout.dataset_row(row)].copy_from_slice(values);
        Ok(())
    }

    /// Replaces the whole dataset. The shape must match exactly; on error the
    /// dataset is left untouched.
    pub fn set_dataset(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        check_len(self.dataset_rows(), rows.len())?;
        for row in rows {
            check_len(self.dataset_cols(), row.len())?;
        }
        for (index, row) in rows.iter().enumerate() {
            self.arena[self.layout.dataset_row(index)].copy_from_slice(row);
        }
        Ok(())
    }

    fn dataset_offset(&self, row: usize, col: usize) -> Result<usize> {
        check_index("row", row, self.dataset_rows())?;
        check_index("column", col, self.dataset_cols())?;
        Ok(self.layout.dataset_cell(row, col))
    }
}

fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        warn!(what, index, len, "index out of range");
        Err(NetError::IndexOutOfRange { what, index, len })
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        warn!(expected, actual, "length mismatch");
        Err(NetError::LengthMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn network(config: &[usize], rows: usize) -> Network {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        Network::create_with_rng(config, rows, &mut rng).unwrap()
    }

    #[test]
    fn create_matches_configuration() {
        let net = network(&[2, 3, 6], 4);

        assert_eq!(net.input_width(), 2);
        assert_eq!(net.layer_count(), 2);
        assert_eq!(net.layer_width(0).unwrap(), 3);
        assert_eq!(net.layer_width(1).unwrap(), 6);
        assert_eq!(net.output_width(), 6);
        assert_eq!(net.dataset_rows(), 4);
        assert_eq!(net.dataset_cols(), 8);
        assert_eq!(net.weights(1, 0).unwrap().len(), 3);
    }

    #[test]
    fn create_initializes_defaults() {
        let net = network(&[3, 4, 2], 2);

        assert!(!net.is_dirty());
        assert_eq!(net.activation(), ActivationMode::Enabled);
        assert_eq!(net.epsilon(), DEFAULT_EPSILON);
        assert_eq!(net.learning_step(), DEFAULT_LEARNING_STEP);
        assert!(net.inputs().iter().all(|&x| x == 0.0));
        assert_eq!(net.bias(0).unwrap(), 0.0);
        assert_eq!(net.bias(1).unwrap(), 0.0);
        for row in 0..2 {
            assert!(net.dataset_row(row).unwrap().iter().all(|&x| x == 0.0));
        }
        for layer in 0..2 {
            for neuron in 0..net.layer_width(layer).unwrap() {
                for &w in net.weights(layer, neuron).unwrap() {
                    assert!((-1.0..=1.0).contains(&w));
                }
            }
        }
    }

    #[test]
    fn create_is_reproducible_with_a_seeded_rng() {
        let a = network(&[2, 5, 1], 1);
        let b = network(&[2, 5, 1], 1);
        assert_eq!(a.arena, b.arena);
    }

    #[test]
    fn create_rejects_invalid_shapes() {
        assert!(matches!(Network::create(&[3], 1), Err(NetError::ConfigTooShort(1))));
        assert!(matches!(
            Network::create(&[3, 0, 2], 1),
            Err(NetError::ZeroWidth { index: 1 })
        ));
        assert!(matches!(Network::create(&[3, 2], 0), Err(NetError::NoRows)));
    }

    #[test]
    fn create_in_refuses_a_populated_slot() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut slot = None;

        Network::create_in(&mut slot, &[2, 2], 1, &mut rng).unwrap();
        let before = slot.as_ref().unwrap().arena.clone();

        let err = Network::create_in(&mut slot, &[4, 4], 1, &mut rng).unwrap_err();
        assert!(matches!(err, NetError::AlreadyAllocated));
        assert_eq!(slot.as_ref().unwrap().arena, before);

        Network::release(&mut slot);
        assert!(slot.is_none());
        Network::release(&mut slot);
        assert!(slot.is_none());
    }

    #[test]
    fn failed_create_in_leaves_slot_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut slot = None;
        assert!(Network::create_in(&mut slot, &[2], 1, &mut rng).is_err());
        assert!(slot.is_none());
    }

    #[test]
    fn input_setters_are_bounds_checked() {
        let mut net = network(&[2, 1], 1);

        net.set_inputs(&[0.5, -0.5]).unwrap();
        assert_eq!(net.inputs(), &[0.5, -0.5]);

        assert!(matches!(
            net.set_inputs(&[1.0]),
            Err(NetError::LengthMismatch { expected: 2, actual: 1 })
        ));
        net.set_input(1, 3.0).unwrap();
        assert!(net.set_input(2, 9.0).is_err());
        assert_eq!(net.inputs(), &[0.5, 3.0]);
    }

    #[test]
    fn output_is_bounds_checked() {
        let net = network(&[2, 3], 1);
        assert!(net.output(2).is_ok());
        assert!(matches!(
            net.output(3),
            Err(NetError::IndexOutOfRange { what: "output", index: 3, len: 3 })
        ));
    }

    #[test]
    fn dataset_cells_are_addressable() {
        let mut net = network(&[2, 1], 2);

        net.set_dataset_value(1, 2, 4.5).unwrap();
        assert_eq!(net.dataset_value(1, 2).unwrap(), 4.5);
        assert_eq!(net.dataset_row(1).unwrap(), &[0.0, 0.0, 4.5]);

        assert!(net.set_dataset_value(2, 0, 1.0).is_err());
        assert!(net.set_dataset_value(0, 3, 1.0).is_err());
        assert!(net.dataset_value(0, 3).is_err());
    }

    #[test]
    fn set_dataset_checks_the_whole_shape_first() {
        let mut net = network(&[1, 1], 2);

        let bad = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(net.set_dataset(&bad).is_err());
        assert_eq!(net.dataset_row(0).unwrap(), &[0.0, 0.0]);

        net.set_dataset(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(net.dataset_value(1, 1).unwrap(), 4.0);
    }

    #[test]
    fn hyperparameters_must_be_positive() {
        let mut net = network(&[1, 1], 1);

        assert!(matches!(
            net.set_epsilon_and_learning_step(0.0, 0.1),
            Err(NetError::InvalidEpsilon(_))
        ));
        assert!(matches!(
            net.set_epsilon_and_learning_step(0.1, -1.0),
            Err(NetError::InvalidLearningStep(_))
        ));
        assert!(net.set_epsilon_and_learning_step(f64::NAN, 0.1).is_err());
        assert_eq!(net.epsilon(), DEFAULT_EPSILON);

        net.set_epsilon_and_learning_step(0.1, 0.001).unwrap();
        assert_eq!((net.epsilon(), net.learning_step()), (0.1, 0.001));
    }

    #[test]
    fn setters_do_not_mark_dirty() {
        let mut net = network(&[2, 2], 1);
        net.set_inputs(&[1.0, 1.0]).unwrap();
        net.set_dataset_value(0, 0, 1.0).unwrap();
        net.set_weight(0, 0, 0, 0.25).unwrap();
        net.set_bias(0, 0.5).unwrap();
        net.set_activation(ActivationMode::Disabled);
        assert!(!net.is_dirty());
        assert_eq!(net.weight(0, 0, 0).unwrap(), 0.25);
        assert!(net.weight(0, 0, 2).is_err());
    }
}
