use std::mem::size_of;
use std::ops::Range;

use tracing::warn;

use crate::error::{NetError, Result};

/// Bytes occupied by one arena slot.
pub const SLOT_BYTES: usize = size_of::<f64>();

/// Where one layer's scalars live inside the arena.
///
/// - `neurons` — number of neurons in the layer
/// - `fan_in`  — weights per neuron (width of the preceding layer, or the
///               input width for the first layer)
/// - `bias`    — offset of the layer's single bias
/// - `values`  — offset of the first neuron value
/// - `weights` — offset of neuron 0's first weight; neuron `n`'s weights
///               follow at `weights + n * fan_in`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSlots {
    pub neurons: usize,
    pub fan_in: usize,
    pub bias: usize,
    pub values: usize,
    pub weights: usize,
}

impl LayerSlots {
    pub fn value(&self, neuron: usize) -> usize {
        self.values + neuron
    }

    pub fn value_span(&self) -> Range<usize> {
        self.values..self.values + self.neurons
    }

    /// Offsets of one neuron's weight sequence.
    pub fn weights_of(&self, neuron: usize) -> Range<usize> {
        let start = self.weights + neuron * self.fan_in;
        start..start + self.fan_in
    }

    /// Offsets of every weight in the layer, neuron-major.
    pub fn weight_span(&self) -> Range<usize> {
        self.weights..self.weights + self.neurons * self.fan_in
    }
}

/// Offsets of every sub-structure of a network inside its single `f64` arena.
///
/// The arena is packed in this order:
///
/// ```text
/// inputs | one bias per layer | neuron values | weights | dataset (row-major)
/// ```
///
/// A `Layout` is a pure function of the input width, the layer widths and the
/// dataset row count. Construction and file decoding both go through
/// [`Layout::from_config`], so a decoded network is addressed exactly like a
/// freshly built one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    input_width: usize,
    layers: Vec<LayerSlots>,
    rows: usize,
    cols: usize,
    dataset: usize,
    len: usize,
}

impl Layout {
    /// Validates a `[inputs, hidden..., outputs]` configuration and derives
    /// its layout.
    pub fn from_config(config: &[usize], rows: usize) -> Result<Layout> {
        if config.len() < 2 {
            warn!(len = config.len(), "configuration too short");
            return Err(NetError::ConfigTooShort(config.len()));
        }
        if let Some(index) = config.iter().position(|&width| width == 0) {
            warn!(index, "zero width in configuration");
            return Err(NetError::ZeroWidth { index });
        }
        if rows == 0 {
            warn!("dataset needs at least one row");
            return Err(NetError::NoRows);
        }
        Layout::derive(config[0], &config[1..], rows)
    }

    fn derive(input_width: usize, widths: &[usize], rows: usize) -> Result<Layout> {
        let layer_count = widths.len();
        let output_width = widths[layer_count - 1];

        let biases = input_width;
        let mut values = add(biases, layer_count)?;
        let mut weights = values;
        for &width in widths {
            weights = add(weights, width)?;
        }

        let mut layers = Vec::with_capacity(layer_count);
        let mut fan_in = input_width;
        for (index, &neurons) in widths.iter().enumerate() {
            layers.push(LayerSlots {
                neurons,
                fan_in,
                bias: biases + index,
                values,
                weights,
            });
            values += neurons;
            weights = add(weights, mul(neurons, fan_in)?)?;
            fan_in = neurons;
        }

        let dataset = weights;
        let cols = add(input_width, output_width)?;
        let len = add(dataset, mul(rows, cols)?)?;
        // the byte size must be representable too
        mul(len, SLOT_BYTES)?;

        Ok(Layout {
            input_width,
            layers,
            rows,
            cols,
            dataset,
            len,
        })
    }

    /// Allocates a zeroed arena sized for this layout in one reservation.
    pub fn allocate(&self) -> Result<Vec<f64>> {
        let mut arena = Vec::new();
        arena
            .try_reserve_exact(self.len)
            .map_err(|_| NetError::Allocation(self.bytes()))?;
        arena.resize(self.len, 0.0);
        Ok(arena)
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn inputs(&self) -> Range<usize> {
        0..self.input_width
    }

    pub fn layers(&self) -> &[LayerSlots] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&LayerSlots> {
        self.layers.get(index)
    }

    pub fn output_layer(&self) -> &LayerSlots {
        &self.layers[self.layers.len() - 1]
    }

    pub fn outputs(&self) -> Range<usize> {
        self.output_layer().value_span()
    }

    pub fn output_width(&self) -> usize {
        self.output_layer().neurons
    }

    /// Layer widths, first hidden layer through output layer.
    pub fn widths(&self) -> impl Iterator<Item = usize> + '_ {
        self.layers.iter().map(|slots| slots.neurons)
    }

    /// The full `[inputs, hidden..., outputs]` configuration.
    pub fn config(&self) -> Vec<usize> {
        std::iter::once(self.input_width).chain(self.widths()).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dataset_cell(&self, row: usize, col: usize) -> usize {
        self.dataset + row * self.cols + col
    }

    pub fn dataset_row(&self, row: usize) -> Range<usize> {
        let start = self.dataset + row * self.cols;
        start..start + self.cols
    }

    pub fn dataset_span(&self) -> Range<usize> {
        self.dataset..self.len
    }

    /// Arena offsets of every trainable parameter in training order: for each
    /// layer, its bias (skipped for the output layer) then its weights.
    pub fn parameters(&self) -> impl Iterator<Item = usize> + '_ {
        let last = self.layers.len() - 1;
        self.layers.iter().enumerate().flat_map(move |(index, slots)| {
            let bias = if index < last { Some(slots.bias) } else { None };
            bias.into_iter().chain(slots.weight_span())
        })
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.len() - 1 + self.layers.iter().map(|slots| slots.weight_span().len()).sum::<usize>()
    }

    /// Number of `f64` slots in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Total occupied size of the arena in bytes.
    pub fn bytes(&self) -> usize {
        self.len * SLOT_BYTES
    }
}

fn add(a: usize, b: usize) -> Result<usize> {
    a.checked_add(b).ok_or(NetError::LayoutOverflow)
}

fn mul(a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b).ok_or(NetError::LayoutOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_sections_back_to_back() {
        let layout = Layout::from_config(&[2, 3, 6], 4).unwrap();

        assert_eq!(layout.inputs(), 0..2);
        let hidden = layout.layers()[0];
        let output = layout.layers()[1];
        assert_eq!((hidden.bias, output.bias), (2, 3));
        assert_eq!(hidden.value_span(), 4..7);
        assert_eq!(output.value_span(), 7..13);
        assert_eq!(hidden.weight_span(), 13..19);
        assert_eq!(output.weight_span(), 19..37);
        assert_eq!(output.weights_of(1), 22..25);
        assert_eq!(layout.dataset_span(), 37..37 + 4 * 8);
        assert_eq!(layout.len(), 69);
        assert_eq!(layout.bytes(), 69 * 8);
    }

    #[test]
    fn dataset_cells_are_row_major() {
        let layout = Layout::from_config(&[2, 1], 3).unwrap();
        assert_eq!(layout.cols(), 3);
        assert_eq!(layout.dataset_cell(1, 2), layout.dataset_row(1).end - 1);
        assert_eq!(layout.dataset_row(2).end, layout.len());
    }

    #[test]
    fn parameters_skip_the_output_bias() {
        let layout = Layout::from_config(&[2, 3, 6], 1).unwrap();
        let params: Vec<usize> = layout.parameters().collect();

        assert_eq!(params.len(), layout.parameter_count());
        assert_eq!(params.len(), 1 + 6 + 18);
        assert_eq!(params[0], layout.layers()[0].bias);
        assert_eq!(params[1], layout.layers()[0].weights);
        assert!(!params.contains(&layout.layers()[1].bias));
    }

    #[test]
    fn single_layer_has_no_trainable_bias() {
        let layout = Layout::from_config(&[3, 2], 1).unwrap();
        assert_eq!(layout.parameter_count(), 6);
        assert_eq!(layout.config(), vec![3, 2]);
    }

    #[test]
    fn rejects_bad_configurations() {
        assert!(matches!(Layout::from_config(&[4], 1), Err(NetError::ConfigTooShort(1))));
        assert!(matches!(Layout::from_config(&[], 1), Err(NetError::ConfigTooShort(0))));
        assert!(matches!(
            Layout::from_config(&[2, 0, 1], 1),
            Err(NetError::ZeroWidth { index: 1 })
        ));
        assert!(matches!(Layout::from_config(&[2, 1], 0), Err(NetError::NoRows)));
    }

    #[test]
    fn detects_overflowing_sizes() {
        let huge = usize::MAX / 2;
        assert!(matches!(
            Layout::from_config(&[huge, huge], 1),
            Err(NetError::LayoutOverflow)
        ));
    }
}
