use thiserror::Error;

/// Everything that can go wrong while building, driving or persisting a
/// [`Network`](crate::Network).
#[derive(Debug, Error)]
pub enum NetError {
    #[error("network configuration needs at least 2 widths, got {0}")]
    ConfigTooShort(usize),

    #[error("width at configuration position {index} must be at least 1")]
    ZeroWidth { index: usize },

    #[error("training data must contain at least one row")]
    NoRows,

    #[error("{what} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("epsilon must be greater than zero, got {0}")]
    InvalidEpsilon(f64),

    #[error("learning step must be greater than zero, got {0}")]
    InvalidLearningStep(f64),

    #[error("mutation probability must be greater than zero")]
    ZeroMutationProbability,

    #[error("network slot is already populated; release it first")]
    AlreadyAllocated,

    #[error("network has no training data")]
    MissingDataset,

    #[error("layer counts differ: destination has {dst}, source has {src}")]
    LayerCountMismatch { dst: usize, src: usize },

    #[error("neuron counts differ in layer {layer}: destination has {dst}, source has {src}")]
    NeuronCountMismatch { layer: usize, dst: usize, src: usize },

    #[error("weight counts differ in layer {layer}, neuron {neuron}: destination has {dst}, source has {src}")]
    WeightCountMismatch {
        layer: usize,
        neuron: usize,
        dst: usize,
        src: usize,
    },

    #[error("network layout is too large to address")]
    LayoutOverflow,

    #[error("unable to allocate {0} bytes for the network arena")]
    Allocation(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid network file: {0}")]
    InvalidFormat(String),

    #[error("unsupported network file version {found} (expected {expected})")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;
