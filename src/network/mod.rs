pub mod display;
pub mod forward;
pub mod network;
pub mod spec;

pub use network::{Network, DEFAULT_EPSILON, DEFAULT_LEARNING_STEP};
pub use spec::NetworkSpec;
