pub mod activation;

pub use activation::{ActivationMode, logistic};
