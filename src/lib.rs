pub mod error;
pub mod activation;
pub mod arena;
pub mod network;
pub mod loss;
pub mod train;
pub mod genetic;
pub mod persist;

// Convenience re-exports
pub use error::{NetError, Result};
pub use activation::activation::ActivationMode;
pub use arena::layout::Layout;
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use persist::file::SaveOutcome;
pub use train::{train_loop, EpochStats, TrainConfig};
