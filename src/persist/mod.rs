pub mod codec;
pub mod file;

pub use codec::{MAGIC, VERSION};
pub use file::SaveOutcome;
