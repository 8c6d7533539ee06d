pub mod layout;

pub use layout::{Layout, LayerSlots, SLOT_BYTES};
