use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Whether hidden layers squash their pre-activation sums.
///
/// The output layer is always linear regardless of the mode; only layers
/// before it are affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// Hidden neurons keep `sum + bias` unchanged.
    Disabled,
    /// Hidden neurons take the logistic function of `sum + bias`.
    #[default]
    Enabled,
}

impl ActivationMode {
    /// Applies the mode to a hidden-layer pre-activation value.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            ActivationMode::Disabled => x,
            ActivationMode::Enabled => logistic(x),
        }
    }

    /// Stable one-byte tag used by the binary file format.
    pub fn to_byte(self) -> u8 {
        match self {
            ActivationMode::Disabled => 0,
            ActivationMode::Enabled => 1,
        }
    }

    pub fn from_byte(tag: u8) -> Option<ActivationMode> {
        match tag {
            0 => Some(ActivationMode::Disabled),
            1 => Some(ActivationMode::Enabled),
            _ => None,
        }
    }
}

/// `1 / (1 + e^-x)`
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}
