use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::ActivationMode;
use crate::error::Result;
use crate::network::network::{Network, DEFAULT_EPSILON, DEFAULT_LEARNING_STEP};

/// A serializable description of a network to build.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of any
/// trained weights, so a shape and its hyperparameters can be kept alongside
/// a dataset before training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, e.g. used as a file stem by callers.
    pub name: String,
    /// `[inputs, hidden..., outputs]` widths.
    pub config: Vec<usize>,
    /// Number of dataset rows to reserve.
    pub rows: usize,
    #[serde(default)]
    pub activation: ActivationMode,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_learning_step")]
    pub learning_step: f64,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_learning_step() -> f64 {
    DEFAULT_LEARNING_STEP
}

impl NetworkSpec {
    pub fn new(name: impl Into<String>, config: Vec<usize>, rows: usize) -> NetworkSpec {
        NetworkSpec {
            name: name.into(),
            config,
            rows,
            activation: ActivationMode::default(),
            epsilon: DEFAULT_EPSILON,
            learning_step: DEFAULT_LEARNING_STEP,
        }
    }

    /// Builds a freshly initialized network with this shape and these
    /// hyperparameters.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        let mut network = Network::create_with_rng(&self.config, self.rows, rng)?;
        network.set_epsilon_and_learning_step(self.epsilon, self.learning_step)?;
        network.set_activation(self.activation);
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Network {
    /// Describes this network's shape and hyperparameters.
    pub fn spec(&self, name: impl Into<String>) -> NetworkSpec {
        NetworkSpec {
            name: name.into(),
            config: self.layout.config(),
            rows: self.dataset_rows(),
            activation: self.activation,
            epsilon: self.epsilon,
            learning_step: self.learning_step,
        }
    }
}
