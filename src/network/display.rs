use std::io::{self, Write};

use crate::network::network::Network;

const RULE: &str = "--------------------------------------------------------------------------------";

impl Network {
    /// Writes inputs, then every layer's neuron values, weights and bias.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "Inputs {}:", self.input_width())?;
        for value in self.inputs() {
            writeln!(out, "    value: {value:.3}")?;
        }
        writeln!(out)?;

        let last = self.layer_count() - 1;
        for (index, slots) in self.layout.layers().iter().enumerate() {
            if index == last {
                writeln!(out, "output:")?;
            } else {
                writeln!(out, "layer {index}:")?;
            }
            for neuron in 0..slots.neurons {
                writeln!(out, "    neuron {neuron}, value {:.3}:", self.arena[slots.value(neuron)])?;
                for (w, weight) in self.arena[slots.weights_of(neuron)].iter().enumerate() {
                    writeln!(out, "        weight {w}: {weight:.3}")?;
                }
            }
            writeln!(out, "    bias: {:.3}", self.arena[slots.bias])?;
            writeln!(out)?;
        }
        writeln!(out, "{RULE}")
    }

    /// Writes only the output layer's values.
    pub fn print_outputs<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "Outputs:")?;
        for (index, value) in self.outputs().iter().enumerate() {
            writeln!(out, "  output {index}, value {value:.3}")?;
        }
        writeln!(out, "{RULE}")
    }
}
