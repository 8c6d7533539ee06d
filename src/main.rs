// Logic-gate demo: a 2-3-6 network learns XOR, AND, OR and their complements.
// Reuses `parameters.bin` from a previous run when present and saves it again
// on exit. Set RUST_LOG=debug for library diagnostics.
use std::io;
use std::path::Path;

use arena_nn::{Network, NetError, SaveOutcome};
use tracing_subscriber::EnvFilter;

const PARAMETERS: &str = "parameters.bin";
const EPOCHS: usize = 100_000;
const CONFIG: [usize; 3] = [2, 3, 6];

//  in  | XOR AND OR ~XOR ~AND ~OR
const TRUTH_TABLE: [[f64; 8]; 4] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
    [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0],
];

fn main() -> Result<(), NetError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut network = if Path::new(PARAMETERS).exists() {
        println!("Loading network from {PARAMETERS}");
        Network::load(PARAMETERS)?
    } else {
        println!("Creating a new network");
        let mut network = Network::create(&CONFIG, TRUTH_TABLE.len())?;
        let rows: Vec<Vec<f64>> = TRUTH_TABLE.iter().map(|row| row.to_vec()).collect();
        network.set_dataset(&rows)?;
        network
    };

    for epoch in 0..=EPOCHS {
        let loss = network.train()?;
        if epoch % (EPOCHS / 10) == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    network.print(&mut io::stdout())?;

    println!("in  | XOR | AND | OR | ~XOR | ~AND | ~OR");
    for row in &TRUTH_TABLE {
        let outputs = network.predict(&row[..2])?;
        let bits: Vec<String> = outputs
            .iter()
            .map(|&value| u8::from(value >= 0.5).to_string())
            .collect();
        println!("{} {} | {}", row[0], row[1], bits.join("   | "));
    }

    match network.save(PARAMETERS)? {
        SaveOutcome::Written => println!("Saved network to {PARAMETERS}"),
        SaveOutcome::Unchanged => println!("Network unchanged; nothing saved"),
    }
    Ok(())
}
