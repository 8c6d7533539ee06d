use arena_nn::{train_loop, Network, TrainConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

//  in  | XOR AND OR ~XOR ~AND ~OR
const TRUTH_TABLE: [[f64; 8]; 4] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
    [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0],
];

fn gates_network(seed: u64) -> Network {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut network = Network::create_with_rng(&[2, 3, 6], 4, &mut rng).unwrap();
    let rows: Vec<Vec<f64>> = TRUTH_TABLE.iter().map(|row| row.to_vec()).collect();
    network.set_dataset(&rows).unwrap();
    network
}

/// Replaces the random weights with a fixed spread in `[-0.5, 0.5]`.
///
/// The baseline error is measured once per epoch, so some random starting
/// points overshoot badly in the first epochs; a fixed start keeps these
/// tests independent of the RNG.
fn with_fixed_weights(mut network: Network) -> Network {
    for layer in 0..network.layer_count() {
        for neuron in 0..network.layer_width(layer).unwrap() {
            let fan_in = network.weights(layer, neuron).unwrap().len();
            for index in 0..fan_in {
                let step = (layer * 7 + neuron * 3 + index * 5) % 11;
                network
                    .set_weight(layer, neuron, index, step as f64 / 10.0 - 0.5)
                    .unwrap();
            }
        }
    }
    network
}

#[test]
fn short_training_lowers_the_error() {
    let mut network = with_fixed_weights(gates_network(42));
    let initial = network.dataset_error();

    let last = train_loop(&mut network, &TrainConfig::new(1_000)).unwrap();
    let after = network.dataset_error();

    assert!(last < initial, "loss went from {initial} to {last}");
    assert!(after < initial);
    assert!(network.is_dirty());
}

#[test]
fn training_is_reproducible_for_a_seed() {
    let mut a = gates_network(7);
    let mut b = gates_network(7);
    for _ in 0..50 {
        a.train().unwrap();
        b.train().unwrap();
    }
    let bits = |values: Vec<f64>| values.into_iter().map(f64::to_bits).collect::<Vec<_>>();
    assert_eq!(
        bits(a.predict(&[1.0, 0.0]).unwrap()),
        bits(b.predict(&[1.0, 0.0]).unwrap())
    );
}

fn assert_truth_table(network: &mut Network) {
    for row in &TRUTH_TABLE {
        let outputs = network.predict(&row[..2]).unwrap();
        let rounded: Vec<f64> = outputs
            .iter()
            .map(|&value| if value >= 0.5 { 1.0 } else { 0.0 })
            .collect();
        assert_eq!(rounded, row[2..].to_vec(), "inputs {:?}", &row[..2]);
    }
}

#[test]
fn learns_every_gate() {
    let mut network = with_fixed_weights(gates_network(2025));
    let loss = train_loop(&mut network, &TrainConfig::new(20_000)).unwrap();

    assert!(loss < 0.05, "loss {loss} after 20,000 epochs");
    assert_truth_table(&mut network);
}

#[test]
#[ignore = "runs 100,000 epochs; use --ignored (ideally with --release)"]
fn still_correct_after_a_long_run() {
    let mut network = with_fixed_weights(gates_network(2025));
    train_loop(&mut network, &TrainConfig::new(100_000)).unwrap();
    assert_truth_table(&mut network);
}
