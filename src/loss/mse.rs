pub struct MseLoss;

impl MseLoss {
    /// Squared error of one sample, summed over outputs: Σ(predicted - expected)²
    pub fn squared_error(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .fold(0.0, |acc, (a, b)| {
                let diff = a - b;
                acc + diff * diff
            })
    }
}
