//! Feed-forward network controller.
//!
//! A [`FeedForwardNetwork`] is a stack of dense layers described by its
//! topology, e.g. `[3, 4, 1]`: three sensor inputs, one hidden layer of four
//! neurons and a single output. Hidden layers use `tanh`; the output layer is
//! linear, so its sign alone decides whether the bird jumps.
//!
//! # Weight Layout
//!
//! All parameters live in one flat vector, layer by layer and neuron by neuron.
//! Each neuron contributes its input weights followed by its bias:
//!
//! ```text
//! [3, 2, 1]:
//!   hidden 0: w0 w1 w2 b
//!   hidden 1: w0 w1 w2 b
//!   output 0: w0 w1 b
//!   => weight_count = 2 * (3 + 1) + 1 * (2 + 1) = 11
//! ```
//!
//! The flat layout lets the genetic optimizer treat a network as a plain
//! weight vector.

use flappy_engine::{Controller, SENSOR_COUNT};
use serde::{Deserialize, Serialize};

/// Reason a network could not be built.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display(
        "invalid topology {topology:?}: expected 3 inputs, non-empty layers and at least one output"
    )]
    Topology { topology: Vec<usize> },
    #[display("topology {topology:?} needs {expected} weights, got {actual}")]
    WeightCount {
        topology: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// Number of parameters a network with `topology` has.
#[must_use]
pub fn weight_count(topology: &[usize]) -> usize {
    topology
        .windows(2)
        .map(|layers| (layers[0] + 1) * layers[1])
        .sum()
}

/// Checks that `topology` describes a network the harness can drive.
pub fn validate_topology(topology: &[usize]) -> Result<(), NetworkError> {
    let valid = topology.len() >= 2
        && topology[0] == SENSOR_COUNT
        && topology.iter().all(|&neurons| neurons > 0);
    if valid {
        Ok(())
    } else {
        Err(NetworkError::Topology {
            topology: topology.to_vec(),
        })
    }
}

/// Dense feed-forward network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkParts")]
pub struct FeedForwardNetwork {
    topology: Vec<usize>,
    weights: Vec<f32>,
}

#[derive(Deserialize)]
struct NetworkParts {
    topology: Vec<usize>,
    weights: Vec<f32>,
}

impl TryFrom<NetworkParts> for FeedForwardNetwork {
    type Error = NetworkError;

    fn try_from(parts: NetworkParts) -> Result<Self, Self::Error> {
        Self::new(parts.topology, parts.weights)
    }
}

impl FeedForwardNetwork {
    pub fn new(topology: Vec<usize>, weights: Vec<f32>) -> Result<Self, NetworkError> {
        validate_topology(&topology)?;
        let expected = weight_count(&topology);
        if weights.len() != expected {
            return Err(NetworkError::WeightCount {
                topology,
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { topology, weights })
    }

    #[must_use]
    pub fn topology(&self) -> &[usize] {
        &self.topology
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Propagates `inputs` through every layer and writes the output layer to
    /// `outputs`.
    pub fn forward(&self, inputs: &[f32], outputs: &mut [f32]) {
        debug_assert_eq!(inputs.len(), self.topology[0]);

        let output_layer = self.topology.len() - 2;
        let mut remaining = self.weights.as_slice();
        let mut current = inputs.to_vec();
        for (layer, sizes) in self.topology.windows(2).enumerate() {
            let (fan_in, neurons) = (sizes[0], sizes[1]);
            let mut next = Vec::with_capacity(neurons);
            for _ in 0..neurons {
                let (neuron, rest) = remaining.split_at(fan_in + 1);
                remaining = rest;
                let sum = neuron[..fan_in]
                    .iter()
                    .zip(&current)
                    .map(|(w, x)| w * x)
                    .sum::<f32>()
                    + neuron[fan_in];
                next.push(if layer == output_layer { sum } else { sum.tanh() });
            }
            current = next;
        }

        for (out, value) in outputs.iter_mut().zip(current) {
            *out = value;
        }
    }
}

impl Controller for FeedForwardNetwork {
    fn input_len(&self) -> usize {
        self.topology[0]
    }

    fn output_len(&self) -> usize {
        self.topology[self.topology.len() - 1]
    }

    fn activate(&self, inputs: &[f32], outputs: &mut [f32]) {
        self.forward(inputs, outputs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_count() {
        assert_eq!(weight_count(&[3, 1]), 4);
        assert_eq!(weight_count(&[3, 2, 1]), 11);
        assert_eq!(weight_count(&[3, 4, 1]), 21);
        assert_eq!(weight_count(&[3, 4, 4, 2]), 16 + 20 + 10);
    }

    #[test]
    fn test_rejects_bad_topology() {
        for topology in [vec![], vec![3], vec![2, 1], vec![3, 0, 1], vec![3, 0]] {
            let weights = vec![0.0; weight_count(&topology)];
            let err = FeedForwardNetwork::new(topology.clone(), weights).unwrap_err();
            assert_eq!(err, NetworkError::Topology { topology });
        }
    }

    #[test]
    fn test_rejects_wrong_weight_count() {
        let err = FeedForwardNetwork::new(vec![3, 2, 1], vec![0.0; 10]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::WeightCount {
                topology: vec![3, 2, 1],
                expected: 11,
                actual: 10
            }
        );
    }

    #[test]
    fn test_linear_network_is_weighted_sum() {
        let network = FeedForwardNetwork::new(vec![3, 1], vec![1.0, -1.0, 0.5, 0.25]).unwrap();
        let mut outputs = [0.0];
        network.activate(&[1.0, 2.0, 4.0], &mut outputs);
        assert_eq!(outputs, [1.25]);
    }

    #[test]
    fn test_hidden_layers_use_tanh() {
        // hidden = tanh(x0), output = 2 * hidden - 0.5
        let network = FeedForwardNetwork::new(
            vec![3, 1, 1],
            vec![1.0, 0.0, 0.0, 0.0, 2.0, -0.5],
        )
        .unwrap();
        let mut outputs = [0.0];
        network.activate(&[0.5, 100.0, -100.0], &mut outputs);
        assert_eq!(outputs, [2.0 * 0.5_f32.tanh() - 0.5]);

        // saturated hidden neuron
        network.activate(&[1000.0, 0.0, 0.0], &mut outputs);
        assert!((outputs[0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_multiple_outputs() {
        let network = FeedForwardNetwork::new(
            vec![3, 2],
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0],
        )
        .unwrap();
        assert_eq!(network.output_len(), 2);
        let mut outputs = [0.0; 2];
        network.activate(&[3.0, 4.0, 5.0], &mut outputs);
        assert_eq!(outputs, [3.0, 5.0]);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{ "topology": [3, 1], "weights": [0.1, 0.2, 0.3, 0.4] }"#;
        let network: FeedForwardNetwork = serde_json::from_str(json).unwrap();
        assert_eq!(network.weights(), &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(
            serde_json::to_string(&network).unwrap(),
            r#"{"topology":[3,1],"weights":[0.1,0.2,0.3,0.4]}"#
        );

        let json = r#"{ "topology": [3, 1], "weights": [0.1] }"#;
        let err = serde_json::from_str::<FeedForwardNetwork>(json).unwrap_err();
        assert!(err.to_string().contains("needs 4 weights"));
    }
}
