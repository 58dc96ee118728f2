use chrono::{DateTime, Utc};
use flappy_evaluator::network::FeedForwardNetwork;
use serde::{Deserialize, Serialize};

/// A trained controller as stored on disk.
///
/// The network's `topology` and `weights` are flattened into the model object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Generation the network was taken from.
    pub generation: usize,
    pub final_fitness: f32,
    #[serde(flatten)]
    pub network: FeedForwardNetwork,
}
