use serde::{Deserialize, Serialize};

pub mod assessment;
pub mod chat;
pub mod dashboard;
pub mod learning_path;
pub mod resource;
pub mod user;

/// Accent colour attached to cards and progress bars. The client maps each
/// variant to its own palette; colour names are never built from strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Gray,
}
