//! Tool descriptors advertised to language-model agents.

use serde::{Deserialize, Serialize};

/// A tool an agent may advertise to its backend.
///
/// Only the descriptor lives here; execution is outside this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
