//! Register write plans: JSON-persisted lists of register writes.
//!
//! A plan is the scripted form of a bring-up test: write these values to
//! these registers, then read them back. The CLI's `run` command applies
//! one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DpcError, Result};

/// One register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterWrite {
    pub addr: u8,
    pub value: u8,
}

/// A named sequence of register writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritePlan {
    /// Plan display name.
    pub name: String,
    /// Writes in application order.
    pub writes: Vec<RegisterWrite>,
}

impl Default for WritePlan {
    fn default() -> Self {
        Self {
            name: "Smoke test".into(),
            writes: vec![RegisterWrite {
                addr: 64,
                value: 42,
            }],
        }
    }
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<WritePlan> {
    let raw = fs::read_to_string(path).map_err(|e| {
        DpcError::context(format!("Failed to read write plan {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        DpcError::context(format!("Failed to parse write plan {}: {e}", path.display()))
    })
}

/// Save a plan to a JSON file.
pub fn save_plan(path: &Path, plan: &WritePlan) -> Result<()> {
    let raw = serde_json::to_string_pretty(plan).map_err(|e| {
        DpcError::context(format!("Failed to serialize write plan '{}': {e}", plan.name))
    })?;
    fs::write(path, raw).map_err(|e| {
        DpcError::context(format!("Failed to write plan to {}: {e}", path.display()))
    })
}
