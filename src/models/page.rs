//! Offset pagination

use serde::{Deserialize, Serialize};
use crate::utils::errors::{EwmError, Result};

/// `from` is an element offset, not a page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub from: i64,
    pub size: i64,
}

impl Page {
    pub fn new(from: i64, size: i64) -> Result<Self> {
        if from < 0 {
            return Err(EwmError::Validation(format!("from must not be negative: {}", from)));
        }
        if size <= 0 {
            return Err(EwmError::Validation(format!("size must be positive: {}", size)));
        }
        Ok(Self { from, size })
    }

    /// Slice an already ordered in-memory collection
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.from as usize)
            .take(self.size as usize)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { from: 0, size: 10 }
    }
}
