use serde::{Deserialize, Serialize};

/// Derived point balance of one player. Recomputed on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub name: String,
    /// income + cost
    pub value: i64,
    /// Starting balance plus attendance bonuses.
    pub income: i64,
    /// Points spent, as a non-positive running total.
    pub cost: i64,
    pub characters: Vec<String>,
}

impl Balance {
    pub fn is_negative(&self) -> bool {
        self.value < 0
    }
}
