use serde::{Deserialize, Serialize};

/// Locally computed descriptors for a parsed structure.
///
/// Values are kept at full precision; the two-decimal forms are for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// Average molecular weight in g/mol.
    pub molecular_weight: f64,
    /// Wildman–Crippen octanol/water partition coefficient.
    pub logp: f64,
}

impl DescriptorSet {
    pub fn formatted_weight(&self) -> String {
        format!("{:.2} g/mol", self.molecular_weight)
    }

    pub fn formatted_logp(&self) -> String {
        format!("{:.2}", self.logp)
    }
}
