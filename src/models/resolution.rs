use serde::{Deserialize, Serialize};

use super::{DatabaseEntry, DescriptorSet, EncyclopediaEntry};

/// Everything known about one structure string.
///
/// Missing encyclopedia or database data is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The structure string exactly as submitted.
    pub input: String,
    pub descriptors: DescriptorSet,
    pub encyclopedia: EncyclopediaEntry,
    pub database: Option<DatabaseEntry>,
}
