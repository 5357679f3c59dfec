use serde::{Deserialize, Serialize};

/// Public record page for a compound id.
pub const PUBCHEM_COMPOUND_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/compound";

/// A compound as returned by a database client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub cid: u64,
    pub iupac_name: Option<String>,
    pub molecular_formula: Option<String>,
    /// Molecular weight as reported by the database, without unit.
    pub molecular_weight: Option<String>,
    pub canonical_smiles: Option<String>,
}

/// Database section of a resolution. Present as a whole or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub cid: u64,
    pub molecular_formula: String,
    /// Weight with unit, e.g. `"180.16 g/mol"`.
    pub molecular_weight: String,
    pub iupac_name: String,
    pub canonical_smiles: String,
    pub record_url: String,
}

impl DatabaseEntry {
    pub fn from_record(record: &CompoundRecord) -> Self {
        Self {
            cid: record.cid,
            molecular_formula: record.molecular_formula.clone().unwrap_or_default(),
            molecular_weight: format!(
                "{} g/mol",
                record.molecular_weight.as_deref().unwrap_or_default()
            ),
            iupac_name: record.iupac_name.clone().unwrap_or_default(),
            canonical_smiles: record.canonical_smiles.clone().unwrap_or_default(),
            record_url: record_url(record.cid),
        }
    }
}

pub fn record_url(cid: u64) -> String {
    format!("{}/{}", PUBCHEM_COMPOUND_URL, cid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_synthesizes_record_url_and_unit() {
        let record = CompoundRecord {
            cid: 2244,
            iupac_name: Some("2-acetyloxybenzoic acid".to_string()),
            molecular_formula: Some("C9H8O4".to_string()),
            molecular_weight: Some("180.16".to_string()),
            canonical_smiles: Some("CC(=O)OC1=CC=CC=C1C(=O)O".to_string()),
        };
        let entry = DatabaseEntry::from_record(&record);
        assert_eq!(entry.record_url, "https://pubchem.ncbi.nlm.nih.gov/compound/2244");
        assert_eq!(entry.molecular_weight, "180.16 g/mol");
        assert_eq!(entry.iupac_name, "2-acetyloxybenzoic acid");
    }
}
