//! PubChem PUG-REST client.
//!
//! Identifiers travel in a form-encoded POST body so SMILES characters such
//! as `/`, `#` and `+` need no path escaping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};

use super::{status_error, CompoundDatabase, LookupError};
use crate::config::LookupConfig;
use crate::models::CompoundRecord;

/// Properties requested for every compound.
const PROPERTIES: &str = "IUPACName,MolecularFormula,MolecularWeight,CanonicalSMILES";

#[derive(Debug, Clone)]
pub struct PubChemClient {
    base_url: String,
    client: Client,
}

impl PubChemClient {
    /// Create with explicit configuration. `base_url` is the PUG-REST root,
    /// e.g. `https://pubchem.ncbi.nlm.nih.gov/rest/pug`.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Self::new(
            config.pubchem_base_url.clone(),
            &config.user_agent,
            config.timeout(),
        )
    }

    async fn properties(
        &self,
        namespace: &str,
        identifier: &str,
    ) -> Result<Vec<CompoundRecord>, LookupError> {
        let url = format!(
            "{}/compound/{}/property/{}/JSON",
            self.base_url, namespace, PROPERTIES
        );
        tracing::debug!(namespace, identifier, "querying PubChem");

        let response = self
            .client
            .post(&url)
            .form(&[(namespace, identifier)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// 404 is PubChem's "no such compound"; any other failure is an error.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<CompoundRecord>, LookupError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(status_error(response).await);
        }

        let body: PropertyResponse = response.json().await?;
        Ok(body
            .property_table
            .properties
            .into_iter()
            // CID 0 is a placeholder for structures PubChem has never seen.
            .filter(|row| row.cid != 0)
            .map(CompoundRecord::from)
            .collect())
    }
}

#[async_trait]
impl CompoundDatabase for PubChemClient {
    async fn lookup_by_smiles(&self, smiles: &str) -> Result<Vec<CompoundRecord>, LookupError> {
        self.properties("smiles", smiles).await
    }

    async fn lookup_by_name(&self, name: &str) -> Result<Vec<CompoundRecord>, LookupError> {
        self.properties("name", name).await
    }
}

// ============================================================
// Wire format
// ============================================================

#[derive(Debug, Deserialize)]
struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties", default)]
    properties: Vec<PropertyRow>,
}

#[derive(Debug, Deserialize)]
struct PropertyRow {
    #[serde(rename = "CID")]
    cid: u64,
    #[serde(rename = "IUPACName", default)]
    iupac_name: Option<String>,
    #[serde(rename = "MolecularFormula", default)]
    molecular_formula: Option<String>,
    #[serde(
        rename = "MolecularWeight",
        default,
        deserialize_with = "string_or_number"
    )]
    molecular_weight: Option<String>,
    // Newer PUG-REST releases answer a CanonicalSMILES request with
    // ConnectivitySMILES.
    #[serde(rename = "CanonicalSMILES", alias = "ConnectivitySMILES", default)]
    canonical_smiles: Option<String>,
}

impl From<PropertyRow> for CompoundRecord {
    fn from(row: PropertyRow) -> Self {
        CompoundRecord {
            cid: row.cid,
            iupac_name: row.iupac_name,
            molecular_formula: row.molecular_formula,
            molecular_weight: row.molecular_weight,
            canonical_smiles: row.canonical_smiles,
        }
    }
}

/// `MolecularWeight` is a string in current responses and a number in older
/// ones.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<PropertyRow> {
        serde_json::from_str::<PropertyResponse>(json)
            .unwrap()
            .property_table
            .properties
    }

    #[test]
    fn decodes_current_response_shape() {
        let rows = rows(
            r#"{"PropertyTable":{"Properties":[{"CID":2244,"MolecularFormula":"C9H8O4",
            "MolecularWeight":"180.16","ConnectivitySMILES":"CC(=O)OC1=CC=CC=C1C(=O)O",
            "IUPACName":"2-acetyloxybenzoic acid"}]}}"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cid, 2244);
        assert_eq!(rows[0].molecular_weight.as_deref(), Some("180.16"));
        assert_eq!(
            rows[0].canonical_smiles.as_deref(),
            Some("CC(=O)OC1=CC=CC=C1C(=O)O")
        );
    }

    #[test]
    fn decodes_numeric_weight_and_legacy_smiles_field() {
        let rows = rows(
            r#"{"PropertyTable":{"Properties":[{"CID":702,"MolecularWeight":46.07,
            "CanonicalSMILES":"CCO"}]}}"#,
        );
        assert_eq!(rows[0].molecular_weight.as_deref(), Some("46.07"));
        assert_eq!(rows[0].canonical_smiles.as_deref(), Some("CCO"));
        assert!(rows[0].iupac_name.is_none());
    }
}
