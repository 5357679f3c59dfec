//! Resolution of a structure string into descriptors plus external data.
//!
//! Two stages run one after the other. The encyclopedia stage asks the
//! database for an IUPAC name and looks that name up, falling back to the raw
//! input. The database stage looks the structure up directly and, when that
//! finds nothing, retries by the name the encyclopedia stage resolved.
//! External failures never fail a resolution; only an unparseable structure
//! does.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chem::{self, Molecule, SmilesError};
use crate::config::LookupConfig;
use crate::lookup::{
    CompoundDatabase, Encyclopedia, LookupError, PubChemClient, WikipediaClient,
};
use crate::models::{
    CompoundRecord, DatabaseEntry, DescriptorSet, EncyclopediaEntry, ResolutionResult,
};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid SMILES string.")]
    InvalidStructure {
        input: String,
        #[source]
        source: SmilesError,
    },
}

pub struct Resolver {
    database: Arc<dyn CompoundDatabase>,
    encyclopedia: Arc<dyn Encyclopedia>,
}

impl Resolver {
    pub fn new(database: Arc<dyn CompoundDatabase>, encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        Self {
            database,
            encyclopedia,
        }
    }

    /// Resolver backed by PubChem and Wikipedia.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self::new(
            Arc::new(PubChemClient::from_config(config)?),
            Arc::new(WikipediaClient::from_config(config)?),
        ))
    }

    /// Local descriptors only; never touches the network.
    pub fn descriptors(&self, input: &str) -> Result<DescriptorSet, ResolveError> {
        let mol = Molecule::from_smiles(input).map_err(|source| {
            debug!(input, error = %source, "rejected structure");
            ResolveError::InvalidStructure {
                input: input.to_string(),
                source,
            }
        })?;
        Ok(chem::descriptors(&mol))
    }

    pub async fn resolve(&self, input: &str) -> Result<ResolutionResult, ResolveError> {
        let descriptors = self.descriptors(input)?;
        debug!(
            input,
            molecular_weight = descriptors.molecular_weight,
            logp = descriptors.logp,
            "computed descriptors"
        );

        let encyclopedia = self.encyclopedia_stage(input).await;
        let database = self
            .database_stage(input, encyclopedia.resolved_query_name.as_deref())
            .await;

        Ok(ResolutionResult {
            input: input.to_string(),
            descriptors,
            encyclopedia,
            database,
        })
    }

    // ============================================================
    // Encyclopedia stage
    // ============================================================

    async fn encyclopedia_stage(&self, input: &str) -> EncyclopediaEntry {
        let query = self.query_name(input).await;
        debug!(query = %query, "encyclopedia stage");

        match self.encyclopedia.get_page(&query).await {
            Ok(Some(page)) => EncyclopediaEntry::from_page(&page, &query),
            Ok(None) => {
                debug!(query = %query, "no encyclopedia page");
                EncyclopediaEntry::not_found()
            }
            Err(e) => {
                warn!(query = %query, error = %e, "encyclopedia lookup failed");
                EncyclopediaEntry::lookup_failed(e)
            }
        }
    }

    /// The database's IUPAC name for `input`, or `input` itself.
    async fn query_name(&self, input: &str) -> String {
        match self.database.lookup_by_smiles(input).await {
            Ok(records) => {
                let name = records
                    .into_iter()
                    .next()
                    .and_then(|r| r.iupac_name)
                    .filter(|n| !n.trim().is_empty());
                match name {
                    Some(name) => {
                        info!(input, name = %name, "querying encyclopedia by IUPAC name");
                        name
                    }
                    None => input.to_string(),
                }
            }
            Err(e) => {
                warn!(input, error = %e, "name lookup failed, querying encyclopedia by input");
                input.to_string()
            }
        }
    }

    // ============================================================
    // Database stage
    // ============================================================

    async fn database_stage(&self, input: &str, name: Option<&str>) -> Option<DatabaseEntry> {
        debug!(input, "database stage");
        match self.find_compound(input, name).await {
            Ok(Some(record)) => Some(DatabaseEntry::from_record(&record)),
            Ok(None) => {
                debug!(input, "no compound record");
                None
            }
            Err(e) => {
                warn!(input, error = %e, "database lookup failed");
                None
            }
        }
    }

    /// A failed structure search ends the stage; only an empty one falls back
    /// to the name.
    async fn find_compound(
        &self,
        input: &str,
        name: Option<&str>,
    ) -> Result<Option<CompoundRecord>, LookupError> {
        let mut records = self.database.lookup_by_smiles(input).await?;
        if records.is_empty() {
            if let Some(name) = name {
                info!(input, name, "no record for structure, retrying by name");
                records = self.database.lookup_by_name(name).await?;
            }
        }
        Ok(records.into_iter().next())
    }
}
