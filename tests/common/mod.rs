//! Stub external clients shared by the integration specs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use molecule_finder::lookup::{CompoundDatabase, Encyclopedia, LookupError};
use molecule_finder::models::{CompoundRecord, Page};
use molecule_finder::resolver::Resolver;

pub const ASPIRIN: &str = "CC(=O)OC1=CC=CC=C1C(=O)O";
pub const ASPIRIN_IUPAC: &str = "2-acetyloxybenzoic acid";

/// `None` makes the stub fail the call.
type Reply = Option<Vec<CompoundRecord>>;

pub struct StubDatabase {
    by_smiles: Reply,
    by_name: Reply,
    calls: Mutex<Vec<String>>,
}

impl StubDatabase {
    pub fn empty() -> Self {
        Self {
            by_smiles: Some(Vec::new()),
            by_name: Some(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_smiles(mut self, records: Vec<CompoundRecord>) -> Self {
        self.by_smiles = Some(records);
        self
    }

    pub fn with_name(mut self, records: Vec<CompoundRecord>) -> Self {
        self.by_name = Some(records);
        self
    }

    pub fn failing_smiles(mut self) -> Self {
        self.by_smiles = None;
        self
    }

    pub fn failing_name(mut self) -> Self {
        self.by_name = None;
        self
    }

    /// Calls so far, as `smiles:<key>` or `name:<key>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn reply(&self, call: String, reply: &Reply) -> Result<Vec<CompoundRecord>, LookupError> {
        self.calls.lock().unwrap().push(call);
        reply.clone().ok_or(LookupError::Timeout)
    }
}

#[async_trait]
impl CompoundDatabase for StubDatabase {
    async fn lookup_by_smiles(&self, smiles: &str) -> Result<Vec<CompoundRecord>, LookupError> {
        self.reply(format!("smiles:{}", smiles), &self.by_smiles)
    }

    async fn lookup_by_name(&self, name: &str) -> Result<Vec<CompoundRecord>, LookupError> {
        self.reply(format!("name:{}", name), &self.by_name)
    }
}

pub struct StubEncyclopedia {
    pages: HashMap<String, Page>,
    failing: bool,
    queries: Mutex<Vec<String>>,
}

impl StubEncyclopedia {
    pub fn empty() -> Self {
        Self {
            pages: HashMap::new(),
            failing: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::empty()
        }
    }

    pub fn with_page(mut self, title: &str, summary: &str) -> Self {
        self.pages.insert(
            title.to_string(),
            Page {
                title: title.to_string(),
                summary: summary.to_string(),
                full_url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
            },
        );
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Encyclopedia for StubEncyclopedia {
    async fn get_page(&self, query: &str) -> Result<Option<Page>, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing {
            return Err(LookupError::Decode("unexpected body".to_string()));
        }
        Ok(self.pages.get(query).cloned())
    }
}

pub fn aspirin_record() -> CompoundRecord {
    CompoundRecord {
        cid: 2244,
        iupac_name: Some(ASPIRIN_IUPAC.to_string()),
        molecular_formula: Some("C9H8O4".to_string()),
        molecular_weight: Some("180.16".to_string()),
        canonical_smiles: Some(ASPIRIN.to_string()),
    }
}

pub fn resolver(db: &Arc<StubDatabase>, wiki: &Arc<StubEncyclopedia>) -> Resolver {
    Resolver::new(db.clone(), wiki.clone())
}
