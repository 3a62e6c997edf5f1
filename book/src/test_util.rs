//! Shared test fixtures

use crate::BookLedger;
use common::{Balance, LookupError, SecurityLookup, SecurityTerms};
use state_store::{Config, Store};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Lookup backed by a fixed map, standing in for the registry
pub(crate) struct FixedTerms(HashMap<String, SecurityTerms>);

impl SecurityLookup for FixedTerms {
    fn find_terms(&self, security: &str) -> Result<SecurityTerms, LookupError> {
        self.0
            .get(security)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(security.to_string()))
    }
}

/// Book over a temp store, with redeemer terms for the given securities
pub(crate) fn test_book(terms: &[(&str, &str, &str)]) -> (BookLedger, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.data_dir = temp_dir.path().to_path_buf();
    let store = Arc::new(Store::open(&config).unwrap());

    let terms = FixedTerms(
        terms
            .iter()
            .map(|(security, account, division)| {
                (
                    security.to_string(),
                    SecurityTerms {
                        status: "active".to_string(),
                        redeem: Balance::new(*account, *division),
                    },
                )
            })
            .collect(),
    );

    (BookLedger::new(store, Arc::new(terms)), temp_dir)
}
