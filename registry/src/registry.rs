//! Security Registry engine

use crate::{
    types::{CalendarEntry, Security, SecurityValue, MATURED_STATUS, MATURITY_ENTRY_CODE, SECURITY_NS},
    Error, Result,
};
use common::{
    Balance, CallerIdentity, LookupError, SecurityLookup, SecurityTerms,
};
use state_store::{CompositeKey, KeyModification, Store, Transaction};
use std::sync::Arc;

/// Security registry
pub struct SecurityRegistry {
    /// Shared transactional store
    store: Arc<Store>,

    /// Organization allowed to submit calendar entries
    operator_org: String,
}

impl SecurityRegistry {
    /// Create registry over a store
    pub fn new(store: Arc<Store>, config: crate::Config) -> Self {
        Self {
            store,
            operator_org: config.operator_org,
        }
    }

    /// Create or overwrite a security's status and redeemer designation
    ///
    /// An existing security keeps its calendar entries.
    pub fn put(
        &self,
        security: &str,
        status: &str,
        redeem_account: &str,
        redeem_division: &str,
    ) -> Result<()> {
        let mut txn = self.store.begin();

        let mut record = match self.load(&txn, security)? {
            Some(existing) => existing,
            None => Security {
                security: security.to_string(),
                status: String::new(),
                entries: Vec::new(),
                redeem: Balance::default(),
            },
        };

        record.status = status.to_string();
        record.redeem = Balance::new(redeem_account, redeem_division);

        self.save(&mut txn, &record)?;
        txn.commit()?;

        tracing::info!(security, status, "Security put");
        Ok(())
    }

    /// Append a calendar entry, operator-only
    ///
    /// A maturity-code entry forces the status to `matured`; nothing
    /// reverses that transition here.
    pub fn add_entry(
        &self,
        caller: &CallerIdentity,
        security: &str,
        code: &str,
        date: &str,
        text: &str,
        reference: &str,
    ) -> Result<()> {
        if caller.organization != self.operator_org {
            return Err(Error::Permission(format!(
                "Insufficient privileges. Only {} can add Calendar Entry",
                self.operator_org
            )));
        }

        let mut txn = self.store.begin();

        let mut record = self
            .load(&txn, security)?
            .ok_or_else(|| Error::NotFound(format!("Security not found: {}", security)))?;

        record.entries.push(CalendarEntry {
            date: date.to_string(),
            code: code.to_string(),
            text: text.to_string(),
            reference: reference.to_string(),
        });

        if code == MATURITY_ENTRY_CODE {
            record.status = MATURED_STATUS.to_string();
        }

        self.save(&mut txn, &record)?;
        txn.commit()?;

        tracing::info!(security, code, "Calendar entry added");
        Ok(())
    }

    /// Return one security
    pub fn find(&self, security: &str) -> Result<Security> {
        let txn = self.store.begin();
        self.load(&txn, security)?
            .ok_or_else(|| Error::NotFound(format!("Security not found: {}", security)))
    }

    /// Return all securities, reconstructed from key parts plus value
    pub fn query(&self) -> Result<Vec<Security>> {
        let prefix = CompositeKey::prefix(SECURITY_NS, &[])?;

        let mut securities = Vec::new();
        for (key, value) in self.store.scan_prefix(&prefix)? {
            let key = CompositeKey::decode(&key)?;
            let id = key.parts.first().ok_or_else(|| {
                Error::Store(state_store::Error::Key(
                    "security key without id part".to_string(),
                ))
            })?;
            let value: SecurityValue = serde_json::from_slice(&value)?;
            securities.push(Security::from_value(id.clone(), value));
        }

        Ok(securities)
    }

    /// Replay every committed version of one security
    pub fn history(&self, security: &str) -> Result<Vec<KeyModification>> {
        let key = CompositeKey::new(SECURITY_NS, &[security])?.encode();

        let mut modifications = Vec::new();
        for entry in self.store.history(&key)? {
            modifications.push(entry?);
        }

        Ok(modifications)
    }

    fn load(&self, txn: &Transaction, security: &str) -> Result<Option<Security>> {
        let key = CompositeKey::new(SECURITY_NS, &[security])?.encode();

        match txn.get(&key)? {
            Some(bytes) => {
                let value: SecurityValue = serde_json::from_slice(&bytes)?;
                Ok(Some(Security::from_value(security, value)))
            }
            None => Ok(None),
        }
    }

    fn save(&self, txn: &mut Transaction, record: &Security) -> Result<()> {
        let key = CompositeKey::new(SECURITY_NS, &[&record.security])?.encode();
        txn.put(key, serde_json::to_vec(&record.to_value())?);
        Ok(())
    }
}

impl SecurityLookup for SecurityRegistry {
    fn find_terms(&self, security: &str) -> std::result::Result<SecurityTerms, LookupError> {
        match self.find(security) {
            Ok(record) => Ok(SecurityTerms {
                status: record.status,
                redeem: record.redeem,
            }),
            Err(Error::NotFound(_)) => Err(LookupError::NotFound(security.to_string())),
            Err(e) => Err(LookupError::Unavailable(e.to_string())),
        }
    }
}

impl std::fmt::Debug for SecurityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityRegistry")
            .field("operator_org", &self.operator_org)
            .finish_non_exhaustive()
    }
}
