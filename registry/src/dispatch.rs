//! Named-operation dispatch for the registry
//!
//! Callers address the registry by function name with positional string
//! arguments. Argument counts are validated before any state is touched.

use crate::{Error, Result, SecurityRegistry};
use common::CallerIdentity;
use serde_json::Value;

impl SecurityRegistry {
    /// Route one named operation
    ///
    /// Returns the operation's JSON payload, or `None` for void successes.
    pub fn dispatch(
        &self,
        caller: &CallerIdentity,
        function: &str,
        args: &[String],
    ) -> Result<Option<Value>> {
        tracing::debug!(function, args = args.len(), "Registry invoke");

        match function {
            // Initial load is a plain put
            "put" | "init" => {
                let [security, status, account, division] = expect_args::<4>(
                    args,
                    "Expecting security, status, redeem account, redeem division",
                )?;
                self.put(security, status, account, division)?;
                Ok(None)
            }
            "addEntry" => {
                let [security, code, date, text, reference] =
                    expect_args::<5>(args, "Expecting security, code, date, text, reference")?;
                self.add_entry(caller, security, code, date, text, reference)?;
                Ok(None)
            }
            "find" => {
                let [security] = expect_args::<1>(args, "Expecting security")?;
                Ok(Some(serde_json::to_value(self.find(security)?)?))
            }
            "query" => {
                expect_args::<0>(args, "Expecting no arguments")?;
                Ok(Some(serde_json::to_value(self.query()?)?))
            }
            "history" => {
                let [security] = expect_args::<1>(args, "Expecting security")?;
                Ok(Some(serde_json::to_value(self.history(security)?)?))
            }
            other => Err(Error::Validation(format!(
                "Unknown function, must be one of: put, addEntry, find, query, history. \
                 But got: {}",
                other
            ))),
        }
    }
}

fn expect_args<'a, const N: usize>(
    args: &'a [String],
    expected: &str,
) -> Result<[&'a str; N]> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    args.try_into().map_err(|_| {
        Error::Validation(format!("Incorrect number of arguments. {}", expected))
    })
}
