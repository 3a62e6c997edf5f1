//! Named-operation dispatch for the book
//!
//! Callers address the book by function name with positional string
//! arguments. Argument counts and formats are validated before any state is
//! touched; every operation then runs as one atomic unit.

use crate::{BookLedger, Error, Result};
use common::Instruction;
use serde_json::Value;
use state_store::KeyModification;

impl BookLedger {
    /// Route one named operation
    ///
    /// Returns the operation's JSON payload, or `None` for void successes.
    pub fn dispatch(&self, function: &str, args: &[String]) -> Result<Option<Value>> {
        tracing::debug!(function, args = args.len(), "Book invoke");

        match function {
            "put" => {
                let [account, division, security, quantity] = expect_args::<4>(
                    args,
                    "Expecting account, division, security, quantity",
                )?;
                self.put(account, division, security, parse_quantity(quantity)?)?;
                Ok(None)
            }
            "check" => {
                let [account, division, security, quantity] = expect_args::<4>(
                    args,
                    "Expecting account, division, security, quantity",
                )?;
                self.check(account, division, security, parse_quantity(quantity)?)?;
                Ok(None)
            }
            "move" => {
                let instruction = Instruction::from_args(args)?;
                self.settle(instruction)?;
                Ok(None)
            }
            "query" => {
                expect_args::<0>(args, "Expecting no arguments")?;
                Ok(Some(serde_json::to_value(self.find(None)?)?))
            }
            "history" => {
                let [account, division, security] =
                    expect_args::<3>(args, "Expecting account, division, security")?;
                let versions = self
                    .history(account, division, security)?
                    .collect::<std::result::Result<Vec<KeyModification>, _>>()?;
                Ok(Some(serde_json::to_value(versions)?))
            }
            "redeem" => {
                let [security, reason] = expect_args::<2>(args, "Expecting security, reason")?;
                self.redeem(security, reason)?;
                Ok(None)
            }
            "redeemHistory" => {
                // Any leading composite-key parts narrow the scan
                Ok(Some(serde_json::to_value(self.redeem_history(args)?)?))
            }
            "init" => {
                let [positions_json] = expect_args::<1>(args, "Expecting positions JSON")?;
                self.init(positions_json)?;
                Ok(None)
            }
            other => Err(Error::Validation(format!(
                "Unknown function, must be one of: put, move, check, query, history, redeem, \
                 redeemHistory. But got: {}",
                other
            ))),
        }
    }
}

fn expect_args<'a, const N: usize>(args: &'a [String], expected: &str) -> Result<[&'a str; N]> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    args.try_into().map_err(|_| {
        Error::Validation(format!("Incorrect number of arguments. {}", expected))
    })
}

fn parse_quantity(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| Error::Validation(format!("Invalid quantity {:?}", raw)))
}
