//! Depo book CLI
//!
//! Dispatches one named operation against the book or the security
//! registry:
//!
//! ```text
//! bookctl book put AC1 D1 SEC1 100
//! bookctl security addEntry SEC1 MCAL 2018-06-01 maturity ref1
//! ```
//!
//! `BOOK_DATA_DIR` selects the store, `REGISTRY_OPERATOR_ORG` the trusted
//! calendar submitter, and `BOOK_CALLER_ORG` the organization this
//! invocation runs as.

use anyhow::{bail, Context};
use book::BookLedger;
use common::CallerIdentity;
use registry::SecurityRegistry;
use state_store::Store;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(target), Some(function)) = (args.next(), args.next()) else {
        bail!("usage: bookctl <book|security> <function> [args...]");
    };
    let args: Vec<String> = args.collect();

    let config = state_store::Config::from_env().context("loading store config")?;
    let store = Arc::new(Store::open(&config).context("opening store")?);

    let registry = Arc::new(SecurityRegistry::new(
        store.clone(),
        registry::Config::from_env(),
    ));
    let caller = CallerIdentity::new(
        std::env::var("BOOK_CALLER_ORG").unwrap_or_else(|_| "anonymous".to_string()),
    );

    let payload = match target.as_str() {
        "book" => {
            let book = BookLedger::new(store, registry);
            book.dispatch(&function, &args)
                .map_err(|e| anyhow::anyhow!("[{}] {}", e.status(), e))?
        }
        "security" => registry
            .dispatch(&caller, &function, &args)
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.status(), e))?,
        other => bail!("unknown target {:?}, expected book or security", other),
    };

    match payload {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("ok"),
    }

    Ok(())
}
