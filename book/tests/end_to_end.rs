//! Book and registry wired together over one store, driven through the
//! named-operation dispatchers the way an outside caller would

use book::BookLedger;
use common::CallerIdentity;
use registry::SecurityRegistry;
use state_store::{Config, Store};
use std::sync::{Arc, Barrier};
use tempfile::TempDir;

fn setup() -> (BookLedger, Arc<SecurityRegistry>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.data_dir = temp_dir.path().to_path_buf();
    let store = Arc::new(Store::open(&config).unwrap());

    let registry = Arc::new(SecurityRegistry::new(
        store.clone(),
        registry::Config::default(),
    ));
    let book = BookLedger::new(store, registry.clone());

    (book, registry, temp_dir)
}

fn operator() -> CallerIdentity {
    CallerIdentity::new("depository")
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[test]
fn settlement_scenario() {
    let (book, _registry, _temp) = setup();

    book.dispatch("put", &strings(&["AC1", "D1", "SEC1", "100"]))
        .unwrap();
    book.dispatch("put", &strings(&["AC2", "D2", "SEC1", "50"]))
        .unwrap();

    let move_args = strings(&[
        "AC1", "D1", "AC2", "D2", "SEC1", "30", "ref", "2018-02-21", "dvp",
    ]);
    book.dispatch("move", &move_args).unwrap();

    book.dispatch("check", &strings(&["AC1", "D1", "SEC1", "70"]))
        .unwrap();
    book.dispatch("check", &strings(&["AC2", "D2", "SEC1", "80"]))
        .unwrap();

    // Replaying the identical instruction conflicts and moves nothing
    let err = book.dispatch("move", &move_args).unwrap_err();
    assert_eq!(err.status(), 409);
    book.dispatch("check", &strings(&["AC1", "D1", "SEC1", "70"]))
        .unwrap();
    assert_eq!(
        book.dispatch("check", &strings(&["AC1", "D1", "SEC1", "71"]))
            .unwrap_err()
            .status(),
        409
    );
    book.dispatch("check", &strings(&["AC2", "D2", "SEC1", "80"]))
        .unwrap();
}

#[test]
fn concurrent_moves_from_one_position_conserve_total() {
    let (book, _registry, _temp) = setup();
    let book = Arc::new(book);

    book.dispatch("put", &strings(&["AC1", "D1", "SEC1", "100"]))
        .unwrap();

    // Two settlements race for the same transferer balance; only one can fit
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["AC2", "AC4"]
        .into_iter()
        .map(|receiver| {
            let book = book.clone();
            let barrier = barrier.clone();
            let args = strings(&[
                "AC1", "D1", receiver, "D2", "SEC1", "70", "ref", "2018-02-21", "dvp",
            ]);
            std::thread::spawn(move || {
                barrier.wait();
                book.dispatch("move", &args).map(|_| ())
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    for outcome in &outcomes {
        if let Err(err) = outcome {
            assert_eq!(err.status(), 409);
        }
    }

    // 30 stayed put, 70 landed with exactly one receiver
    book.dispatch("check", &strings(&["AC1", "D1", "SEC1", "30"]))
        .unwrap();
    let payload = book.dispatch("query", &[]).unwrap().unwrap();
    let total: u64 = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["quantity"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 100);
}

#[test]
fn redemption_scenario_through_registry_lookup() {
    let (book, registry, _temp) = setup();

    // Redeemer designation lives in the registry
    registry
        .dispatch(&operator(), "put", &strings(&["SEC1", "active", "AC3", "D3"]))
        .unwrap();

    book.dispatch("put", &strings(&["AC1", "D1", "SEC1", "70"]))
        .unwrap();
    book.dispatch("put", &strings(&["AC2", "D2", "SEC1", "80"]))
        .unwrap();

    book.dispatch("redeem", &strings(&["SEC1", "buyback"]))
        .unwrap();

    book.dispatch("check", &strings(&["AC3", "D3", "SEC1", "150"]))
        .unwrap();
    book.dispatch("check", &strings(&["AC1", "D1", "SEC1", "0"]))
        .unwrap();
    book.dispatch("check", &strings(&["AC2", "D2", "SEC1", "0"]))
        .unwrap();

    let payload = book
        .dispatch("redeemHistory", &strings(&["SEC1"]))
        .unwrap()
        .unwrap();
    let records = payload.as_array().unwrap();
    assert_eq!(records.len(), 1);
    let instructions = records[0]["instructions"].as_array().unwrap();
    assert_eq!(instructions.len(), 2);
    let total: u64 = instructions
        .iter()
        .map(|i| i["quantity"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 150);
    assert!(instructions
        .iter()
        .all(|i| i["receiver"]["account"] == "AC3" && i["reference"] == "redeem"));

    // Redemption is exactly-once per security
    let err = book
        .dispatch("redeem", &strings(&["SEC1", "again"]))
        .unwrap_err();
    assert_eq!(err.status(), 409);
}

#[test]
fn redemption_fails_when_security_unregistered() {
    let (book, _registry, _temp) = setup();

    book.dispatch("put", &strings(&["AC1", "D1", "SEC1", "70"]))
        .unwrap();

    let err = book
        .dispatch("redeem", &strings(&["SEC1", "buyback"]))
        .unwrap_err();
    assert_eq!(err.status(), 500);

    // Nothing moved
    book.dispatch("check", &strings(&["AC1", "D1", "SEC1", "70"]))
        .unwrap();
}

#[test]
fn maturity_and_permissions() {
    let (_book, registry, _temp) = setup();

    registry
        .dispatch(&operator(), "put", &strings(&["SEC1", "active", "AC3", "D3"]))
        .unwrap();

    // Outsiders cannot submit calendar entries
    let outsider = CallerIdentity::new("broker");
    let err = registry
        .dispatch(
            &outsider,
            "addEntry",
            &strings(&["SEC1", "MCAL", "2018-06-01", "maturity", "r1"]),
        )
        .unwrap_err();
    assert_eq!(err.status(), 403);

    let payload = registry
        .dispatch(&operator(), "find", &strings(&["SEC1"]))
        .unwrap()
        .unwrap();
    assert_eq!(payload["status"], "active");
    assert_eq!(payload["entries"].as_array().unwrap().len(), 0);

    // The operator's maturity entry is terminal
    registry
        .dispatch(
            &operator(),
            "addEntry",
            &strings(&["SEC1", "MCAL", "2018-06-01", "maturity", "r1"]),
        )
        .unwrap();

    let payload = registry
        .dispatch(&operator(), "find", &strings(&["SEC1"]))
        .unwrap()
        .unwrap();
    assert_eq!(payload["status"], "matured");

    // Registry history shows both versions
    let history = registry
        .dispatch(&operator(), "history", &strings(&["SEC1"]))
        .unwrap()
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[test]
fn position_history_through_dispatch() {
    let (book, _registry, _temp) = setup();

    book.dispatch(
        "init",
        &strings(&[
            r#"[{"account":"AC1","division":"D1","security":"SEC1","quantity":"100"}]"#,
        ]),
    )
    .unwrap();
    book.dispatch("put", &strings(&["AC1", "D1", "SEC1", "25"]))
        .unwrap();

    let payload = book
        .dispatch("history", &strings(&["AC1", "D1", "SEC1"]))
        .unwrap()
        .unwrap();
    let versions = payload.as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["value"]["quantity"], 100);
    assert_eq!(versions[1]["value"]["quantity"], 25);
    assert!(versions[0]["txId"].as_str().is_some());
}
