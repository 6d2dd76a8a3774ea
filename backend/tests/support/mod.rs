#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use shopkeep::db::{DataService, LocalRepository, ServiceConfig};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Every variable the store and service configuration reads.
pub const CONFIG_VARS: [&str; 12] = [
    "REPOSITORY_TYPE",
    "DB_HOST",
    "DB_PORT",
    "DB_DATABASE",
    "DB_CONN_TIMEOUT_SEC",
    "DB_USER_COLLECTION",
    "DB_CAMPAIGN_COLLECTION",
    "DB_CHARACTER_COLLECTION",
    "DB_SHOP_COLLECTION",
    "DB_ITEM_COLLECTION",
    "DB_OPERATION_TIMEOUT_MS",
    "DB_HEALTH_TIMEOUT_MS",
];

/// Like [`with_scoped_env`], but first clears every configuration variable.
pub fn with_clean_config_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut all: Vec<(&str, Option<&str>)> = CONFIG_VARS
        .iter()
        .filter(|k| !changes.iter().any(|(c, _)| c == *k))
        .map(|k| (*k, None))
        .collect();
    all.extend_from_slice(changes);
    with_scoped_env(&all, f)
}

/// Data service over a fresh in-memory store, plus a handle to that store.
pub fn local_service() -> (DataService, LocalRepository) {
    let store = LocalRepository::new();
    let service = DataService::new(Arc::new(store.clone()), ServiceConfig::default());
    (service, store)
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
