//! Shared test utilities for config module tests.

use std::sync::Mutex;

/// Mutex to serialize environment variable tests and prevent race conditions.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Every environment variable read by the config loader.
pub const ENV_VARS: &[&str] = &[
    "MEMORIA_CONFIG",
    "MEMORIA_CHROMA_URL",
    "MEMORIA_TENANT",
    "MEMORIA_DATABASE",
    "MEMORIA_COLLECTION",
    "MEMORIA_EMBEDDING_MODEL",
    "MEMORIA_EMBEDDING_DIMS",
    "MEMORIA_MODEL_CACHE",
    "MEMORIA_SEARCH_LIMIT",
    "MEMORIA_REQUEST_TIMEOUT_SECS",
];

/// Set an environment variable. Callers must hold [`ENV_MUTEX`].
pub fn set_env_var(name: &str, value: &str) {
    // SAFETY: env tests are serialized through ENV_MUTEX.
    unsafe { std::env::set_var(name, value) };
}

/// Clean up environment variables used by memoria config.
pub fn cleanup_env_vars(vars: &[&str]) {
    for var in vars {
        // SAFETY: env tests are serialized through ENV_MUTEX.
        unsafe { std::env::remove_var(var) };
    }
}
