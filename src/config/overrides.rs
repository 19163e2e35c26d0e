//! Environment variable overrides for configuration.

use crate::errors::Error;

use super::Config;
use super::env_parser::{apply_override, parse_env_number, parse_env_path, parse_env_string};

/// Apply `MEMORIA_*` environment variable overrides to configuration.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), Error> {
    apply_override("MEMORIA_CHROMA_URL", &mut config.chroma_url, parse_env_string)?;
    apply_override("MEMORIA_TENANT", &mut config.tenant, parse_env_string)?;
    apply_override("MEMORIA_DATABASE", &mut config.database, parse_env_string)?;
    apply_override("MEMORIA_COLLECTION", &mut config.collection, parse_env_string)?;
    apply_override(
        "MEMORIA_EMBEDDING_MODEL",
        &mut config.embedding_model,
        parse_env_string,
    )?;
    apply_override(
        "MEMORIA_EMBEDDING_DIMS",
        &mut config.embedding_dims,
        parse_env_number::<usize>,
    )?;
    apply_override("MEMORIA_MODEL_CACHE", &mut config.model_cache, parse_env_path)?;
    apply_override(
        "MEMORIA_SEARCH_LIMIT",
        &mut config.search_limit,
        parse_env_number::<usize>,
    )?;
    apply_override(
        "MEMORIA_REQUEST_TIMEOUT_SECS",
        &mut config.request_timeout_secs,
        parse_env_number::<u64>,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_utils::{ENV_MUTEX, ENV_VARS, cleanup_env_vars, set_env_var};
    use std::path::PathBuf;

    #[test]
    fn test_env_var_overrides_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(ENV_VARS);

        set_env_var("MEMORIA_CHROMA_URL", "http://chroma:8000");
        set_env_var("MEMORIA_COLLECTION", "env-collection");
        set_env_var("MEMORIA_EMBEDDING_MODEL", "env/model");
        set_env_var("MEMORIA_EMBEDDING_DIMS", "768");
        set_env_var("MEMORIA_MODEL_CACHE", "/custom/cache");
        set_env_var("MEMORIA_SEARCH_LIMIT", "12");

        let mut config = Config::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.chroma_url, "http://chroma:8000");
        assert_eq!(config.collection, "env-collection");
        assert_eq!(config.embedding_model, "env/model");
        assert_eq!(config.embedding_dims, 768);
        assert_eq!(config.model_cache, PathBuf::from("/custom/cache"));
        assert_eq!(config.search_limit, 12);
        assert_eq!(config.tenant, "default_tenant");

        cleanup_env_vars(ENV_VARS);
    }

    #[test]
    fn test_invalid_dims_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(ENV_VARS);

        set_env_var("MEMORIA_EMBEDDING_DIMS", "lots");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);

        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars(ENV_VARS);
    }

    #[test]
    fn test_empty_env_var_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(ENV_VARS);

        set_env_var("MEMORIA_CHROMA_URL", "");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);

        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars(ENV_VARS);
    }

    #[test]
    fn test_whitespace_env_var_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(ENV_VARS);

        set_env_var("MEMORIA_EMBEDDING_MODEL", "   ");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);

        assert!(matches!(result, Err(Error::Config(_))));

        cleanup_env_vars(ENV_VARS);
    }

    #[test]
    fn test_timeout_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars(ENV_VARS);

        set_env_var("MEMORIA_REQUEST_TIMEOUT_SECS", "5");

        let mut config = Config::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.request_timeout_secs, 5);

        cleanup_env_vars(ENV_VARS);
    }
}
