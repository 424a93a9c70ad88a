//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Provider identifier → environment variables to try, in order
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("xai", vec!["XAI_API_KEY"]);
    m.insert("deepseek", vec!["DEEPSEEK_API_KEY"]);
    m.insert("mistral", vec!["MISTRAL_API_KEY"]);
    m.insert("azure", vec!["AZURE_API_KEY", "AZURE_OPENAI_API_KEY"]);
    m.insert("openrouter", vec!["OPENROUTER_API_KEY"]);
    m.insert("ollama", vec![]);
    m
});

/// Read-only secret store backed by the process environment
///
/// Lookup order for a key:
/// 1. the key itself as a variable name (`OPENAI_API_KEY`)
/// 2. the variables mapped to a known provider (`gemini` → `GEMINI_API_KEY`, `GOOGLE_API_KEY`)
/// 3. `{KEY}_API_KEY`
///
/// Empty values count as unset.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Environment variables consulted for a known provider
    pub fn env_vars_for_provider(provider: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(provider.to_lowercase().as_str()).map(|v| v.as_slice())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = non_empty_var(key) {
            return Some(value);
        }

        if let Some(vars) = Self::env_vars_for_provider(key) {
            if let Some(value) = vars.iter().find_map(|var| non_empty_var(var)) {
                return Some(value);
            }
        }

        non_empty_var(&format!("{}_API_KEY", key.to_uppercase()))
    }

    fn store(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }

    fn delete(&self, _key: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_read_only() {
        let store = EnvSecretStore::new();
        assert_eq!(store.name(), "env");
        assert!(matches!(store.store("test", "value"), Err(SecretStoreError::ReadOnly)));
        assert!(matches!(store.delete("test"), Err(SecretStoreError::ReadOnly)));
    }

    #[test]
    fn test_env_store_get_direct() {
        env::set_var("MCPCHAT_TEST_SECRET_DIRECT", "direct_value");

        let store = EnvSecretStore::new();
        assert_eq!(
            store.get("MCPCHAT_TEST_SECRET_DIRECT"),
            Some("direct_value".to_string())
        );

        env::remove_var("MCPCHAT_TEST_SECRET_DIRECT");
    }

    #[test]
    fn test_env_store_get_suffixed() {
        env::set_var("MCPCHAT_TEST_PROVIDER_API_KEY", "suffixed");

        let store = EnvSecretStore::new();
        assert_eq!(
            store.get("mcpchat_test_provider"),
            Some("suffixed".to_string())
        );
        assert!(store.require("mcpchat_test_provider").is_ok());

        env::remove_var("MCPCHAT_TEST_PROVIDER_API_KEY");
    }

    #[test]
    fn test_env_store_empty_counts_as_unset() {
        env::set_var("MCPCHAT_TEST_EMPTY_SECRET", "");

        let store = EnvSecretStore::new();
        assert!(!store.has("MCPCHAT_TEST_EMPTY_SECRET"));

        env::remove_var("MCPCHAT_TEST_EMPTY_SECRET");
    }

    #[test]
    fn test_env_store_not_found() {
        let store = EnvSecretStore::new();
        assert_eq!(store.get("nonexistent_provider_xyz"), None);
        assert!(matches!(
            store.require("nonexistent_provider_xyz"),
            Err(SecretStoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_provider_mapping() {
        assert_eq!(
            EnvSecretStore::env_vars_for_provider("Gemini"),
            Some(&["GEMINI_API_KEY", "GOOGLE_API_KEY"][..])
        );
        assert_eq!(EnvSecretStore::env_vars_for_provider("ollama"), Some(&[][..]));
        assert!(EnvSecretStore::env_vars_for_provider("unknown").is_none());
    }
}
