//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// `${VAR}` must be set; `${VAR:-default}` falls back to `default`.
/// Bare `$VAR` is left untouched so URLs containing `$` survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.0),
    })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("GROUPIE_HOST_TEST", "api.example.com");
        }
        let result = expand_env("https://${GROUPIE_HOST_TEST}/v1", "api.base_url").unwrap();
        assert_eq!(result, "https://api.example.com/v1");
        unsafe {
            std::env::remove_var("GROUPIE_HOST_TEST");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("GROUPIE_LANG_UNSET");
        }
        let result = expand_env("${GROUPIE_LANG_UNSET:-en}", "i18n.default_lang").unwrap();
        assert_eq!(result, "en");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("GROUPIE_MISSING_TEST");
        }
        let err = expand_env("${GROUPIE_MISSING_TEST}", "api.base_url").unwrap_err();
        assert!(err.to_string().contains("GROUPIE_MISSING_TEST"));
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("http://api.test/$path", "api.base_url").unwrap();
        assert_eq!(result, "http://api.test/$path");
    }
}
