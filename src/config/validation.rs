use crate::config::types::{Config, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    parse_base_origin(&config.mirror.base_url)?;
    validate_roots(&config.mirror.roots)?;
    validate_output(&config.output)?;
    Ok(())
}

/// Parses and checks the base origin. The constraints make the
/// URL-to-relative-path mapping of the frontier well defined.
pub fn parse_base_origin(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidBaseUrl(format!("\"{}\": {}", raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidBaseUrl(
            "base URL must be an HTTP URL (http:, https:)".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        return Err(ConfigError::InvalidBaseUrl(
            "base URL must end in a slash (/)".to_string(),
        ));
    }
    if url.query().is_some() {
        return Err(ConfigError::InvalidBaseUrl(
            "base URL must not have query parameters (?)".to_string(),
        ));
    }
    if url.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl(
            "base URL must not have a fragment identifier (#)".to_string(),
        ));
    }
    Ok(url)
}

fn validate_roots(roots: &[String]) -> Result<(), ConfigError> {
    if roots.is_empty() {
        return Err(ConfigError::Validation(
            "at least one root is required".to_string(),
        ));
    }
    if roots.iter().any(|root| root.is_empty()) {
        return Err(ConfigError::Validation(
            "roots must not be empty strings".to_string(),
        ));
    }
    Ok(())
}

fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
    if output.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    if output.branch.is_empty() {
        return Err(ConfigError::Validation("branch cannot be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_base_origins() {
        assert!(parse_base_origin("https://example.net/").is_ok());
        assert!(parse_base_origin("https://example.net/site/").is_ok());
        assert!(parse_base_origin("http://127.0.0.1:8080/").is_ok());
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(matches!(
            parse_base_origin("ftp://example.net/"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn rejects_missing_trailing_slash() {
        assert!(parse_base_origin("https://example.net/site").is_err());
    }

    #[test]
    fn rejects_query_and_fragment() {
        assert!(parse_base_origin("https://example.net/site/?x=1").is_err());
        assert!(parse_base_origin("https://example.net/site/#top").is_err());
    }

    #[test]
    fn rejects_malformed_url() {
        assert!(parse_base_origin("not a url").is_err());
    }
}
