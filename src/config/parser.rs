use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::fs;
use std::path::Path;

/// Parses and validates configuration from TOML text
pub fn parse_config(raw: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(raw)?;
    validate(&config)?;
    Ok(config)
}

/// Loads and validates a configuration file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path)?;
    parse_config(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        [mirror]
        base-url = "https://example.net/site/"
        roots = ["index.html", "extra/page.html"]

        [output]
        directory = "out"
        branch = "mirror"
        use-original-names = true
        manifest-path = "files.txt"
    "#;

    #[test]
    fn parses_a_full_config() {
        let config = parse_config(VALID).unwrap();
        assert_eq!(config.mirror.base_url, "https://example.net/site/");
        assert_eq!(config.mirror.roots, vec!["index.html", "extra/page.html"]);
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.output.branch, "mirror");
        assert!(config.output.use_original_names);
        assert!(!config.output.skip_git);
        assert_eq!(config.output.manifest_path.as_deref(), Some("files.txt"));
    }

    #[test]
    fn defaults_apply() {
        let config = parse_config(
            r#"
            [mirror]
            base-url = "https://example.net/"

            [output]
            directory = "out"
            "#,
        )
        .unwrap();
        assert_eq!(config.mirror.roots, vec!["index.html"]);
        assert_eq!(config.output.branch, "master");
        assert!(!config.output.use_original_names);
        assert!(!config.output.skip_git);
        assert_eq!(config.output.manifest_path, None);
    }

    #[test]
    fn invalid_base_url_fails_validation() {
        let result = parse_config(
            r#"
            [mirror]
            base-url = "https://example.net/site"

            [output]
            directory = "out"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            parse_config("not toml at all ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_config_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.toml");
        std::fs::write(&path, VALID).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.output.directory, "out");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/mirror.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
