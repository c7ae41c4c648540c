use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{MindbreezeError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_endpoint(config, &mut errors);
        Self::validate_request(config, &mut errors);
        Self::validate_datasources(config, &mut errors);
        Self::validate_storage(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MindbreezeError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_endpoint(config: &Config, errors: &mut Vec<ValidationError>) {
        let url = &config.endpoint.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::new(
                "endpoint.url",
                format!("URL must start with http:// or https://, got '{}'", url),
            ));
        }

        if config.endpoint.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "endpoint.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }
    }

    fn validate_request(config: &Config, errors: &mut Vec<ValidationError>) {
        let request = &config.request;
        let counts = [
            ("request.per_page", request.per_page),
            ("request.page_count", request.page_count),
            ("request.alternatives", request.alternatives),
            ("request.content_sample_length", request.content_sample_length),
        ];

        for (path, value) in counts {
            if value == 0 {
                errors.push(ValidationError::new(path, "Value must be greater than 0"));
            }
        }

        if request.properties.iter().any(|name| name.trim().is_empty()) {
            errors.push(ValidationError::new(
                "request.properties",
                "Property names cannot be empty",
            ));
        }

        if request.facets.iter().any(|name| name.trim().is_empty()) {
            errors.push(ValidationError::new(
                "request.facets",
                "Facet names cannot be empty",
            ));
        }
    }

    fn validate_datasources(config: &Config, errors: &mut Vec<ValidationError>) {
        for (name, ids) in &config.datasources {
            if ids.is_empty() {
                errors.push(ValidationError::new(
                    format!("datasources.{}", name),
                    "Datasource constraint must list at least one datasource",
                ));
            } else if ids.iter().any(|id| id.trim().is_empty()) {
                errors.push(ValidationError::new(
                    format!("datasources.{}", name),
                    "Datasource ids cannot be empty",
                ));
            }
        }
    }

    fn validate_storage(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.storage.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.data_dir",
                "Data directory cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.endpoint.url = "ftp://search".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_zero_counts_are_all_reported() {
        let mut config = Config::default();
        config.request.per_page = 0;
        config.request.page_count = 0;

        match ConfigValidator::validate(&config) {
            Err(MindbreezeError::ConfigValidation { errors }) => {
                let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
                assert_eq!(paths, vec!["request.per_page", "request.page_count"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_datasource_list() {
        let mut config = Config::default();
        config.datasources.insert("empty".to_string(), Vec::new());
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_empty_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = PathBuf::new();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
