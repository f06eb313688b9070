use crate::error::{EnrichmentError, Result};
use crate::utils::constants::{CREDENTIAL_KEY, CREDENTIAL_SECTION};
use config::{Config, File, FileFormat, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Geocoding API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let key = raw.trim();

        if key.is_empty() {
            return Err(EnrichmentError::Credential("API key is empty".to_string()));
        }

        if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EnrichmentError::Credential(
                "API key must contain only ASCII letters and digits".to_string(),
            ));
        }

        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Load the API key from an INI file with a `[DEFAULT]` section holding
/// `OpenCageApiKey`. Section and key names match case-insensitively.
pub fn load_api_key(path: &Path) -> Result<ApiKey> {
    if !path.is_file() {
        return Err(EnrichmentError::Credential(format!(
            "Credential file not found: {}",
            path.display()
        )));
    }

    let name = path.to_str().ok_or_else(|| {
        EnrichmentError::Credential(format!("Non UTF-8 credential path: {}", path.display()))
    })?;

    let settings = Config::builder()
        .add_source(File::new(name, FileFormat::Ini))
        .build()?;

    let sections: HashMap<String, Value> = settings.try_deserialize()?;
    let section = sections
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(CREDENTIAL_SECTION))
        .map(|(_, value)| value)
        .ok_or_else(|| {
            EnrichmentError::Credential(format!(
                "Section [{}] missing from {}",
                CREDENTIAL_SECTION,
                path.display()
            ))
        })?;

    let raw = section
        .into_table()?
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(CREDENTIAL_KEY))
        .map(|(_, value)| value)
        .ok_or_else(|| {
            EnrichmentError::Credential(format!(
                "Key {} missing from section [{}]",
                CREDENTIAL_KEY, CREDENTIAL_SECTION
            ))
        })?
        .into_string()?;

    ApiKey::parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ini(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_api_key() {
        assert_eq!(ApiKey::parse(" abc123DEF ").unwrap().expose(), "abc123DEF");
        assert!(ApiKey::parse("").is_err());
        assert!(ApiKey::parse("   ").is_err());
        assert!(ApiKey::parse("abc 123").is_err());
        assert!(ApiKey::parse("abc-123").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = ApiKey::parse("secret42").unwrap();
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
    }

    #[test]
    fn test_load_api_key() {
        let file = ini("[DEFAULT]\nOpenCageApiKey = 0123456789abcdef\n");
        let key = load_api_key(file.path()).unwrap();
        assert_eq!(key.expose(), "0123456789abcdef");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_api_key(Path::new("no/such/config.ini"));
        assert!(matches!(result, Err(EnrichmentError::Credential(_))));
    }

    #[test]
    fn test_load_missing_key() {
        let file = ini("[DEFAULT]\nOtherKey = value\n");
        let result = load_api_key(file.path());
        assert!(matches!(result, Err(EnrichmentError::Credential(_))));
    }

    #[test]
    fn test_load_missing_section() {
        let file = ini("[other]\nOpenCageApiKey = abc\n");
        let result = load_api_key(file.path());
        assert!(matches!(result, Err(EnrichmentError::Credential(_))));
    }

    #[test]
    fn test_load_malformed_key() {
        let file = ini("[DEFAULT]\nOpenCageApiKey = not a key!\n");
        assert!(load_api_key(file.path()).is_err());
    }
}
