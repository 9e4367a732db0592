use core::result::Result as CoreResult;
use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;
use toml::de::Error as TomlDeError;
use toml::ser::Error as TomlSerError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlDeError),

    /// TOML serialization failed.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] TomlSerError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The specified configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// A string does not have the `<version>-commit-<hash>` shape.
    #[error("Invalid commit baseline '{0}': expected <version>-commit-<short-hash>")]
    InvalidBaseline(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let error1 = Error::Config("missing remote".to_owned());
        assert_eq!(error1.to_string(), "Configuration error: missing remote");

        let error2 = Error::InvalidBaseline("5.1".to_owned());
        assert_eq!(
            error2.to_string(),
            "Invalid commit baseline '5.1': expected <version>-commit-<short-hash>"
        );

        let error3 = Error::ConfigNotFound(PathBuf::from("baseline.toml"));
        assert_eq!(error3.to_string(), "Config file not found: baseline.toml");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_error = match toml::from_str::<toml::Table>("not = [valid") {
            Ok(table) => panic!("expected a parse error, got {table:?}"),
            Err(error) => error,
        };
        let error: Error = toml_error.into();
        assert!(matches!(error, Error::Toml(_)));
    }
}
