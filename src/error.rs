//! Error types for setting up a particle background.
//!
//! The simulation itself never fails; everything here happens before the
//! first frame, while reading configuration or finding the canvas.

use std::fmt;
use wasm_bindgen::JsValue;

/// A rejected field configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// More particles than the pairwise link pass is meant to handle.
    TooManyParticles { requested: usize, max: usize },
    /// A range whose bounds are inverted or not finite.
    InvalidRange { field: &'static str, min: f64, max: f64 },
    /// A scalar that is negative, zero or not finite where that makes no sense.
    InvalidValue { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooManyParticles { requested, max } => {
                write!(f, "particle_count {} exceeds the maximum of {}", requested, max)
            }
            ConfigError::InvalidRange { field, min, max } => {
                write!(f, "invalid range for {}: [{}, {}]", field, min, max)
            }
            ConfigError::InvalidValue { field, value } => {
                write!(f, "invalid value for {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from mounting or configuring a background.
#[derive(Debug)]
pub enum Error {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// The document has no body to mount the canvas into.
    NoBody,
    /// No element with this id, or it is not a `<canvas>`.
    MissingCanvas(String),
    /// The configuration JSON could not be parsed.
    Json(serde_json::Error),
    /// The configuration parsed but failed validation.
    Config(ConfigError),
    /// No built-in configuration by this name.
    UnknownPreset(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoWindow => write!(f, "no global window"),
            Error::NoDocument => write!(f, "window has no document"),
            Error::NoBody => write!(f, "document has no body"),
            Error::MissingCanvas(id) => write!(f, "no canvas element with id '{}'", id),
            Error::Json(e) => write!(f, "failed to parse config: {}", e),
            Error::Config(e) => write!(f, "invalid config: {}", e),
            Error::UnknownPreset(name) => write!(f, "unknown preset '{}'", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_read_well() {
        let e = Error::from(ConfigError::TooManyParticles {
            requested: 5000,
            max: 1000,
        });
        assert_eq!(
            e.to_string(),
            "invalid config: particle_count 5000 exceeds the maximum of 1000"
        );
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: Error = parse.into();
        assert!(e.to_string().starts_with("failed to parse config"));
    }
}
