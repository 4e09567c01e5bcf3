use std::{fmt, io};

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[cfg(feature = "wasm")]
use serde_wasm_bindgen::Error as WasmError;

#[cfg(feature = "service")]
use notify::{Error as NotifyError, ErrorKind as NotifyErrorKind};

/// Crate-wide error type. Data-load failures are terminal for a chart
/// session; everything else is recoverable. Referential gaps, empty filter
/// results and structural cycles are deliberately NOT errors; see
/// [crate::store] and [crate::filter] for how those degrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum CivigraphError {
    #[error("Invalid command: {0}")]
    Command(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("File system error: {0}")]
    Io(String),
    #[error("Data load error: {0}")]
    Load(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("Chart data is unavailable: {0}")]
    Unavailable(String),
}

impl CivigraphError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CivigraphError::Command(_) => StatusCode::BAD_REQUEST,
            CivigraphError::Custom(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivigraphError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivigraphError::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CivigraphError::NotFound(_) => StatusCode::NOT_FOUND,
            CivigraphError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivigraphError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CivigraphError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<csv::Error> for CivigraphError {
    fn from(src: csv::Error) -> CivigraphError {
        CivigraphError::Load(format!("CSV parse error: {src}"))
    }
}

impl From<toml::de::Error> for CivigraphError {
    fn from(src: toml::de::Error) -> CivigraphError {
        CivigraphError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for CivigraphError {
    fn from(src: toml::ser::Error) -> CivigraphError {
        CivigraphError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for CivigraphError {
    fn from(src: JsonError) -> CivigraphError {
        CivigraphError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for CivigraphError {
    fn from(src: UrlParseError) -> CivigraphError {
        CivigraphError::Serialization(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for CivigraphError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => CivigraphError::NotFound(format!("{x}")),
            _ => CivigraphError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for CivigraphError {
    fn from(x: fmt::Error) -> Self {
        CivigraphError::Custom(format!("{x}"))
    }
}

#[cfg(feature = "wasm")]
impl From<WasmError> for CivigraphError {
    fn from(wasm_error: WasmError) -> Self {
        CivigraphError::Serialization(format!("Serde-wasm-bindgen error: {wasm_error}"))
    }
}

#[cfg(feature = "service")]
impl From<NotifyError> for CivigraphError {
    fn from(notify_error: NotifyError) -> Self {
        match notify_error.kind {
            NotifyErrorKind::Generic(msg) => CivigraphError::Service(format!(
                "notify-debouncer: {}, paths: {:?}",
                msg, notify_error.paths
            )),
            NotifyErrorKind::Io(io_error) => CivigraphError::Service(format!(
                "notify-debouncer: io error {}, paths: {:?}",
                io_error.kind(),
                notify_error.paths
            )),
            NotifyErrorKind::PathNotFound => CivigraphError::NotFound(format!(
                "notify-debouncer: path(s) not found: {:?}",
                notify_error.paths
            )),
            NotifyErrorKind::WatchNotFound => CivigraphError::NotFound(format!(
                "notify-debouncer: watch not found, paths: {:?}",
                notify_error.paths
            )),
            NotifyErrorKind::InvalidConfig(_) => {
                CivigraphError::Service("notify-debouncer invalid config".to_string())
            }
            NotifyErrorKind::MaxFilesWatch => {
                CivigraphError::Service("notify-debouncer max file watch limit reached".to_string())
            }
        }
    }
}
