//! Loading JSON and TOML documents into [`Value`] trees.

use plainmerge_classifier::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// `.toml` files are TOML, everything else (and stdin) is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// A loaded document with provenance.
#[derive(Debug, Clone)]
pub struct Document {
    /// File path, or `-` for stdin
    pub origin: PathBuf,

    /// SHA-256 digest of the raw bytes
    pub digest: String,

    pub value: Value,
}

/// Document loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Utf8 { path: PathBuf },

    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Load a document from `path`; `-` reads JSON from stdin.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let bytes = if is_stdin(path) {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };
    debug!(path = %path.display(), bytes = bytes.len(), "loaded document");
    parse_bytes(path, &bytes, Format::from_path(path))
}

/// Parse raw bytes loaded from `path`.
pub fn parse_bytes(path: &Path, bytes: &[u8], format: Format) -> Result<Document, LoadError> {
    let digest = digest(bytes);
    let contents = std::str::from_utf8(bytes).map_err(|_| LoadError::Utf8 {
        path: path.to_path_buf(),
    })?;

    let value = match format {
        Format::Json => serde_json::from_str::<Value>(contents).map_err(|source| {
            LoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?,
        Format::Toml => {
            let table: toml::Table = toml::from_str(contents).map_err(|source| LoadError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
            toml_to_value(toml::Value::Table(table))
        }
    };

    Ok(Document {
        origin: path.to_path_buf(),
        digest,
        value,
    })
}

/// Hex SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Convert a TOML value. Datetimes become their RFC 3339 text.
pub fn toml_to_value(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => table
            .into_iter()
            .map(|(k, v)| (k, toml_to_value(v)))
            .collect(),
    }
}
