//! File import/export for project JSON documents.
//!
//! # Responsibility
//! - Read and parse `.json` documents from disk.
//! - Write pretty-printed exports, normalizing the file extension.
//! - Generate timestamped export file names.
//!
//! # Invariants
//! - Only `.json` files are accepted on the read path.
//! - Generated names are collision-resistant for sequential exports but
//!   not guaranteed unique across same-second calls.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::interchange::json::{self, ParseError, SerializeError};

/// Default base name for project exports.
pub const DEFAULT_EXPORT_BASENAME: &str = "hospital-project";

#[derive(Debug)]
pub enum FileError {
    /// The path does not carry a `.json` extension.
    InvalidExtension(PathBuf),
    Io(std::io::Error),
    Parse(ParseError),
    Serialize(SerializeError),
}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidExtension(path) => {
                write!(f, "expected a .json file: {}", path.display())
            }
            Self::Io(err) => write!(f, "file I/O failed: {err}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidExtension(_) => None,
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FileError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ParseError> for FileError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<SerializeError> for FileError {
    fn from(value: SerializeError) -> Self {
        Self::Serialize(value)
    }
}

/// Reads and parses a `.json` document.
pub fn read_from_file(path: &Path) -> Result<Value, FileError> {
    if !has_json_extension(path) {
        return Err(FileError::InvalidExtension(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    Ok(json::parse(&text)?)
}

/// Pretty-serializes a value and writes it to disk, appending `.json`
/// when the path carries a different or no extension. Returns the path
/// actually written.
pub fn write_to_file<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, FileError> {
    let target = if has_json_extension(path) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    };

    let payload = json::stringify(value, true)?;
    fs::write(&target, payload)?;
    Ok(target)
}

/// `<base>-<UTC timestamp>.<ext>`, second precision, colon-free.
pub fn generate_file_name(base: &str, extension: &str) -> String {
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
    format!("{base}-{timestamp}.{extension}")
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
