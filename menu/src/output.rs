//! JSON files written next to the processed images.

use crate::error::OutputError;
use crate::segment::Record;
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// `images/menu.jpg` -> `images/menu.json`.
pub fn json_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

/// Pretty JSON array of records, four-space indent.
///
/// serde_json writes non-ASCII as-is, so `Café` stays `Café`.
pub fn to_json_bytes(records: &[Record]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    Ok(buf)
}

pub fn to_json_string(records: &[Record]) -> Result<String, serde_json::Error> {
    let bytes = to_json_bytes(records)?;
    // serde_json only emits UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the records for `image_path` and return where they went.
pub fn save_records(image_path: &Path, records: &[Record]) -> Result<PathBuf, OutputError> {
    let path = json_path_for(image_path);
    let bytes = to_json_bytes(records).map_err(|source| OutputError::Encode {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|source| OutputError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
