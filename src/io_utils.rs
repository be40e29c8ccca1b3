//! Output plumbing shared by the JSON writers.
//!
//! Documents are rendered fully in memory before anything touches the
//! destination, so a failed run never leaves a half-written file behind.
//! The `-` path convention routes output to stdout.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use crate::error::ReportResult;

pub const JSON_INDENT: &[u8] = b"  ";

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> ReportResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Writes `bytes` to `path`, creating parent directories, or to stdout when
/// `path` is `None` or `-`.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> ReportResult<()> {
    match path {
        Some(p) if !is_dash(p) => {
            if let Some(parent) = p.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(p, bytes)?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
