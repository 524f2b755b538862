//! Reading CLI input and writing CLI output.

use crate::error::{FirehoseError, Result};
use crate::record::{FirehoseEvent, FirehoseResponse};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

/// Path that selects stdin/stdout.
pub const STDIO_PATH: &str = "-";

fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == STDIO_PATH)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FirehoseError {
    let path = path.to_path_buf();
    move |source| FirehoseError::Io { path, source }
}

/// Read all bytes from `path`, or stdin when `path` is None or `-`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if !is_stdio(path) => std::fs::read(p).map_err(io_error(p)),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(io_error(Path::new(STDIO_PATH)))?;
            Ok(buf)
        }
    }
}

/// Write bytes plus a trailing newline to `path`, or stdout.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(p) if !is_stdio(path) => {
            let mut file = std::fs::File::create(p).map_err(io_error(p))?;
            file.write_all(bytes).map_err(io_error(p))?;
            file.write_all(b"\n").map_err(io_error(p))
        }
        _ => {
            let stdout = Path::new(STDIO_PATH);
            let mut out = std::io::stdout().lock();
            out.write_all(bytes).map_err(io_error(stdout))?;
            out.write_all(b"\n").map_err(io_error(stdout))?;
            out.flush().map_err(io_error(stdout))
        }
    }
}

/// Parse a Firehose event from raw JSON.
pub fn parse_event(bytes: &[u8]) -> Result<FirehoseEvent> {
    serde_json::from_slice(bytes).map_err(|e| FirehoseError::Envelope(e.into()))
}

/// Serialize a response, optionally pretty-printed.
pub fn encode_response(response: &FirehoseResponse, pretty: bool) -> Result<Vec<u8>> {
    to_json(response, pretty).map_err(FirehoseError::Response)
}

/// Serialize any value as compact or pretty JSON.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<Vec<u8>> {
    if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
}
