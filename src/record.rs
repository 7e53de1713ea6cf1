//! Pidfile record codec.
//!
//! A record is the owning process id in decimal followed by a single
//! newline. Readers only look at the first [`MAX_RECORD_BYTES`] bytes, take
//! everything up to the first newline and ignore surrounding whitespace.

use crate::error::UnreadableCause;
use std::io::{Read, Seek, SeekFrom};

/// Upper bound on how much of a pidfile is ever read.
pub const MAX_RECORD_BYTES: usize = 16;

/// Decoded record content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// The file exists but holds no pid.
    Empty,
    /// The file names this process id.
    Pid(u32),
}

/// Encode the record for `pid`.
pub fn encode(pid: u32) -> String {
    format!("{}\n", pid)
}

/// Decode a record from raw bytes.
pub fn decode(bytes: &[u8]) -> Result<Record, UnreadableCause> {
    let bytes = &bytes[..bytes.len().min(MAX_RECORD_BYTES)];
    let text = String::from_utf8_lossy(bytes);
    let first_line = text.split('\n').next().unwrap_or_default().trim();

    if first_line.is_empty() {
        return Ok(Record::Empty);
    }

    first_line
        .parse::<u32>()
        .map(Record::Pid)
        .map_err(|source| UnreadableCause::Parse {
            content: first_line.to_string(),
            source,
        })
}

/// Read a record from the start of `reader`.
pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Record, UnreadableCause> {
    reader.seek(SeekFrom::Start(0))?;

    let mut buf = Vec::with_capacity(MAX_RECORD_BYTES);
    reader
        .take(MAX_RECORD_BYTES as u64)
        .read_to_end(&mut buf)?;

    decode(&buf)
}
