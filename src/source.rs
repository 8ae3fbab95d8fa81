use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::record::{ParsedBatch, parse_batch};

/// Read a whole events file (JSON lines) through a memory map.
pub fn load_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ParsedBatch> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(ParsedBatch::default());
    }
    let mmap = unsafe { Mmap::map(&file)? };
    let content = std::str::from_utf8(&mmap)?;
    Ok(parse_batch(content.lines()))
}

/// Read all of stdin (for piped input).
pub fn load_stdin() -> anyhow::Result<ParsedBatch> {
    let stdin = io::stdin();
    let lines: Vec<String> = stdin.lock().lines().collect::<Result<_, _>>()?;
    Ok(parse_batch(&lines))
}

/// Polls a growing events file for records appended since the last read.
/// No background thread; the event loop calls `read_new` each iteration.
pub struct FollowSource {
    path: PathBuf,
    offset: u64,
}

impl FollowSource {
    pub fn new<P: AsRef<Path>>(path: P, initial_offset: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            offset: initial_offset,
        }
    }

    /// Parse any complete lines appended since the last read. Returns an
    /// empty batch if the file has not grown. A trailing line without a
    /// newline is left unconsumed; a writer mid-record will be picked up
    /// whole on a later poll.
    pub fn read_new(&mut self) -> anyhow::Result<ParsedBatch> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len <= self.offset {
            return Ok(ParsedBatch::default());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.read_to_end(&mut buf)?;

        let Some(consumed) = buf.iter().rposition(|&b| b == b'\n').map(|p| p + 1) else {
            return Ok(ParsedBatch::default());
        };
        self.offset += consumed as u64;

        let text = String::from_utf8_lossy(&buf[..consumed]);
        Ok(parse_batch(text.lines()))
    }
}
