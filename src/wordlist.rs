//! Dictionary sources.
//!
//! A wordlist is either held in memory or streamed line by line from a
//! file. File-backed lists are never loaded whole: the size comes from one
//! counting pass and each worker re-opens the file and skips to its slice.
//!
//! Lines are split on raw `\n` bytes and decoded lossily, so leaked lists
//! in Latin-1 or with stray binary still count and stream one entry per
//! line. Invalid sequences become U+FFFD.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// An ordered list of candidate passwords.
#[derive(Debug, Clone)]
pub enum Wordlist {
    Words(Vec<String>),
    File(PathBuf),
}

impl Wordlist {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Wordlist::Words(words.into_iter().map(Into::into).collect())
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Wordlist::File(path.into())
    }
}

/// Line reader over a wordlist file that does not require UTF-8.
pub(crate) struct WordLines {
    reader: BufReader<File>,
    raw: Vec<u8>,
}

impl WordLines {
    fn open(path: &Path) -> io::Result<Self> {
        Ok(WordLines {
            reader: BufReader::new(File::open(path)?),
            raw: Vec::new(),
        })
    }

    /// Read the next line, without its `\n` or `\r\n`, into `line`.
    ///
    /// Returns `false` at end of file and leaves `line` untouched.
    pub(crate) fn read_into(&mut self, line: &mut String) -> io::Result<bool> {
        if !self.advance()? {
            return Ok(false);
        }
        let mut bytes = self.raw.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        line.clear();
        line.push_str(&String::from_utf8_lossy(bytes));
        Ok(true)
    }

    fn advance(&mut self) -> io::Result<bool> {
        self.raw.clear();
        Ok(self.reader.read_until(b'\n', &mut self.raw)? > 0)
    }
}

pub(crate) fn count_lines(path: &Path) -> io::Result<u64> {
    let mut lines = WordLines::open(path)?;
    let mut count = 0u64;
    while lines.advance()? {
        count += 1;
    }
    Ok(count)
}

/// Open `path` and position the reader at zero-based line `offset`.
///
/// Hitting end of file early is not an error; the reader is simply empty.
pub(crate) fn lines_from(path: &Path, offset: u64) -> io::Result<WordLines> {
    let mut lines = WordLines::open(path)?;
    for _ in 0..offset {
        if !lines.advance()? {
            break;
        }
    }
    Ok(lines)
}
