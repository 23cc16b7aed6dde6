//! Candidate generation.
//!
//! [`SearchMode`] is what the caller asks for; [`CandidateSource`] is the
//! validated, sized form the coordinator partitions; [`Candidates`] walks
//! one [`KeyspaceRange`] of a source in ascending index order.

use std::io;
use std::path::Path;

use crate::charset::Charset;
use crate::config::EngineConfig;
use crate::error::SearchError;
use crate::keyspace::Keyspace;
use crate::partition::KeyspaceRange;
use crate::wordlist::{self, WordLines, Wordlist};

/// What to search.
#[derive(Debug, Clone)]
pub enum SearchMode {
    /// Try each wordlist entry in order.
    Dictionary(Wordlist),
    /// Every password of exactly `length` characters over `charset`.
    BruteForce { charset: String, length: usize },
    /// Every password of `min_length..=max_length` characters, shortest first.
    Incremental {
        charset: String,
        min_length: usize,
        max_length: usize,
    },
}

impl SearchMode {
    pub fn dictionary<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchMode::Dictionary(Wordlist::from_words(words))
    }

    pub fn brute_force(charset: impl Into<String>, length: usize) -> Self {
        SearchMode::BruteForce {
            charset: charset.into(),
            length,
        }
    }

    /// Validate the mode and size its candidate space.
    pub fn source(&self, config: &EngineConfig) -> Result<CandidateSource<'_>, SearchError> {
        match self {
            SearchMode::Dictionary(Wordlist::Words(words)) => Ok(CandidateSource::Words(words)),
            SearchMode::Dictionary(Wordlist::File(path)) => {
                let len = wordlist::count_lines(path).map_err(SearchError::Wordlist)?;
                Ok(CandidateSource::Lines { path, len })
            }
            SearchMode::BruteForce { charset, length } => {
                let charset: Charset = charset.parse()?;
                Ok(CandidateSource::Keyspace(Keyspace::new(
                    charset,
                    *length,
                    config.max_keyspace,
                )?))
            }
            SearchMode::Incremental {
                charset,
                min_length,
                max_length,
            } => {
                let charset: Charset = charset.parse()?;
                Ok(CandidateSource::Keyspace(Keyspace::with_lengths(
                    charset,
                    *min_length,
                    *max_length,
                    config.max_keyspace,
                )?))
            }
        }
    }
}

/// A sized, validated candidate space.
#[derive(Debug)]
pub enum CandidateSource<'a> {
    Keyspace(Keyspace),
    Words(&'a [String]),
    Lines { path: &'a Path, len: u64 },
}

impl CandidateSource<'_> {
    /// Total number of candidates.
    pub fn len(&self) -> u64 {
        match self {
            CandidateSource::Keyspace(keyspace) => keyspace.len(),
            CandidateSource::Words(words) => words.len() as u64,
            CandidateSource::Lines { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CandidateSource::Keyspace(_) => "brute-force",
            CandidateSource::Words(_) | CandidateSource::Lines { .. } => "dictionary",
        }
    }

    /// Start walking `range`. File-backed sources re-open the file here.
    pub fn candidates(&self, range: KeyspaceRange) -> io::Result<Candidates<'_>> {
        let end = range.end.min(self.len());
        let cursor = match self {
            CandidateSource::Keyspace(keyspace) => Cursor::Keyspace(keyspace),
            CandidateSource::Words(words) => Cursor::Words(words),
            CandidateSource::Lines { path, .. } => {
                Cursor::Lines(wordlist::lines_from(path, range.start)?)
            }
        };
        Ok(Candidates {
            cursor,
            next: range.start,
            end,
        })
    }
}

enum Cursor<'a> {
    Keyspace(&'a Keyspace),
    Words(&'a [String]),
    Lines(WordLines),
}

/// Lazy walk over one range of a [`CandidateSource`].
pub struct Candidates<'a> {
    cursor: Cursor<'a>,
    next: u64,
    end: u64,
}

impl Candidates<'_> {
    /// Write the next candidate into `buffer` and return its index.
    ///
    /// Dictionary entries are trimmed of surrounding whitespace. Returns
    /// `Ok(None)` once the range is done.
    pub fn next_into(&mut self, buffer: &mut String) -> io::Result<Option<u64>> {
        if self.next >= self.end {
            return Ok(None);
        }
        let index = self.next;

        match &mut self.cursor {
            Cursor::Keyspace(keyspace) => {
                if !keyspace.write_password(index, buffer) {
                    return Ok(None);
                }
            }
            Cursor::Words(words) => {
                buffer.clear();
                buffer.push_str(words[index as usize].trim());
            }
            Cursor::Lines(lines) => {
                // File shrank since it was counted.
                if !lines.read_into(buffer)? {
                    return Ok(None);
                }
                let trimmed = buffer.trim();
                if trimmed.len() != buffer.len() {
                    *buffer = trimmed.to_owned();
                }
            }
        }

        self.next += 1;
        Ok(Some(index))
    }

    /// Index the next call to [`next_into`](Self::next_into) will produce.
    pub fn position(&self) -> u64 {
        self.next
    }
}

impl Iterator for Candidates<'_> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        match self.next_into(&mut buffer) {
            Ok(Some(_)) => Some(Ok(buffer)),
            Ok(None) => None,
            Err(e) => {
                self.next = self.end;
                Some(Err(e))
            }
        }
    }
}
