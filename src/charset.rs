//! Ordered candidate alphabets.

use std::collections::HashMap;

use crate::error::SearchError;

/// Decimal digits.
pub const DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Extended symbol characters that can be included in the brute-force alphabet.
pub const SYMBOLS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '=', '+', '[', ']', '{', '}', '|',
    '\\', ':', ';', '"', '\'', ',', '.', '<', '>', '/', '?', '`', '~',
];

/// Alphabet used when the caller names no character classes.
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A validated alphabet. Character order defines candidate order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    chars: Vec<char>,
    positions: HashMap<char, usize>,
}

impl Charset {
    /// Build a charset from `chars`, rejecting duplicates.
    pub fn new(chars: impl IntoIterator<Item = char>) -> Result<Self, SearchError> {
        let chars: Vec<char> = chars.into_iter().collect();
        let mut positions = HashMap::with_capacity(chars.len());
        for (position, &ch) in chars.iter().enumerate() {
            if positions.insert(ch, position).is_some() {
                return Err(SearchError::InvalidCharset {
                    reason: format!("duplicate character {ch:?}"),
                });
            }
        }
        Ok(Charset { chars, positions })
    }

    /// Compose the built-in classes in digits, letters, symbols order.
    ///
    /// Falls back to [`DEFAULT_CHARSET`] when no class is selected.
    pub fn from_classes(digits: bool, letters: bool, symbols: bool) -> Self {
        let mut chars: Vec<char> = Vec::new();
        if digits {
            chars.extend(DIGITS.iter().copied());
        }
        if letters {
            chars.extend(('a'..='z').chain('A'..='Z'));
        }
        if symbols {
            chars.extend(SYMBOLS.iter().copied());
        }
        if chars.is_empty() {
            chars.extend(DEFAULT_CHARSET.chars());
        }
        let positions = chars.iter().enumerate().map(|(i, &ch)| (ch, i)).collect();
        Charset { chars, positions }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `position`.
    pub fn get(&self, position: usize) -> Option<char> {
        self.chars.get(position).copied()
    }

    /// Position of `ch` in this charset.
    pub fn position(&self, ch: char) -> Option<usize> {
        self.positions.get(&ch).copied()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}

impl std::str::FromStr for Charset {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::new(s.chars())
    }
}
