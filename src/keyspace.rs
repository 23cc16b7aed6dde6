//! Brute-force keyspace: a bijection between candidate indices and passwords.
//!
//! A keyspace covers every password of each length in `min_length..=max_length`,
//! shorter lengths first. Within one length, index `i` is `i` written in
//! base `charset.len()` with the most significant digit first, each digit
//! replaced by the charset character at that position. With charset `"ab"`
//! and length 2 the order is `aa, ab, ba, bb`.
//!
//! Because any index maps straight to its password, a worker can start
//! anywhere in the keyspace without enumerating what comes before it.

use crate::charset::Charset;
use crate::error::SearchError;

/// The ordered set of passwords implied by a charset and a length range.
#[derive(Debug, Clone)]
pub struct Keyspace {
    charset: Charset,
    min_length: usize,
    max_length: usize,
    /// Candidate count per length, starting at `min_length`.
    blocks: Vec<u64>,
    size: u64,
}

impl Keyspace {
    /// Keyspace of every password with exactly `length` characters.
    pub fn new(charset: Charset, length: usize, limit: u64) -> Result<Self, SearchError> {
        Self::with_lengths(charset, length, length, limit)
    }

    /// Keyspace of every password with `min_length..=max_length` characters.
    ///
    /// Fails with [`SearchError::KeyspaceTooLarge`] when the total exceeds
    /// `limit`, so oversized searches are rejected before any worker starts.
    pub fn with_lengths(
        charset: Charset,
        min_length: usize,
        max_length: usize,
        limit: u64,
    ) -> Result<Self, SearchError> {
        if min_length > max_length {
            return Err(SearchError::InvalidLengthRange {
                min: min_length,
                max: max_length,
            });
        }
        if charset.is_empty() && max_length > 0 {
            return Err(SearchError::InvalidCharset {
                reason: "charset is empty but candidate length is non-zero".into(),
            });
        }

        let too_large = SearchError::KeyspaceTooLarge { limit };
        // Every length contributes at least one candidate, so a range wider
        // than the limit can be rejected without walking it.
        if (max_length - min_length) as u128 >= limit as u128 {
            return Err(too_large);
        }

        let base = charset.len() as u128;
        let mut blocks = Vec::with_capacity(max_length - min_length + 1);
        let mut total: u128 = 0;
        for length in min_length..=max_length {
            let combos = u32::try_from(length)
                .ok()
                .and_then(|exp| base.checked_pow(exp))
                .ok_or(SearchError::KeyspaceTooLarge { limit })?;
            total = total
                .checked_add(combos)
                .ok_or(SearchError::KeyspaceTooLarge { limit })?;
            if total > limit as u128 {
                return Err(too_large);
            }
            blocks.push(combos as u64);
        }

        Ok(Keyspace {
            charset,
            min_length,
            max_length,
            blocks,
            size: total as u64,
        })
    }

    /// Number of candidates.
    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Translate a numeric index into a password, reusing `buffer`.
    ///
    /// Returns `false` and leaves `buffer` empty when `index` is out of range.
    pub fn write_password(&self, index: u64, buffer: &mut String) -> bool {
        buffer.clear();
        if index >= self.size {
            return false;
        }

        let mut offset = index;
        let mut length = self.min_length;
        for &block in &self.blocks {
            if offset < block {
                break;
            }
            offset -= block;
            length += 1;
        }
        if length == 0 {
            return true;
        }

        buffer.reserve(length);
        let base = self.charset.len() as u64;
        // base^(length - 1) fits: it is no larger than this length's block.
        let mut divisor = base.pow(length as u32 - 1);
        for _ in 0..length {
            let digit = (offset / divisor) % base;
            if let Some(ch) = self.charset.get(digit as usize) {
                buffer.push(ch);
            }
            divisor /= base;
        }
        true
    }

    /// Password at `index`, if in range.
    pub fn password(&self, index: u64) -> Option<String> {
        let mut buffer = String::new();
        self.write_password(index, &mut buffer).then_some(buffer)
    }

    /// Index of `password`, or `None` if it is not part of this keyspace.
    pub fn index_of(&self, password: &str) -> Option<u64> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return None;
        }

        let base = self.charset.len() as u64;
        let mut value: u64 = 0;
        for ch in password.chars() {
            value = value * base + self.charset.position(ch)? as u64;
        }
        let preceding: u64 = self.blocks[..length - self.min_length].iter().sum();
        Some(preceding + value)
    }
}
