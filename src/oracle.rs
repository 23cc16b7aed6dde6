//! The verification oracle contract.
//!
//! The engine never decrypts anything itself. It hands candidates to an
//! [`Oracle`], which classifies each one as a [`Verdict`]. Classifying
//! library errors (is this a wrong password, or a document nothing will
//! ever open?) is the oracle's job, not the engine's.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::SearchError;

/// Outcome of testing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Unlocked,
    WrongPassword,
    /// No password will ever unlock this document. Aborts the whole search.
    MalformedDocument(String),
}

/// Bytes of an encrypted document. The engine only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedDocument {
    bytes: Vec<u8>,
}

impl LockedDocument {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        LockedDocument {
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Tests candidate passwords against a locked document.
///
/// A search opens one [`Handle`](Oracle::Handle) and shares it by
/// reference with every worker, so `verify` must be reentrant for a shared
/// handle. Oracles whose underlying library is not should open a fresh
/// resource per call inside `verify` instead.
pub trait Oracle: Sync {
    type Handle: Sync;

    /// Prepare `document` for verification.
    fn open(&self, document: &LockedDocument) -> Result<Self::Handle, SearchError>;

    /// Test `candidate`. Must not panic on any input.
    fn verify(&self, handle: &Self::Handle, candidate: &str) -> Verdict;
}

/// Adapts a plain closure into an [`Oracle`] with no per-document state.
#[derive(Debug, Clone, Copy)]
pub struct FnOracle<F>(pub F);

impl<F> Oracle for FnOracle<F>
where
    F: Fn(&str) -> Verdict + Sync,
{
    type Handle = ();

    fn open(&self, _document: &LockedDocument) -> Result<(), SearchError> {
        Ok(())
    }

    fn verify(&self, _handle: &(), candidate: &str) -> Verdict {
        (self.0)(candidate)
    }
}
