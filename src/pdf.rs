//! Verification oracle for encrypted PDF documents, backed by `lopdf`.

use lopdf::Document;
use lopdf::Error as LopdfError;
use lopdf::encryption::DecryptionError;

use crate::error::SearchError;
use crate::oracle::{LockedDocument, Oracle, Verdict};

/// Authenticates candidates against a PDF's standard security handler.
///
/// The parsed [`Document`] is loaded once per search and shared read-only
/// by every worker; `authenticate_password` only needs `&self`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfOracle;

impl Oracle for PdfOracle {
    type Handle = Document;

    fn open(&self, document: &LockedDocument) -> Result<Document, SearchError> {
        let doc = Document::load_mem(document.as_bytes())
            .map_err(|e| SearchError::Document(e.to_string()))?;
        if !doc.is_encrypted() {
            return Err(SearchError::NotEncrypted);
        }
        Ok(doc)
    }

    fn verify(&self, doc: &Document, candidate: &str) -> Verdict {
        classify(doc.authenticate_password(candidate))
    }
}

impl PdfOracle {
    /// Decrypt a fresh copy of `document` with `password`.
    ///
    /// Used after a search reports a match, to check the password unlocks
    /// the content and not just the security handler.
    pub fn confirm(&self, document: &LockedDocument, password: &str) -> Result<(), SearchError> {
        let mut doc = self.open(document)?;
        doc.decrypt(password)
            .map_err(|e| SearchError::Document(e.to_string()))
    }
}

/// Candidate-specific failures are a wrong password; anything else would
/// repeat for every candidate.
///
/// Revision 5/6 handlers run candidates through SASLprep first. A string it
/// rejects (control or unassigned code points) can never be the password,
/// so that is a miss too.
fn classify(attempt: Result<(), LopdfError>) -> Verdict {
    match attempt {
        Ok(()) => Verdict::Unlocked,
        Err(LopdfError::Decryption(
            DecryptionError::IncorrectPassword | DecryptionError::StringPrep(_),
        )) => Verdict::WrongPassword,
        Err(e) => Verdict::MalformedDocument(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(Ok(())), Verdict::Unlocked);
        assert_eq!(
            classify(Err(LopdfError::Decryption(
                DecryptionError::IncorrectPassword
            ))),
            Verdict::WrongPassword
        );
        assert!(matches!(
            classify(Err(LopdfError::ObjectNotFound((7, 0)))),
            Verdict::MalformedDocument(_)
        ));
    }

    #[test]
    fn test_classify_unpreparable_candidate_is_a_miss() {
        let rejected = match stringprep::saslprep("bell\u{7}") {
            Err(e) => e,
            Ok(prepared) => panic!("saslprep accepted {prepared:?}"),
        };
        assert_eq!(
            classify(Err(LopdfError::Decryption(DecryptionError::StringPrep(
                rejected
            )))),
            Verdict::WrongPassword
        );
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let document = LockedDocument::from_bytes(b"definitely not a pdf".to_vec());
        assert!(matches!(
            PdfOracle.open(&document),
            Err(SearchError::Document(_))
        ));
    }
}
