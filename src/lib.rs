//! Password search engine for encrypted documents.
//!
//! Candidates come from a dictionary or from an exhaustive brute-force
//! keyspace. The keyspace is an index <-> password bijection, so it can be
//! [partitioned](partition::partition) into contiguous ranges and searched
//! in parallel with no candidate tested twice. Each candidate goes to an
//! [`Oracle`], which says whether it unlocked the document; [`PdfOracle`]
//! does this for PDFs via `lopdf`.
//!
//! ```no_run
//! use pdf_pwsearch::{LockedDocument, PdfOracle, SearchBudget, SearchMode, search};
//!
//! let document = LockedDocument::from_path("locked.pdf")?;
//! let result = search(
//!     &PdfOracle,
//!     &document,
//!     &SearchMode::brute_force("0123456789", 4),
//!     SearchBudget::unbounded(),
//!     8,
//! )?;
//! println!("{:?}", result.password());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accounting;
pub mod charset;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod generator;
pub mod keyspace;
pub mod oracle;
pub mod partition;
pub mod pdf;
pub mod wordlist;

pub use accounting::AttemptRecord;
pub use charset::Charset;
pub use config::{ConfigError, EngineConfig, SearchBudget};
pub use coordinator::{SearchResult, Searcher, search};
pub use error::{FailureReason, SearchError};
pub use generator::{CandidateSource, Candidates, SearchMode};
pub use keyspace::Keyspace;
pub use oracle::{FnOracle, LockedDocument, Oracle, Verdict};
pub use partition::{KeyspaceRange, partition};
pub use pdf::PdfOracle;
pub use wordlist::Wordlist;
