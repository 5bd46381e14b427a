//! Extracts the "Current Legislative Activities" block of the congress.gov
//! home page into one flat record: chamber status, most recent and
//! previous/next meeting for the House and the Senate, plus the capture time.
//!
//! The core ([`selector`] and [`parser`]) is pure and performs no I/O.
//! [`fetch`], [`output`] and [`settings`] are the plumbing the CLI wraps
//! around it.

pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod report;
pub mod selector;
pub mod settings;

pub use error::{ExtractionError, PathExpressionError};
pub use parser::{Record, RecordBuilder};
pub use selector::{Document, PathExpression};
