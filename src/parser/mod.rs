pub mod builder;
pub mod fields;
pub mod paths;
pub mod record;

use chrono::{DateTime, Utc};

use crate::error::ExtractionError;
use crate::selector::Document;

pub use builder::{RecordBuilder, ACTIVITY_REGION};
pub use fields::Chamber;
pub use paths::{PathSet, PathSources};
pub use record::Record;

/// Parse raw HTML and run the record builder over it.
pub fn process_page(
    builder: &RecordBuilder,
    html: &str,
    captured_at: DateTime<Utc>,
) -> Result<Record, ExtractionError> {
    let document = Document::parse(html);
    builder.process(&document, captured_at)
}
