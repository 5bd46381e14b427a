use std::sync::Arc;

use chrono::{DateTime, Utc};
use scraper::ElementRef;

use super::fields::{Chamber, Source, CHAMBER_FIELDS};
use super::paths::PathSet;
use super::record::{ChamberFields, Record};
use crate::error::ExtractionError;
use crate::report::Reporter;
use crate::selector::{self, Document};

/// Name of the top-level "current activity" container in errors and reports.
pub const ACTIVITY_REGION: &str = "legislative-activity-region";

/// Runs the fixed query set against a document and folds the results into a
/// [`Record`]. Holds no per-document state; one builder can serve any number
/// of documents, from any number of threads.
pub struct RecordBuilder {
    paths: PathSet,
    reporter: Option<Arc<dyn Reporter>>,
}

impl RecordBuilder {
    pub fn new(paths: PathSet) -> Self {
        RecordBuilder {
            paths,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    /// Extract one record. Either every field resolves or the call fails
    /// naming the first region or field that did not.
    pub fn process(
        &self,
        document: &Document,
        captured_at: DateTime<Utc>,
    ) -> Result<Record, ExtractionError> {
        let region = selector::nodes(document.select(&self.paths.region));
        self.report(|r| r.region_matched(ACTIVITY_REGION, region.len()));
        if region.is_empty() {
            return Err(ExtractionError::MissingRegion {
                region: ACTIVITY_REGION,
            });
        }

        let house = self.chamber(&region, Chamber::House)?;
        let senate = self.chamber(&region, Chamber::Senate)?;

        Ok(Record::new(house, senate, captured_at))
    }

    fn chamber(
        &self,
        region: &[ElementRef<'_>],
        chamber: Chamber,
    ) -> Result<ChamberFields, ExtractionError> {
        let scope = selector::nodes(selector::evaluate(region, self.paths.chamber(chamber)));
        self.report(|r| r.region_matched(chamber.region(), scope.len()));

        let status = selector::strings(selector::evaluate(&scope, &self.paths.status));
        let headlines = selector::strings(selector::evaluate(&scope, &self.paths.headlines));

        let mut fields = ChamberFields::default();
        for spec in &CHAMBER_FIELDS {
            let name = spec.field.name(chamber);
            let raw = match spec.source {
                Source::StatusAnchor => &status,
                Source::Headlines => &headlines,
            };
            self.report(|r| r.field_candidates(name, raw.len(), spec.source.expected()));

            *fields.slot(spec.field) =
                spec.rule
                    .apply(raw)
                    .ok_or(ExtractionError::MissingField {
                        field: name,
                        region: chamber.region(),
                    })?;
        }

        Ok(fields)
    }

    fn report(&self, event: impl FnOnce(&dyn Reporter)) {
        if let Some(reporter) = &self.reporter {
            event(reporter.as_ref());
        }
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new(PathSet::congress_gov())
    }
}
