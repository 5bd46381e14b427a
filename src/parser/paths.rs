use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::fields::Chamber;
use crate::error::PathExpressionError;
use crate::selector::PathExpression;

// Layout of the congress.gov home page. Region is absolute; every other path
// is evaluated relative to the result of the one before it.
pub const REGION: &str = "//div[h2][contains(./*, 'Current Legislative Activities')]//div[contains(@class, 'home-current-house-senate-row')]";
pub const HOUSE: &str = "./div[contains(@class, 'home-current-house')]";
pub const SENATE: &str = "./div[contains(@class, 'home-current-senate')]";
pub const STATUS: &str = "./div[contains(@class, 'status')]//a[1]/text()";
pub const HEADLINES: &str =
    "./div[contains(@class, 'legislative-activities')]/div[contains(@class, 'activity')]/h4/text()";

static CONGRESS_GOV: LazyLock<PathSet> =
    LazyLock::new(|| PathSources::default().compile().unwrap());

/// Source strings for the five queries, as they appear in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSources {
    pub region: String,
    pub house: String,
    pub senate: String,
    pub status: String,
    pub headlines: String,
}

impl Default for PathSources {
    fn default() -> Self {
        PathSources {
            region: REGION.to_string(),
            house: HOUSE.to_string(),
            senate: SENATE.to_string(),
            status: STATUS.to_string(),
            headlines: HEADLINES.to_string(),
        }
    }
}

impl PathSources {
    pub fn compile(&self) -> Result<PathSet, PathExpressionError> {
        Ok(PathSet {
            region: PathExpression::parse(&self.region)?,
            house: PathExpression::parse(&self.house)?,
            senate: PathExpression::parse(&self.senate)?,
            status: PathExpression::parse(&self.status)?,
            headlines: PathExpression::parse(&self.headlines)?,
        })
    }
}

/// The compiled query set the record builder runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub region: PathExpression,
    pub house: PathExpression,
    pub senate: PathExpression,
    pub status: PathExpression,
    pub headlines: PathExpression,
}

impl PathSet {
    pub fn congress_gov() -> Self {
        CONGRESS_GOV.clone()
    }

    pub fn chamber(&self, chamber: Chamber) -> &PathExpression {
        match chamber {
            Chamber::House => &self.house,
            Chamber::Senate => &self.senate,
        }
    }

    pub fn named(&self) -> [(&'static str, &PathExpression); 5] {
        [
            ("region", &self.region),
            ("house", &self.house),
            ("senate", &self.senate),
            ("status", &self.status),
            ("headlines", &self.headlines),
        ]
    }
}

impl Default for PathSet {
    fn default() -> Self {
        Self::congress_gov()
    }
}
