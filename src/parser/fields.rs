#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    /// Sub-region name used in diagnostics and errors.
    pub fn region(self) -> &'static str {
        match self {
            Chamber::House => "house",
            Chamber::Senate => "senate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    Recent,
    PrevOrNext,
}

impl Field {
    /// Output field name for this chamber.
    pub fn name(self, chamber: Chamber) -> &'static str {
        match (chamber, self) {
            (Chamber::House, Field::Status) => "house_status",
            (Chamber::House, Field::Recent) => "house_recent",
            (Chamber::House, Field::PrevOrNext) => "house_prev_or_next",
            (Chamber::Senate, Field::Status) => "senate_status",
            (Chamber::Senate, Field::Recent) => "senate_recent",
            (Chamber::Senate, Field::PrevOrNext) => "senate_prev_or_next",
        }
    }
}

/// Which chamber-scoped path a field reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    StatusAnchor,
    Headlines,
}

impl Source {
    /// Number of candidates the page layout renders for this source. More
    /// than this means the field rule resolved an ambiguity by position.
    pub fn expected(self) -> usize {
        match self {
            Source::StatusAnchor => 1,
            Source::Headlines => 2,
        }
    }
}

/// Reduction from an ordered candidate list to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// First non-blank candidate in document order.
    TakeFirst,
    /// Candidate at a fixed position in page rendering order.
    Nth(usize),
}

impl Rule {
    /// Apply the rule. Values keep their text as rendered apart from leading
    /// and trailing whitespace; blank values count as missing.
    pub fn apply(self, raw: &[String]) -> Option<String> {
        let value = match self {
            Rule::TakeFirst => raw.iter().map(|v| v.trim()).find(|v| !v.is_empty()),
            Rule::Nth(i) => raw.get(i).map(|v| v.trim()).filter(|v| !v.is_empty()),
        };
        value.map(str::to_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub source: Source,
    pub rule: Rule,
}

/// Per-chamber field processors, in resolution order. Recent and
/// prev_or_next share one headline list: index 0 is the most recent meeting,
/// index 1 the previous or next one.
pub const CHAMBER_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        field: Field::Status,
        source: Source::StatusAnchor,
        rule: Rule::TakeFirst,
    },
    FieldSpec {
        field: Field::Recent,
        source: Source::Headlines,
        rule: Rule::Nth(0),
    },
    FieldSpec {
        field: Field::PrevOrNext,
        source: Source::Headlines,
        rule: Rule::Nth(1),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn only_outer_whitespace_is_trimmed() {
        let values = raw(&["\n  Next Meeting:  Feb. 5, 2018 at\n 12:00 p.m.  "]);
        assert_eq!(
            Rule::Nth(0).apply(&values).as_deref(),
            Some("Next Meeting:  Feb. 5, 2018 at\n 12:00 p.m.")
        );
        assert_eq!(
            Rule::TakeFirst.apply(&raw(&["\u{a0}Not in\tSession\u{a0}"])).as_deref(),
            Some("Not in\tSession")
        );
    }

    #[test]
    fn take_first_skips_blank_candidates() {
        let values = raw(&["\n  ", "In Session", "Live Video"]);
        assert_eq!(Rule::TakeFirst.apply(&values).as_deref(), Some("In Session"));
        assert_eq!(Rule::TakeFirst.apply(&raw(&[" "])), None);
        assert_eq!(Rule::TakeFirst.apply(&[]), None);
    }

    #[test]
    fn nth_is_positional() {
        let values = raw(&["Next Meeting: Feb. 5, 2018", "Previous Meeting: Feb. 2, 2018"]);
        assert_eq!(Rule::Nth(0).apply(&values).as_deref(), Some("Next Meeting: Feb. 5, 2018"));
        assert_eq!(Rule::Nth(1).apply(&values).as_deref(), Some("Previous Meeting: Feb. 2, 2018"));
        assert_eq!(Rule::Nth(2).apply(&values), None);
        assert_eq!(Rule::Nth(1).apply(&raw(&["a", "  "])), None);
    }

    #[test]
    fn table_covers_every_field_once() {
        for chamber in [Chamber::House, Chamber::Senate] {
            let mut names: Vec<_> = CHAMBER_FIELDS.iter().map(|s| s.field.name(chamber)).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), 3);
            assert!(names.iter().all(|n| n.starts_with(chamber.region())));
        }
    }
}
