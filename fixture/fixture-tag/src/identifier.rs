//! Model kinds, batch requests and the identifiers engraved on each fixture.

use std::fmt;
use std::ops::RangeInclusive;

/// Suffix appended to every output file stem.
pub const FILE_SUFFIX: &str = "_F.stl";

/// The standard appliance kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Upper active aligner.
    Upper,
    /// Upper passive aligner.
    UpperPassive,
    /// Upper retainer.
    UpperRetainer,
    /// Upper template.
    UpperTemplate,
    /// Lower active aligner.
    Lower,
    /// Lower passive aligner.
    LowerPassive,
    /// Lower retainer.
    LowerRetainer,
    /// Lower template.
    LowerTemplate,
}

impl ModelKind {
    /// All kinds in prompt order.
    pub const ALL: [Self; 8] = [
        Self::Upper,
        Self::UpperPassive,
        Self::UpperRetainer,
        Self::UpperTemplate,
        Self::Lower,
        Self::LowerPassive,
        Self::LowerRetainer,
        Self::LowerTemplate,
    ];

    /// Display name, e.g. `UPPER RETAINER`.
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::Upper => "UPPER",
            Self::UpperPassive => "UPPER PASSIVE",
            Self::UpperRetainer => "UPPER RETAINER",
            Self::UpperTemplate => "UPPER TEMPLATE",
            Self::Lower => "LOWER",
            Self::LowerPassive => "LOWER PASSIVE",
            Self::LowerRetainer => "LOWER RETAINER",
            Self::LowerTemplate => "LOWER TEMPLATE",
        }
    }

    /// Two-letter label engraved after the case number.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upper => "UN",
            Self::UpperPassive => "UP",
            Self::UpperRetainer => "UR",
            Self::UpperTemplate => "UT",
            Self::Lower => "LN",
            Self::LowerPassive => "LP",
            Self::LowerRetainer => "LR",
            Self::LowerTemplate => "LT",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

/// A run of models of one kind, numbered `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Label engraved on the fixture.
    pub label: String,
    /// First index, inclusive.
    pub start: u32,
    /// Last index, inclusive.
    pub end: u32,
}

impl ModelRequest {
    /// Request with an arbitrary name and label.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            start,
            end,
        }
    }

    /// Request for a standard kind.
    #[must_use]
    pub fn for_kind(kind: ModelKind, start: u32, end: u32) -> Self {
        Self::new(kind.full_name(), kind.label(), start, end)
    }

    /// Request for indices `1..=count`; empty when `count` is zero.
    #[must_use]
    pub fn count_of(kind: ModelKind, count: u32) -> Self {
        Self::for_kind(kind, 1, count)
    }

    /// The requested indices.
    #[must_use]
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Number of models requested.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices().count()
    }

    /// Whether nothing is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Identifier of one model in this request.
    #[must_use]
    pub fn identifier(&self, case_id: u64, index: u32) -> Identifier {
        Identifier::new(case_id, &self.label, index)
    }
}

/// Case number, label and two-digit index, e.g. `451287UN01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Case number.
    pub case_id: u64,
    /// Model label.
    pub label: String,
    /// Model index.
    pub index: u32,
}

impl Identifier {
    /// Build an identifier.
    #[must_use]
    pub fn new(case_id: u64, label: impl Into<String>, index: u32) -> Self {
        Self {
            case_id,
            label: label.into(),
            index,
        }
    }

    /// Output file name, e.g. `451287UN01_F.stl`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{self}{FILE_SUFFIX}")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:02}", self.case_id, self.label, self.index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn identifier_text_and_file_name() {
        let id = Identifier::new(451_287, "UN", 1);
        assert_eq!(id.to_string(), "451287UN01");
        assert_eq!(id.file_name(), "451287UN01_F.stl");
        assert_eq!(Identifier::new(7, "LT", 12).to_string(), "7LT12");
        assert_eq!(Identifier::new(7, "LT", 123).to_string(), "7LT123");
    }

    #[test]
    fn kinds_map_to_labels() {
        let labels: Vec<_> = ModelKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, ["UN", "UP", "UR", "UT", "LN", "LP", "LR", "LT"]);
        assert_eq!(ModelKind::LowerPassive.to_string(), "LOWER PASSIVE");
    }

    #[test]
    fn request_ranges() {
        let request = ModelRequest::for_kind(ModelKind::Upper, 1, 2);
        assert_eq!(request.indices().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(request.len(), 2);
        assert_eq!(request.identifier(451_287, 2).file_name(), "451287UN02_F.stl");

        let none = ModelRequest::count_of(ModelKind::Lower, 0);
        assert!(none.is_empty());
        assert_eq!(none.len(), 0);

        let shifted = ModelRequest::new("UPPER", "UN", 5, 7);
        assert_eq!(shifted.len(), 3);
    }
}
