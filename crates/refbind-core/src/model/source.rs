use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

///
/// ReferenceType
///
/// Fixed set of evidence kinds a Source can carry.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceType {
    #[display("Document")]
    Document,
    #[display("Verbal")]
    Verbal,
    #[display("Certificate issuer")]
    CertificateIssuer,
    #[display("Employer letter")]
    EmployerLetter,
    #[display("Public record")]
    PublicRecord,
}

impl ReferenceType {
    pub const ALL: [Self; 5] = [
        Self::Document,
        Self::Verbal,
        Self::CertificateIssuer,
        Self::EmployerLetter,
        Self::PublicRecord,
    ];
}

///
/// DateObtained
///
/// When the evidence was obtained. Accepts `YYYY-MM-DD` (midnight) as well
/// as `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{}", _0.format(DateObtained::FORMAT))]
pub struct DateObtained(NaiveDateTime);

impl DateObtained {
    const FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.f";

    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    pub fn parse_flexible(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if let Ok(at) = NaiveDateTime::parse_from_str(s, Self::FORMAT) {
            return Ok(Self(at));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|date| Self(date.and_time(chrono::NaiveTime::MIN)))
            .map_err(|e| format!("date obtained parse error: {e}"))
    }

    #[must_use]
    pub const fn get(self) -> NaiveDateTime {
        self.0
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0.date()
    }
}

impl Default for DateObtained {
    fn default() -> Self {
        Self(NaiveDateTime::UNIX_EPOCH)
    }
}

impl FromStr for DateObtained {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_flexible(s)
    }
}

impl Serialize for DateObtained {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateObtained {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::parse_flexible(&raw).map_err(serde::de::Error::custom)
    }
}

///
/// Source
///
/// One attestation for a field's value. Identified only by its position
/// inside the owning Reference.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub reference_type: ReferenceType,
    pub date_obtained: DateObtained,
    #[serde(default)]
    pub comment: String,
}

impl Source {
    #[must_use]
    pub const fn new(reference_type: ReferenceType, date_obtained: DateObtained) -> Self {
        Self {
            reference_type,
            date_obtained,
            comment: String::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

///
/// SourceDraft
///
/// Editing-panel state for a Source before it is submitted.
/// A draft is complete once its reference type has been chosen.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDraft {
    pub reference_type: Option<ReferenceType>,
    pub date_obtained: DateObtained,
    #[serde(default)]
    pub comment: String,
}

impl SourceDraft {
    #[must_use]
    pub fn new(date_obtained: DateObtained) -> Self {
        Self {
            date_obtained,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.reference_type.is_some()
    }

    /// Whether the comment input should start expanded.
    #[must_use]
    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    /// Turn the draft into a Source, or `None` while incomplete.
    #[must_use]
    pub fn complete(self) -> Option<Source> {
        Some(Source {
            reference_type: self.reference_type?,
            date_obtained: self.date_obtained,
            comment: self.comment,
        })
    }
}

impl From<&Source> for SourceDraft {
    fn from(source: &Source) -> Self {
        Self {
            reference_type: Some(source.reference_type),
            date_obtained: source.date_obtained,
            comment: source.comment.clone(),
        }
    }
}

///
/// TESTS
///
