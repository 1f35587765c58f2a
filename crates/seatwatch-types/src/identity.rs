use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identity key for a tracked course section.
///
/// A `SectionId` is the only thing used to correlate a freshly fetched
/// snapshot with its tracked predecessor. Each component is trimmed and
/// upper-cased on construction, so `"cpsc "` and `"CPSC"` name the same
/// subject. Activity type and term are not part of the key.
///
/// Ordering: `subject` → `course` → `section`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSectionId")]
pub struct SectionId {
    subject: String,
    course: String,
    section: String,
}

/// Unnormalized wire form, validated through [`SectionId::new`].
#[derive(Deserialize)]
struct RawSectionId {
    subject: String,
    course: String,
    section: String,
}

impl TryFrom<RawSectionId> for SectionId {
    type Error = TypeError;

    fn try_from(raw: RawSectionId) -> Result<Self, Self::Error> {
        Self::new(&raw.subject, &raw.course, &raw.section)
    }
}

impl SectionId {
    /// Build a normalized identity. Fails if any component is blank.
    pub fn new(subject: &str, course: &str, section: &str) -> Result<Self, TypeError> {
        Ok(Self {
            subject: normalize(subject, "subject")?,
            course: normalize(course, "course")?,
            section: normalize(section, "section")?,
        })
    }

    /// Subject code, e.g. `CPSC`.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Course code, e.g. `213`.
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Section code, e.g. `101` or `L1A`.
    pub fn section(&self) -> &str {
        &self.section
    }
}

fn normalize(value: &str, component: &'static str) -> Result<String, TypeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeError::EmptyComponent { component });
    }
    Ok(trimmed.to_uppercase())
}

impl FromStr for SectionId {
    type Err = TypeError;

    /// Parse the whitespace-separated `"<subject> <course> <section>"` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [subject, course, section] => Self::new(subject, course, section),
            _ => Err(TypeError::InvalidIdentity(s.to_string())),
        }
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({} {} {})", self.subject, self.course, self.section)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.course, self.section)
    }
}
