use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A data-readiness condition a fastq may or may not currently satisfy.
///
/// Declaration order is the order requirements are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Requirement {
    #[serde(rename = "hasActiveReadSet")]
    ActiveReadSet,
    #[serde(rename = "hasQc")]
    Qc,
    #[serde(rename = "hasFingerprint")]
    Fingerprint,
    #[serde(rename = "hasFileCompressionInformation")]
    FileCompressionInformation,
    #[serde(rename = "hasReadCountInformation")]
    ReadCountInformation,
}

pub type RequirementSet = BTreeSet<Requirement>;

impl Requirement {
    pub const ALL: [Requirement; 5] = [
        Self::ActiveReadSet,
        Self::Qc,
        Self::Fingerprint,
        Self::FileCompressionInformation,
        Self::ReadCountInformation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActiveReadSet => "hasActiveReadSet",
            Self::Qc => "hasQc",
            Self::Fingerprint => "hasFingerprint",
            Self::FileCompressionInformation => "hasFileCompressionInformation",
            Self::ReadCountInformation => "hasReadCountInformation",
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Requirement {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|requirement| requirement.as_str() == value)
            .ok_or_else(|| SyncError::UnknownRequirement(value.to_string()))
    }
}

/// How strictly requests and records are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    /// Unknown requirement names are dropped and read-count information is
    /// judged by the compression-metadata check, as existing callers expect.
    #[default]
    Compatible,
    /// Unknown requirement names are rejected and read-count information is
    /// judged by the record's own read count.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRequirements {
    pub requirements: RequirementSet,
    /// Names dropped in compatible mode, in request order.
    pub ignored: Vec<String>,
}

pub fn parse_requirements(
    names: &[String],
    mode: EvaluationMode,
) -> Result<ParsedRequirements, SyncError> {
    let mut parsed = ParsedRequirements::default();
    for name in names {
        match name.parse::<Requirement>() {
            Ok(requirement) => {
                parsed.requirements.insert(requirement);
            }
            Err(error) if mode == EvaluationMode::Strict => return Err(error),
            Err(_) => parsed.ignored.push(name.clone()),
        }
    }
    Ok(parsed)
}
