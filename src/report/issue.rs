use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::builder::path;
use crate::intern::InternedStr;
use crate::report::line_range::LineRangeList;

/// Placeholder for string properties that were never set.
pub const UNDEFINED: &str = "-";

/// Severity of an issue, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    WarningLow,
    #[default]
    WarningNormal,
    WarningHigh,
    Error,
}

impl Severity {
    /// Map a free-form level reported by a tool ("fatal", "Medium", "info", ...)
    /// onto a severity. Unknown levels become [`Severity::WarningNormal`].
    pub fn guess_from_str(s: &str) -> Self {
        let level = s.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| level.contains(w));

        if contains_any(&["error", "severe", "critical", "fatal"]) {
            Severity::Error
        } else if contains_any(&["high", "major"]) {
            Severity::WarningHigh
        } else if contains_any(&["low", "info", "note", "minor", "trivial"]) {
            Severity::WarningLow
        } else {
            Severity::WarningNormal
        }
    }

    /// Short display name (`"HIGH"`). Serialization uses the full variant
    /// name (`"WARNING_HIGH"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::WarningHigh => "HIGH",
            Severity::WarningNormal => "NORMAL",
            Severity::WarningLow => "LOW",
        }
    }

    pub fn is_greater_or_equal(&self, other: Severity) -> bool {
        *self >= other
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single normalized finding. Only [`crate::IssueBuilder`] creates issues.
///
/// Equality and hashing ignore the `id`: two issues describing the same
/// finding are equal even if they were built separately. Use
/// [`Issue::is_same_record`] to compare record identity.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    /// Random id assigned at build time unless supplied
    pub(crate) id: Uuid,

    /// Directory context the file name refers to, e.g. the workspace root
    pub(crate) path_name: String,

    /// Normalized file name, forward slashes only
    pub(crate) file_name: InternedStr,

    pub(crate) line_start: usize,
    pub(crate) line_end: usize,
    pub(crate) column_start: usize,
    pub(crate) column_end: usize,

    /// Further affected ranges besides the primary one
    pub(crate) line_ranges: LineRangeList,

    pub(crate) category: String,

    #[serde(rename = "type")]
    pub(crate) kind: String,

    pub(crate) package_name: InternedStr,
    pub(crate) module_name: String,
    pub(crate) severity: Severity,

    /// Short, trimmed message
    pub(crate) message: InternedStr,

    /// Longer explanation, may contain markup
    pub(crate) description: String,

    /// Id and display name of the tool that reported the issue
    pub(crate) origin: String,
    pub(crate) origin_name: String,

    /// Correlates issues across runs, e.g. a build number
    pub(crate) reference: String,

    /// Detects duplicates independently of the id
    pub(crate) fingerprint: String,

    /// Tool specific payload
    pub(crate) additional_properties: Value,
}

impl Issue {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True if both values are the very same record, not merely equal.
    pub fn is_same_record(&self, other: &Issue) -> bool {
        self.id == other.id && self == other
    }

    pub fn path_name(&self) -> &str {
        &self.path_name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Interned handle of the file name.
    pub fn file_name_handle(&self) -> &InternedStr {
        &self.file_name
    }

    pub fn has_file_name(&self) -> bool {
        &*self.file_name != UNDEFINED
    }

    /// Last segment of the file name.
    pub fn base_name(&self) -> &str {
        path::base_name(&self.file_name)
    }

    /// Name of the directory that contains the file, or [`UNDEFINED`].
    pub fn folder(&self) -> &str {
        path::folder(&self.file_name)
    }

    /// The file name resolved against the path name. Absolute file names and
    /// issues without a path name return the file name.
    pub fn absolute_path(&self) -> String {
        if self.path_name == UNDEFINED || path::is_absolute(&self.file_name) {
            self.file_name.to_string()
        } else {
            format!("{}/{}", self.path_name.trim_end_matches('/'), self.file_name)
        }
    }

    pub fn line_start(&self) -> usize {
        self.line_start
    }

    pub fn line_end(&self) -> usize {
        self.line_end
    }

    pub fn column_start(&self) -> usize {
        self.column_start
    }

    pub fn column_end(&self) -> usize {
        self.column_end
    }

    pub fn line_ranges(&self) -> &LineRangeList {
        &self.line_ranges
    }

    /// True if `line` lies in the primary range or any additional range.
    pub fn affects_line(&self, line: usize) -> bool {
        let in_primary = self.line_start != 0 && self.line_start <= line && line <= self.line_end;
        in_primary || self.line_ranges.contains(line)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn package_name_handle(&self) -> &InternedStr {
        &self.package_name
    }

    pub fn has_package_name(&self) -> bool {
        &*self.package_name != UNDEFINED
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn has_module_name(&self) -> bool {
        self.module_name != UNDEFINED
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_handle(&self) -> &InternedStr {
        &self.message
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn additional_properties(&self) -> &Value {
        &self.additional_properties
    }
}

impl PartialEq for Issue {
    fn eq(&self, other: &Self) -> bool {
        self.path_name == other.path_name
            && self.file_name == other.file_name
            && self.line_start == other.line_start
            && self.line_end == other.line_end
            && self.column_start == other.column_start
            && self.column_end == other.column_end
            && self.line_ranges == other.line_ranges
            && self.category == other.category
            && self.kind == other.kind
            && self.package_name == other.package_name
            && self.module_name == other.module_name
            && self.severity == other.severity
            && self.message == other.message
            && self.description == other.description
            && self.origin == other.origin
            && self.origin_name == other.origin_name
            && self.reference == other.reference
            && self.fingerprint == other.fingerprint
            && self.additional_properties == other.additional_properties
    }
}

impl Eq for Issue {}

// The payload is left out: `Value` has no `Hash`, and equal issues still hash
// alike without it.
impl Hash for Issue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path_name.hash(state);
        self.file_name.hash(state);
        self.line_start.hash(state);
        self.line_end.hash(state);
        self.column_start.hash(state);
        self.column_end.hash(state);
        self.line_ranges.hash(state);
        self.category.hash(state);
        self.kind.hash(state);
        self.package_name.hash(state);
        self.module_name.hash(state);
        self.severity.hash(state);
        self.message.hash(state);
        self.description.hash(state);
        self.origin.hash(state);
        self.origin_name.hash(state);
        self.reference.hash(state);
        self.fingerprint.hash(state);
    }
}
