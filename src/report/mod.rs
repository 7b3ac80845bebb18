pub mod issue;
pub mod line_range;

use std::hash::{Hash, Hasher};

use fnv::{FnvHashMap, FnvHasher};
use serde::Serialize;
use tracing::trace;

use crate::report::issue::{Issue, UNDEFINED};

/// Ordered collection of the issues of one report.
///
/// Issues keep their insertion order. Adding an issue equal to one already
/// present (ignoring the id) only increments the duplicate counter.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Id of the tool that produced the report
    origin: String,

    /// Display name of the tool
    origin_name: String,

    issues: Vec<Issue>,

    duplicates: usize,

    /// Issue indexes keyed by content hash
    #[serde(skip)]
    buckets: FnvHashMap<u64, Vec<usize>>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    pub fn new() -> Self {
        Report {
            origin: UNDEFINED.to_string(),
            origin_name: UNDEFINED.to_string(),
            issues: Vec::new(),
            duplicates: 0,
            buckets: FnvHashMap::default(),
        }
    }

    /// Empty report tagged with the tool that produced it.
    pub fn with_origin(origin: &str, origin_name: &str) -> Self {
        Report {
            origin: origin.to_string(),
            origin_name: origin_name.to_string(),
            ..Self::new()
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }

    /// Append `issue` unless an equal issue is already present.
    /// Returns false for duplicates.
    pub fn add(&mut self, issue: Issue) -> bool {
        let key = content_hash(&issue);
        let bucket = self.buckets.entry(key).or_default();
        if bucket.iter().any(|&idx| self.issues[idx] == issue) {
            trace!(
                "Skipping duplicate issue in {}:{}",
                issue.file_name(),
                issue.line_start()
            );
            self.duplicates += 1;
            return false;
        }
        bucket.push(self.issues.len());
        self.issues.push(issue);
        true
    }

    pub fn add_all(&mut self, issues: impl IntoIterator<Item = Issue>) {
        for issue in issues {
            self.add(issue);
        }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Alias of [`Report::len`].
    pub fn size(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue at `index` in insertion order.
    pub fn get(&self, index: usize) -> Option<&Issue> {
        self.issues.get(index)
    }

    /// Number of issues rejected as duplicates.
    pub fn duplicates_size(&self) -> usize {
        self.duplicates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

/// FNV keeps the hash stable between runs and Rust versions.
fn content_hash(issue: &Issue) -> u64 {
    let mut hasher = FnvHasher::default();
    issue.hash(&mut hasher);
    hasher.finish()
}

impl Extend<Issue> for Report {
    fn extend<I: IntoIterator<Item = Issue>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl FromIterator<Issue> for Report {
    fn from_iter<I: IntoIterator<Item = Issue>>(iter: I) -> Self {
        let mut report = Report::new();
        report.add_all(iter);
        report
    }
}

impl IntoIterator for Report {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::IssueBuilder;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let mut builder = IssueBuilder::new();
        let mut report = Report::new();
        for line in [30, 10, 20] {
            report.add(builder.set_file_name("a.c").set_line_start(line).build());
        }

        let lines: Vec<_> = report.iter().map(|i| i.line_start()).collect();
        assert_eq!(lines, vec![30, 10, 20]);
        assert_eq!(report.size(), 3);
        assert_eq!(report.get(1).map(|i| i.line_start()), Some(10));
        assert!(report.get(3).is_none());
    }

    #[test]
    fn counts_duplicates() {
        let mut builder = IssueBuilder::new();
        builder.set_file_name("a.c").set_line_start(1).set_message("unused variable");

        let mut report = Report::with_origin("gcc", "GNU C Compiler");
        assert!(report.add(builder.build()));
        assert!(!report.add(builder.build()));
        assert!(report.add(builder.set_line_start(2).build()));

        assert_eq!(report.len(), 2);
        assert_eq!(report.duplicates_size(), 1);
        assert_eq!(report.origin(), "gcc");
        assert_eq!(report.origin_name(), "GNU C Compiler");
    }

    #[test]
    fn payload_distinguishes_issues() {
        let mut builder = IssueBuilder::new();
        let first = builder.set_additional_properties(json!({"cvss": 5.0})).build();
        let second = builder.set_additional_properties(json!({"cvss": 9.8})).build();

        let report: Report = [first, second].into_iter().collect();
        assert_eq!(report.len(), 2);
        assert_eq!(report.duplicates_size(), 0);
    }

    #[test]
    fn serializes_issues_in_order() {
        let mut builder = IssueBuilder::new();
        let mut report = Report::new();
        report.add(builder.set_file_name("b.c").build());
        report.add(builder.set_file_name("a.c").build());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["issues"][0]["file_name"], "b.c");
        assert_eq!(value["issues"][1]["file_name"], "a.c");
        assert_eq!(value["duplicates"], 0);
        assert!(value.get("buckets").is_none());
    }
}
