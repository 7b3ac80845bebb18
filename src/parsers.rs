use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ParsingError;
use crate::report::Report;

/// A parser for the output of one external tool.
///
/// Implementations own their [`crate::IssueBuilder`]: one per call to
/// [`IssueParser::parse`], never shared with another parse. Entries that
/// cannot be read are skipped or built with default values; an error is
/// returned only when the content as a whole is unreadable.
pub trait IssueParser: Send + Sync {
    /// Parser name (e.g. "grype", "gcc")
    fn name(&self) -> &str;

    /// Parse the raw report content
    fn parse(&self, content: &str) -> Result<Report, ParsingError>;

    /// Quick check whether `content` looks like this parser's format.
    fn accepts(&self, content: &str) -> bool {
        !content.trim().is_empty()
    }
}

/// Run independent parses in parallel. Results keep the input order.
pub fn parse_all(
    jobs: &[(&dyn IssueParser, &str)],
) -> Vec<Result<Report, ParsingError>> {
    jobs.par_iter()
        .map(|(parser, content)| {
            if !parser.accepts(content) {
                debug!("{}: content not accepted, returning empty report", parser.name());
                return Ok(Report::new());
            }
            let result = parser.parse(content);
            match &result {
                Ok(report) => debug!(
                    "{}: {} issues ({} duplicates)",
                    parser.name(),
                    report.len(),
                    report.duplicates_size()
                ),
                Err(e) => warn!("{}: {}", parser.name(), e),
            }
            result
        })
        .collect()
}

/// All issues of several reports in one report, in order.
pub fn merge_reports(reports: impl IntoIterator<Item = Report>) -> Report {
    let mut merged = Report::new();
    for report in reports {
        merged.add_all(report);
    }
    merged
}
