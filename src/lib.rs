//! Normalizes findings of static-analysis and security tools into canonical,
//! immutable [`Issue`] records.
//!
//! A tool specific parser drives one [`IssueBuilder`] per report: it sets the
//! properties of a finding, calls [`IssueBuilder::build`] and collects the
//! result in a [`Report`]. The builder coerces malformed input instead of
//! failing and interns repeated file names, package names and messages.
//!
//! ```
//! use issuekit::{IssueBuilder, Report, Severity};
//!
//! let mut builder = IssueBuilder::new();
//! builder.set_directory("/work").set_origin("gcc");
//!
//! let mut report = Report::new();
//! report.add(
//!     builder
//!         .set_file_name("src\\main.c")
//!         .set_line_start("12")
//!         .set_severity(Severity::WarningHigh)
//!         .set_message("  unused variable 'x'  ")
//!         .build_and_clean(),
//! );
//!
//! let issue = report.get(0).unwrap();
//! assert_eq!(issue.file_name(), "/work/src/main.c");
//! assert_eq!(issue.folder(), "src");
//! assert_eq!((issue.line_start(), issue.line_end()), (12, 12));
//! assert_eq!(issue.message(), "unused variable 'x'");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod intern;
pub mod parsers;
pub mod report;

pub use builder::{Coordinate, IssueBuilder};
pub use config::BuilderSettings;
pub use error::{ConfigError, ParsingError};
pub use intern::{Category, InternedStr, StringPool};
pub use parsers::{merge_reports, parse_all, IssueParser};
pub use report::issue::{Issue, Severity, UNDEFINED};
pub use report::line_range::{LineRange, LineRangeList};
pub use report::Report;
