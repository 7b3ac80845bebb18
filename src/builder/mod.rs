pub mod path;

use serde_json::Value;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::config::BuilderSettings;
use crate::intern::{Category, StringPool};
use crate::report::issue::{Issue, Severity, UNDEFINED};
use crate::report::line_range::{normalize_pair, LineRange, LineRangeList};

/// A line or column number as reported by a tool.
///
/// Conversion never fails: negative, unparsable or missing values become 0.
pub trait Coordinate {
    fn to_coordinate(self) -> usize;
}

macro_rules! coordinate_from_int {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t {
                fn to_coordinate(self) -> usize {
                    usize::try_from(self).unwrap_or(0)
                }
            }
        )*
    };
}

coordinate_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Coordinate for &str {
    fn to_coordinate(self) -> usize {
        self.trim()
            .parse::<i64>()
            .ok()
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(0)
    }
}

impl Coordinate for String {
    fn to_coordinate(self) -> usize {
        self.as_str().to_coordinate()
    }
}

impl Coordinate for &String {
    fn to_coordinate(self) -> usize {
        self.as_str().to_coordinate()
    }
}

impl<T: Coordinate> Coordinate for Option<T> {
    fn to_coordinate(self) -> usize {
        self.map_or(0, Coordinate::to_coordinate)
    }
}

/// File name as held by the builder until the next build.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileName {
    Unset,
    /// As reported by the tool, resolved against the directory at build time
    Raw(String),
    /// Taken from an existing issue, used verbatim
    Resolved(String),
}

/// Trimmed value, or [`UNDEFINED`] when blank.
fn or_undefined(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNDEFINED.to_string()
    } else {
        value.to_string()
    }
}

/// Creates [`Issue`] instances from loosely typed tool output.
///
/// A parser owns one builder for the whole report: it sets the properties of
/// one finding, calls [`IssueBuilder::build`] (or
/// [`IssueBuilder::build_and_clean`]) and repeats. File names, package names
/// and messages are interned in a pool owned by the builder, so issues of one
/// report share their repeated strings.
///
/// No setter and no build call fails. Malformed input is coerced to a default.
pub struct IssueBuilder {
    /// Interned strings of this parsing session
    pool: StringPool,
    /// Defaults restored by `build_and_clean`
    settings: BuilderSettings,
    /// Explicit id for the next build only
    id: Option<Uuid>,
    path_name: String,
    directory: Option<String>,
    file_name: FileName,
    line_start: usize,
    line_end: usize,
    column_start: usize,
    column_end: usize,
    line_ranges: LineRangeList,
    category: String,
    kind: String,
    package_name: String,
    module_name: String,
    severity: Severity,
    message: String,
    description: String,
    origin: String,
    origin_name: String,
    reference: String,
    fingerprint: String,
    additional_properties: Value,
    /// Number of issues created so far
    built: usize,
}

impl Default for IssueBuilder {
    fn default() -> Self {
        Self::with_settings(&BuilderSettings::default())
    }
}

impl IssueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose defaults come from `settings`.
    pub fn with_settings(settings: &BuilderSettings) -> Self {
        let mut builder = IssueBuilder {
            pool: StringPool::new(),
            settings: settings.clone(),
            id: None,
            path_name: UNDEFINED.to_string(),
            directory: None,
            file_name: FileName::Unset,
            line_start: 0,
            line_end: 0,
            column_start: 0,
            column_end: 0,
            line_ranges: LineRangeList::new(),
            category: UNDEFINED.to_string(),
            kind: UNDEFINED.to_string(),
            package_name: UNDEFINED.to_string(),
            module_name: UNDEFINED.to_string(),
            severity: Severity::default(),
            message: String::new(),
            description: String::new(),
            origin: UNDEFINED.to_string(),
            origin_name: UNDEFINED.to_string(),
            reference: String::new(),
            fingerprint: UNDEFINED.to_string(),
            additional_properties: Value::Null,
            built: 0,
        };
        builder.apply_settings();
        if let Some(origin) = settings.origin.as_deref() {
            builder.set_origin(origin);
        }
        if let Some(origin_name) = settings.origin_name.as_deref() {
            builder.set_origin_name(origin_name);
        }
        builder
    }

    fn apply_settings(&mut self) {
        if let Some(directory) = self.settings.directory.clone() {
            self.set_directory(&directory);
        }
        if let Some(path_name) = self.settings.path_name.clone() {
            self.set_path_name(&path_name);
        }
    }

    /// Use `id` for the next built issue. Later builds generate fresh ids
    /// again unless this is called before each of them.
    pub fn set_id(&mut self, id: Uuid) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn set_path_name(&mut self, path_name: &str) -> &mut Self {
        self.path_name = or_undefined(path_name);
        self
    }

    /// Directory that relative file names are resolved against. An empty
    /// directory disables the resolution.
    pub fn set_directory(&mut self, directory: &str) -> &mut Self {
        self.directory = Some(directory.to_string());
        self
    }

    /// Raw file name as reported by the tool. `None` resets it to [`UNDEFINED`].
    pub fn set_file_name<'a>(&mut self, file_name: impl Into<Option<&'a str>>) -> &mut Self {
        self.file_name = match file_name.into() {
            Some(name) => FileName::Raw(name.to_string()),
            None => FileName::Unset,
        };
        self
    }

    pub fn set_line_start(&mut self, line: impl Coordinate) -> &mut Self {
        self.line_start = line.to_coordinate();
        self
    }

    pub fn set_line_end(&mut self, line: impl Coordinate) -> &mut Self {
        self.line_end = line.to_coordinate();
        self
    }

    pub fn set_column_start(&mut self, column: impl Coordinate) -> &mut Self {
        self.column_start = column.to_coordinate();
        self
    }

    pub fn set_column_end(&mut self, column: impl Coordinate) -> &mut Self {
        self.column_end = column.to_coordinate();
        self
    }

    /// Replace the additional line ranges.
    pub fn set_line_ranges(&mut self, line_ranges: LineRangeList) -> &mut Self {
        self.line_ranges = line_ranges;
        self
    }

    pub fn add_line_range(&mut self, line_range: LineRange) -> &mut Self {
        self.line_ranges.add(line_range);
        self
    }

    pub fn set_category(&mut self, category: &str) -> &mut Self {
        self.category = or_undefined(category);
        self
    }

    pub fn set_type(&mut self, kind: &str) -> &mut Self {
        self.kind = or_undefined(kind);
        self
    }

    pub fn set_package_name(&mut self, package_name: &str) -> &mut Self {
        self.package_name = or_undefined(package_name);
        self
    }

    pub fn set_module_name(&mut self, module_name: &str) -> &mut Self {
        self.module_name = or_undefined(module_name);
        self
    }

    pub fn set_severity(&mut self, severity: Severity) -> &mut Self {
        self.severity = severity;
        self
    }

    /// Set the severity from a tool specific level, see
    /// [`Severity::guess_from_str`].
    pub fn guess_severity(&mut self, level: &str) -> &mut Self {
        self.severity = Severity::guess_from_str(level);
        self
    }

    pub fn set_message(&mut self, message: &str) -> &mut Self {
        self.message = message.trim().to_string();
        self
    }

    pub fn set_description(&mut self, description: &str) -> &mut Self {
        self.description = description.trim().to_string();
        self
    }

    pub fn set_origin(&mut self, origin: &str) -> &mut Self {
        self.origin = or_undefined(origin);
        self
    }

    pub fn set_origin_name(&mut self, origin_name: &str) -> &mut Self {
        self.origin_name = or_undefined(origin_name);
        self
    }

    pub fn set_reference(&mut self, reference: &str) -> &mut Self {
        self.reference = reference.to_string();
        self
    }

    pub fn set_fingerprint(&mut self, fingerprint: &str) -> &mut Self {
        self.fingerprint = or_undefined(fingerprint);
        self
    }

    pub fn set_additional_properties(&mut self, properties: impl Into<Value>) -> &mut Self {
        self.additional_properties = properties.into();
        self
    }

    /// Load every property of `issue`, including its id and line ranges.
    /// The copied file name is already resolved and is not prefixed with the
    /// directory again; later calls to `set_file_name` are.
    pub fn copy(&mut self, issue: &Issue) -> &mut Self {
        self.id = Some(issue.id);
        self.path_name = issue.path_name.clone();
        self.file_name = if issue.has_file_name() {
            FileName::Resolved(issue.file_name.to_string())
        } else {
            FileName::Unset
        };
        self.line_start = issue.line_start;
        self.line_end = issue.line_end;
        self.column_start = issue.column_start;
        self.column_end = issue.column_end;
        self.line_ranges = issue.line_ranges.clone();
        self.category = issue.category.clone();
        self.kind = issue.kind.clone();
        self.package_name = issue.package_name.to_string();
        self.module_name = issue.module_name.clone();
        self.severity = issue.severity;
        self.message = issue.message.to_string();
        self.description = issue.description.clone();
        self.origin = issue.origin.clone();
        self.origin_name = issue.origin_name.clone();
        self.reference = issue.reference.clone();
        self.fingerprint = issue.fingerprint.clone();
        self.additional_properties = issue.additional_properties.clone();
        self
    }

    /// Create a new issue from the current properties. The builder keeps its
    /// state, except for an explicit id which is used only once.
    pub fn build(&mut self) -> Issue {
        let (line_start, line_end, line_ranges) = self.reconcile_lines();
        let (column_start, column_end) = normalize_pair(self.column_start, self.column_end);

        let file_name = match &self.file_name {
            FileName::Unset => UNDEFINED.to_string(),
            FileName::Raw(raw) => {
                path::normalize_file_name(Some(raw.as_str()), self.directory.as_deref())
            }
            FileName::Resolved(resolved) => resolved.clone(),
        };
        let file_name = self.pool.intern(Category::FileName, &file_name);
        let package_name = self.pool.intern(Category::PackageName, &self.package_name);
        let message = self.pool.intern(Category::Message, &self.message);

        let id = self.id.take().unwrap_or_else(Uuid::new_v4);
        self.built += 1;

        Issue {
            id,
            path_name: self.path_name.clone(),
            file_name,
            line_start,
            line_end,
            column_start,
            column_end,
            line_ranges,
            category: self.category.clone(),
            kind: self.kind.clone(),
            package_name,
            module_name: self.module_name.clone(),
            severity: self.severity,
            message,
            description: self.description.clone(),
            origin: self.origin.clone(),
            origin_name: self.origin_name.clone(),
            reference: self.reference.clone(),
            fingerprint: self.fingerprint.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }

    /// Same as [`IssueBuilder::build`], then reset all properties so the next
    /// finding starts from scratch. The tool identity (origin and origin name)
    /// and the string pool are kept.
    pub fn build_and_clean(&mut self) -> Issue {
        let issue = self.build();
        self.clean();
        issue
    }

    fn clean(&mut self) {
        self.id = None;
        self.path_name = UNDEFINED.to_string();
        self.directory = None;
        self.file_name = FileName::Unset;
        self.line_start = 0;
        self.line_end = 0;
        self.column_start = 0;
        self.column_end = 0;
        self.line_ranges = LineRangeList::new();
        self.category = UNDEFINED.to_string();
        self.kind = UNDEFINED.to_string();
        self.package_name = UNDEFINED.to_string();
        self.module_name = UNDEFINED.to_string();
        self.severity = Severity::default();
        self.message.clear();
        self.description.clear();
        self.reference.clear();
        self.fingerprint = UNDEFINED.to_string();
        self.additional_properties = Value::Null;
        self.apply_settings();
    }

    /// Merge the primary line range with the additional ranges and clamp it.
    ///
    /// - no primary range: the first additional range becomes the primary one
    /// - only a line end: the first range is adopted if it ends on that line
    /// - otherwise the first range is dropped if it equals the primary range
    fn reconcile_lines(&self) -> (usize, usize, LineRangeList) {
        let mut ranges = self.line_ranges.clone();
        let (mut start, mut end) = (self.line_start, self.line_end);

        if let Some(first) = ranges.first().copied() {
            let adopt = start == 0 && (end == 0 || end == first.end());
            if adopt {
                start = first.start();
                end = first.end();
                ranges.remove(0);
            } else if normalize_pair(start, end) == (first.start(), first.end()) {
                trace!(
                    "Dropping line range {}-{}: same as primary range",
                    first.start(),
                    first.end()
                );
                ranges.remove(0);
            }
        }

        let (start, end) = normalize_pair(start, end);
        (start, end, ranges)
    }

    /// Number of issues built by this builder.
    pub fn built(&self) -> usize {
        self.built
    }

    /// The string pool of this session.
    pub fn pool(&self) -> &StringPool {
        &self.pool
    }
}

impl Drop for IssueBuilder {
    fn drop(&mut self) {
        let interned = [Category::FileName, Category::PackageName, Category::Message]
            .iter()
            .map(|category| format!("{} {}", self.pool.len(*category), category.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        debug!(
            "Issue builder released: {} issues, interned strings: {}",
            self.built, interned
        );
    }
}
