use std::sync::LazyLock;

use regex::Regex;

use crate::report::issue::UNDEFINED;

/// Leading slash, drive letter (`C:/`) or URI scheme (`file:`, `https://`).
static ABSOLUTE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:/|[A-Za-z]:/|[A-Za-z][A-Za-z0-9+.\-]*://|file:)").expect("valid pattern")
});

/// Check for an absolute path on any platform. Expects forward slashes.
pub fn is_absolute(path: &str) -> bool {
    ABSOLUTE_PATH.is_match(path)
}

/// Replace all backslashes with forward slashes.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve a raw file name reported by a tool.
///
/// - missing or blank file name: [`UNDEFINED`]
/// - absolute file name: kept (with forward slashes)
/// - relative file name: prefixed with `directory` when that is non-empty
pub fn normalize_file_name(file_name: Option<&str>, directory: Option<&str>) -> String {
    let Some(raw) = file_name.filter(|name| !name.trim().is_empty()) else {
        return UNDEFINED.to_string();
    };

    let file_name = to_forward_slashes(raw);
    if is_absolute(&file_name) {
        return file_name;
    }

    match directory.map(to_forward_slashes) {
        Some(dir) if !dir.is_empty() => {
            let relative = file_name.strip_prefix("./").unwrap_or(&file_name);
            format!("{}/{}", dir.trim_end_matches('/'), relative)
        }
        _ => file_name,
    }
}

/// Last segment of a normalized path.
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Name of the directory that directly contains the file, or [`UNDEFINED`]
/// if the path has no parent segment.
pub fn folder(path: &str) -> &str {
    let Some(idx) = path.rfind('/') else {
        return UNDEFINED;
    };
    path[..idx]
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(UNDEFINED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_name_is_undefined() {
        assert_eq!(normalize_file_name(None, Some("/tmp")), "-");
    }

    #[test]
    fn blank_file_name_is_undefined() {
        for blank in ["", "  "] {
            assert_eq!(normalize_file_name(Some(blank), None), "-");
            assert_eq!(normalize_file_name(Some(blank), Some("/tmp")), "-");
        }
    }

    #[test]
    fn relative_without_directory_is_unchanged() {
        assert_eq!(normalize_file_name(Some("relative.txt"), None), "relative.txt");
        assert_eq!(normalize_file_name(Some("relative.txt"), Some("")), "relative.txt");
    }

    #[test]
    fn relative_with_directory_is_prefixed() {
        assert_eq!(
            normalize_file_name(Some("relative.txt"), Some("/tmp")),
            "/tmp/relative.txt"
        );
        assert_eq!(
            normalize_file_name(Some("./src\\lib.rs"), Some("C:\\work\\")),
            "C:/work/src/lib.rs"
        );
    }

    #[test]
    fn absolute_paths_ignore_directory() {
        assert_eq!(
            normalize_file_name(Some("C:\\tmp\\absolute.txt"), Some("/work")),
            "C:/tmp/absolute.txt"
        );
        assert_eq!(
            normalize_file_name(Some("/tmp/absolute.txt"), Some("/work")),
            "/tmp/absolute.txt"
        );
        assert_eq!(
            normalize_file_name(Some("file:/opt/app.jar"), Some("/work")),
            "file:/opt/app.jar"
        );
        assert_eq!(
            normalize_file_name(Some("\\\\server\\share\\a.c"), Some("/work")),
            "//server/share/a.c"
        );
    }

    #[test]
    fn base_names() {
        for path in [
            "/path/to/file.txt",
            "./file.txt",
            "file.txt",
            "C:/Programme/Folder/file.txt",
            "C:/file.txt",
        ] {
            assert_eq!(base_name(path), "file.txt", "path {path}");
        }
        assert_eq!(base_name("-"), "-");
    }

    #[test]
    fn folders() {
        assert_eq!(folder("/tmp/relative.txt"), "tmp");
        assert_eq!(folder("a/b/c.txt"), "b");
        assert_eq!(folder("relative.txt"), "-");
        assert_eq!(folder("/root.txt"), "-");
        assert_eq!(folder("-"), "-");
    }
}
