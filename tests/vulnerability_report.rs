use anyhow::Result;
use serde_json::{json, Value};

use issuekit::{
    BuilderSettings, InternedStr, IssueBuilder, IssueParser, ParsingError, Report, Severity,
};

/// Minimal vulnerability-scanner format: `{"matches": [{"vulnerability":
/// {...}, "artifact": {...}}]}`.
struct VulnerabilityParser {
    settings: BuilderSettings,
}

impl VulnerabilityParser {
    fn new() -> Self {
        let settings = BuilderSettings::from_toml_str(
            r#"
origin = "vulnscan"
origin_name = "Vulnerability Scanner"
"#,
        )
        .expect("valid settings");
        VulnerabilityParser { settings }
    }
}

impl IssueParser for VulnerabilityParser {
    fn name(&self) -> &str {
        "vulnscan"
    }

    fn parse(&self, content: &str) -> Result<Report, ParsingError> {
        let document: Value = serde_json::from_str(content).map_err(|source| ParsingError::Json {
            parser: self.name().to_string(),
            source,
        })?;
        let Some(matches) = document.get("matches").and_then(Value::as_array) else {
            return Err(ParsingError::Format {
                parser: self.name().to_string(),
                reason: "missing matches".to_string(),
            });
        };

        let mut builder = IssueBuilder::with_settings(&self.settings);
        let mut report = Report::with_origin("vulnscan", "Vulnerability Scanner");
        for entry in matches {
            let vulnerability = &entry["vulnerability"];
            let level = vulnerability["severity"].as_str().unwrap_or_default();
            let id = vulnerability["id"].as_str().unwrap_or_default();
            let link = vulnerability["dataSource"].as_str().unwrap_or_default();

            builder
                .set_file_name(entry["artifact"]["locations"][0]["path"].as_str())
                .set_package_name(entry["artifact"]["name"].as_str().unwrap_or_default())
                .set_category(level)
                .guess_severity(level)
                .set_type(id)
                .set_message(vulnerability["description"].as_str().unwrap_or_default())
                .set_description(&format!("<p><a href=\"{link}\">{link}</a></p>"))
                .set_additional_properties(entry["artifact"].clone());
            report.add(builder.build_and_clean());
        }
        Ok(report)
    }
}

fn sample() -> String {
    json!({
        "matches": [
            {
                "vulnerability": {
                    "id": "CVE-2015-5345",
                    "severity": "Medium",
                    "description": " The Mapper component processes redirects before considering security constraints. ",
                    "dataSource": "https://nvd.nist.gov/vuln/detail/CVE-2015-5345"
                },
                "artifact": {
                    "name": "tomcat-jdbc",
                    "locations": [{"path": "tomcat-jdbc\\8.0.28\\tomcat-jdbc-8.0.28.jar"}]
                }
            },
            {
                "vulnerability": {
                    "id": "CVE-2016-0706",
                    "severity": "Low",
                    "description": "Apache Tomcat does not place a servlet on the RestrictedServlets list.",
                    "dataSource": "https://nvd.nist.gov/vuln/detail/CVE-2016-0706"
                },
                "artifact": {
                    "name": "tomcat-jdbc",
                    "locations": [{"path": "tomcat-jdbc/8.0.28/tomcat-jdbc-8.0.28.jar"}]
                }
            },
            {
                "vulnerability": {
                    "id": "CVE-2016-8745",
                    "severity": "High",
                    "description": "A bug in the error handling of the send file code.",
                    "dataSource": "https://nvd.nist.gov/vuln/detail/CVE-2016-8745"
                },
                "artifact": {
                    "name": "tomcat-jdbc",
                    "locations": []
                }
            }
        ]
    })
    .to_string()
}

#[test]
fn parses_vulnerability_report() -> Result<()> {
    let report = VulnerabilityParser::new().parse(&sample())?;

    assert_eq!(report.size(), 3);
    assert_eq!(report.duplicates_size(), 0);

    let first = report.get(0).expect("first issue");
    assert_eq!(first.file_name(), "tomcat-jdbc/8.0.28/tomcat-jdbc-8.0.28.jar");
    assert_eq!(first.base_name(), "tomcat-jdbc-8.0.28.jar");
    assert_eq!(first.folder(), "8.0.28");
    assert_eq!(first.severity(), Severity::WarningNormal);
    assert_eq!(first.category(), "Medium");
    assert_eq!(first.kind(), "CVE-2015-5345");
    assert_eq!(
        first.message(),
        "The Mapper component processes redirects before considering security constraints."
    );
    assert_eq!(
        first.description(),
        "<p><a href=\"https://nvd.nist.gov/vuln/detail/CVE-2015-5345\">https://nvd.nist.gov/vuln/detail/CVE-2015-5345</a></p>"
    );
    assert_eq!(first.origin(), "vulnscan");
    assert_eq!(first.origin_name(), "Vulnerability Scanner");
    assert_eq!(first.additional_properties()["name"], "tomcat-jdbc");

    let second = report.get(1).expect("second issue");
    assert_eq!(second.severity(), Severity::WarningLow);
    assert!(InternedStr::ptr_eq(
        first.file_name_handle(),
        second.file_name_handle()
    ));
    assert!(InternedStr::ptr_eq(
        first.package_name_handle(),
        second.package_name_handle()
    ));

    let third = report.get(2).expect("third issue");
    assert_eq!(third.severity(), Severity::WarningHigh);
    assert_eq!(third.file_name(), "-");
    assert_eq!(third.folder(), "-");
    Ok(())
}

#[test]
fn rejects_unreadable_content() {
    let parser = VulnerabilityParser::new();

    let err = parser.parse("{ not json").unwrap_err();
    assert!(matches!(err, ParsingError::Json { .. }));

    let err = parser.parse("{}").unwrap_err();
    assert!(err.to_string().contains("missing matches"));
}

#[test]
fn parses_reports_in_parallel() -> Result<()> {
    let parser = VulnerabilityParser::new();
    let content = sample();
    let jobs: Vec<(&dyn IssueParser, &str)> = vec![
        (&parser, content.as_str()),
        (&parser, "{}"),
        (&parser, content.as_str()),
    ];

    let results = issuekit::parse_all(&jobs);
    let first = results[0].as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
    let last = results[2].as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
    assert!(results[1].is_err());

    // separate builders, separate pools: equal text, different storage
    assert_eq!(first.get(0), last.get(0));
    assert!(!InternedStr::ptr_eq(
        first.get(0).expect("issue").file_name_handle(),
        last.get(0).expect("issue").file_name_handle()
    ));

    let merged = issuekit::merge_reports(results.into_iter().filter_map(Result::ok));
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.duplicates_size(), 3);
    Ok(())
}
