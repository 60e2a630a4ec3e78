//! Golden tests for xmlscan
//!
//! These tests verify that command outputs match the expected shape for a
//! fixed fixture document. Golden tests ensure:
//! - Output format stability across versions
//! - Consistent parsing and counting behavior
//! - No unexpected regressions in output structure

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// The fixture book: two sections, one resolvable link, one dangling
/// link, one external link
fn demo_book() -> PathBuf {
    fixtures_dir().join("demo.fb2")
}

/// Create a command for running the xmlscan binary
fn xmlscan_cmd() -> Command {
    let mut cmd = Command::cargo_bin("xmlscan").expect("Failed to find xmlscan binary");
    cmd.env_remove("XML");
    cmd
}

/// Parse JSONL output into a vector of JSON values
fn parse_jsonl(output: &str) -> Vec<Value> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Report Tests ====================

    #[test]
    fn golden_report_structure() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("report").arg(demo_book());

        let output = cmd.output().expect("failed to execute");
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let items = parse_jsonl(&stdout);

        // source + two internal links + letters
        assert_eq!(items.len(), 4, "Expected 4 report items");

        let kinds: Vec<&str> = items
            .iter()
            .filter_map(|v| v.get("kind").and_then(|k| k.as_str()))
            .collect();
        assert_eq!(kinds, vec!["source", "link", "link", "letters"]);

        // Every item names the source it was derived from
        for item in &items {
            let source = item.get("source").and_then(|s| s.as_str()).unwrap();
            assert!(source.ends_with("demo.fb2"));
            assert!(item.get("meta").is_some(), "meta field must exist");
        }
    }

    #[test]
    fn golden_report_link_statuses() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("report").arg(demo_book());

        let output = cmd.output().expect("failed to execute");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let items = parse_jsonl(&stdout);

        let links: Vec<&Value> = items
            .iter()
            .filter(|v| v.get("kind").and_then(|k| k.as_str()) == Some("link"))
            .collect();
        assert_eq!(links.len(), 2);

        let data0 = links[0].get("data").unwrap();
        assert_eq!(data0.get("href").and_then(|h| h.as_str()), Some("#intro"));
        assert_eq!(data0.get("target").and_then(|t| t.as_str()), Some("intro"));
        assert_eq!(
            data0.get("status").and_then(|s| s.as_str()),
            Some("resolved")
        );

        let data1 = links[1].get("data").unwrap();
        assert_eq!(
            data1.get("href").and_then(|h| h.as_str()),
            Some("#missing")
        );
        assert_eq!(
            data1.get("status").and_then(|s| s.as_str()),
            Some("broken")
        );

        // Link items carry the element's byte range in the source
        for link in &links {
            let range = link.get("range").unwrap();
            let start = range.get("start").and_then(|v| v.as_u64()).unwrap();
            let end = range.get("end").and_then(|v| v.as_u64()).unwrap();
            assert!(start < end);
        }
    }

    #[test]
    fn golden_report_letter_counts() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("report").arg(demo_book());

        let output = cmd.output().expect("failed to execute");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let items = parse_jsonl(&stdout);

        let letters = items
            .iter()
            .find(|v| v.get("kind").and_then(|k| k.as_str()) == Some("letters"))
            .expect("letters item present");
        let data = letters.get("data").unwrap();

        // "Hello world" + "Привет" + "to intro" + "dangling" + "external"
        // raw: 10 + 6 + 7 + 8 + 8 letters, whitespace stripped
        assert_eq!(data.get("raw").and_then(|v| v.as_u64()), Some(39));
        // normalized: 11 + 6 + 8 + 8 + 8 characters, spaces kept
        assert_eq!(data.get("normalized").and_then(|v| v.as_u64()), Some(41));
    }

    #[test]
    fn golden_report_is_stable_across_runs() {
        let run = || {
            let mut cmd = xmlscan_cmd();
            cmd.arg("report").arg(demo_book());
            let output = cmd.output().expect("failed to execute");
            String::from_utf8_lossy(&output.stdout).to_string()
        };

        assert_eq!(run(), run());
    }

    // ==================== Source Tests ====================

    #[test]
    fn golden_source_hash_matches_content() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("source").arg(demo_book());

        let output = cmd.output().expect("failed to execute");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let items = parse_jsonl(&stdout);
        assert_eq!(items.len(), 1);

        let meta = items[0].get("meta").unwrap();
        let hash = meta.get("hash").and_then(|h| h.as_str()).unwrap();
        assert_eq!(hash.len(), 16, "XXH3 hash is 16 hex chars");

        let size = meta.get("size").and_then(|s| s.as_u64()).unwrap();
        let on_disk = std::fs::metadata(demo_book()).unwrap().len();
        assert_eq!(size, on_disk);
    }

    // ==================== Malformed Input Tests ====================

    #[test]
    fn golden_malformed_fixture_reports_parse_error() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("report").arg(fixtures_dir().join("malformed.xml"));

        let output = cmd.output().expect("failed to execute");
        assert!(output.status.success(), "parse failure is not an abort");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let items = parse_jsonl(&stdout);

        assert_eq!(
            items[0].get("kind").and_then(|k| k.as_str()),
            Some("error")
        );
        assert_eq!(
            items[0].get("stage").and_then(|s| s.as_str()),
            Some("parse")
        );
    }

    // ==================== Markdown Tests ====================

    #[test]
    fn golden_markdown_report() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("report")
            .arg(demo_book())
            .arg("--format")
            .arg("md");

        let output = cmd.output().expect("failed to execute");
        let stdout = String::from_utf8_lossy(&output.stdout);

        assert!(stdout.contains("## Source"));
        assert!(stdout.contains("## Internal Links"));
        assert!(stdout.contains("Internal links: **2**"));
        assert!(stdout.contains("Broken internal links: **1**"));
        assert!(stdout.contains("`#missing` (**broken**)"));
        assert!(stdout.contains("`#intro` (resolved)"));
        assert!(stdout.contains("## Letter Counts"));
        assert!(stdout.contains("**39**"));
        assert!(stdout.contains("**41**"));
    }

    // ==================== Pretty Output Tests ====================

    #[test]
    fn golden_pretty_json_is_parseable() {
        let mut cmd = xmlscan_cmd();
        cmd.arg("report")
            .arg(demo_book())
            .arg("--format")
            .arg("json")
            .arg("--pretty");

        let output = cmd.output().expect("failed to execute");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let items: Value = serde_json::from_str(stdout.trim()).expect("valid json array");
        assert_eq!(items.as_array().unwrap().len(), 4);
    }
}
