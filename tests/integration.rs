use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn doc_checker_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_doc-checker"))
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("handbook.txt"),
        "Students must attend at least 75% of classes to sit the final exam.",
    )
    .unwrap();
    fs::write(
        files_dir.join("rules.txt"),
        "An attendance rate of 70% is sufficient for exam eligibility.",
    )
    .unwrap();
    fs::write(
        files_dir.join("guidelines.docx"),
        "Final project submissions are due in week 12.",
    )
    .unwrap();
    fs::write(files_dir.join("calendar.pdf"), "Week 14: project deadline.").unwrap();
    fs::write(files_dir.join("slides.pptx"), "not accepted").unwrap();

    let config_content = format!(
        r#"[analysis]
source = "mock"
mock_findings = 2

[storage]
dir = "{}/data"
"#,
        root.display()
    );

    let config_path = config_dir.join("doc-checker.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = doc_checker_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--progress")
        .arg("off")
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run doc-checker binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn file(config_path: &Path, name: &str) -> String {
    let root = config_path.parent().unwrap().parent().unwrap();
    root.join("files").join(name).display().to_string()
}

fn report_ids(config_path: &Path) -> Vec<String> {
    let (stdout, _, success) = run(config_path, &["reports", "list"]);
    assert!(success);
    stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_analyze_two_documents() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run(
        &config,
        &[
            "analyze",
            &file(&config, "handbook.txt"),
            &file(&config, "rules.txt"),
        ],
    );
    assert!(success, "analyze failed: {}", stderr);
    assert!(stdout.contains("handbook.txt"));
    assert!(stdout.contains("Found 2 contradiction(s)"));
    assert!(stdout.contains("Documents analyzed: 2"));
    assert!(stdout.contains("Credits used: $1.00"));
}

#[test]
fn test_analyze_json_output() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run(
        &config,
        &[
            "analyze",
            "--json",
            "--reports",
            "1",
            &file(&config, "handbook.txt"),
            &file(&config, "rules.txt"),
            &file(&config, "guidelines.docx"),
        ],
    );
    assert!(success, "analyze failed: {}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["source"], "mock");
    assert_eq!(json["result"]["summary"]["total"], 2);
    assert_eq!(json["result"]["filesAnalyzed"].as_array().unwrap().len(), 3);
    assert_eq!(json["usage"]["documentsAnalyzed"], 3);
    assert_eq!(json["usage"]["reportsGenerated"], 1);
    // 3 × $0.50 + $2.00, in cents
    assert_eq!(json["usage"]["creditsUsed"], 350);
    assert_eq!(json["reports"][0]["title"], "Analysis Report #1");
}

#[test]
fn test_single_document_is_refused() {
    let (_tmp, config) = setup_test_env();
    let (_, stderr, success) = run(&config, &["analyze", &file(&config, "handbook.txt")]);
    assert!(!success);
    assert!(stderr.contains("Please upload at least 2 documents"), "{}", stderr);
}

#[test]
fn test_four_documents_exceed_capacity() {
    let (_tmp, config) = setup_test_env();
    let (_, stderr, success) = run(
        &config,
        &[
            "analyze",
            &file(&config, "handbook.txt"),
            &file(&config, "rules.txt"),
            &file(&config, "guidelines.docx"),
            &file(&config, "calendar.pdf"),
        ],
    );
    assert!(!success);
    assert!(stderr.contains("maximum of 3 documents"), "{}", stderr);
}

#[test]
fn test_unsupported_file_is_skipped() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run(
        &config,
        &[
            "analyze",
            &file(&config, "slides.pptx"),
            &file(&config, "handbook.txt"),
            &file(&config, "rules.txt"),
        ],
    );
    assert!(success, "analyze failed: {}", stderr);
    assert!(stderr.contains("skipped: slides.pptx is not a supported file type"));
    assert!(stdout.contains("Documents analyzed: 2"));
}

#[test]
fn test_demo_reports_persist_newest_first() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run(&config, &["demo", "--reports", "2"]);
    assert!(success, "demo failed: {}", stderr);
    assert!(stdout.contains("project_guidelines.pdf (1000 KB)"));
    assert!(stdout.contains("student_handbook.docx (1.95 MB)"));
    assert!(stdout.contains("college_rules.txt (500 KB)"));
    // 3 × $0.50 + 2 × $2.00
    assert!(stdout.contains("Credits used: $5.50"));

    let (list, _, _) = run(&config, &["reports", "list"]);
    let lines: Vec<&str> = list.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Analysis Report #2"));
    assert!(lines[1].contains("Analysis Report #1"));
}

#[test]
fn test_reports_survive_across_runs() {
    let (_tmp, config) = setup_test_env();
    assert!(run(&config, &["demo", "--reports", "1"]).2);
    assert!(run(&config, &["demo", "--reports", "1"]).2);

    let ids = report_ids(&config);
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_report_show_formats() {
    let (_tmp, config) = setup_test_env();
    assert!(run(&config, &["demo", "--reports", "1"]).2);
    let id = report_ids(&config).remove(0);

    let (md, _, success) = run(&config, &["reports", "show", &id, "--format", "markdown"]);
    assert!(success);
    assert!(md.starts_with("# Analysis Report #1"));
    assert!(md.contains("## Contradictions"));

    let (json, _, success) = run(&config, &["reports", "show", &id, "--format", "json"]);
    assert!(success);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["id"].as_u64().unwrap().to_string(), id);
    assert_eq!(value["summary"]["total"], 2);

    let (_, stderr, success) = run(&config, &["reports", "show", "42"]);
    assert!(!success);
    assert!(stderr.contains("No report with id 42"));
}

#[test]
fn test_reports_list_when_empty() {
    let (_tmp, config) = setup_test_env();
    let (stdout, _, success) = run(&config, &["reports", "list"]);
    assert!(success);
    assert_eq!(stdout.trim(), "No reports.");
}

#[test]
fn test_alerts_feed() {
    let (_tmp, config) = setup_test_env();
    let (stdout, _, success) = run(&config, &["alerts"]);
    assert!(success);
    assert!(stdout.contains("[ALERT] College Policy Page"));
    assert!(stdout.contains("[ok] HR Portal"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_tmp, config) = setup_test_env();
    fs::write(&config, "[limits]\nmin_documents = 5\n").unwrap();
    let (_, stderr, success) = run(&config, &["reports", "list"]);
    assert!(!success);
    assert!(stderr.contains("min_documents"), "{}", stderr);
}

#[test]
fn test_json_events_on_stderr() {
    let (_tmp, config) = setup_test_env();
    let output = Command::new(doc_checker_binary())
        .arg("--config")
        .arg(&config)
        .args(["--progress", "json", "demo"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let events: Vec<serde_json::Value> = stderr
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(events.iter().any(|e| e["event"] == "analysis_complete"));
    assert!(events
        .iter()
        .any(|e| e["event"] == "analysis_progress" && e["percent"] == 100));
}
