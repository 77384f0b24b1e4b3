// Integration tests for the `imatch` binary.
// Run with: cargo test -p internmatch-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use httpmock::prelude::*;
use tempfile::TempDir;

const LISTINGS: &str = "\
Menternship Name,Company,Domain,Job Role,Level,Industry,One-line Summary,Skills - Apply,Website
Data Analyst Intern,Acme,Data Analytics,Analyst,Beginner,Finance,Crunch numbers,SQL Excel visualization,https://acme.example
Marketing Intern,Globex,Marketing,Associate,Beginner,Media,Tell stories,SEO content,https://globex.example
Backend Intern,Initech,Software,Engineer,Intermediate,Finance,Build APIs,Rust Postgres,
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("listings.csv"), LISTINGS).expect("write listings");
        Self { dir }
    }

    fn with_settings(json: &str) -> Self {
        let fixture = Self::new();
        fs::write(fixture.settings_path(), json).expect("write settings");
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn settings_path(&self) -> PathBuf {
        self.path("settings.json")
    }

    fn responses_path(&self) -> PathBuf {
        self.path("responses.csv")
    }

    /// `imatch` isolated from the user's settings and environment.
    fn imatch(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_imatch"));
        cmd.current_dir(self.dir.path())
            .env("INTERNMATCH_CONFIG", self.settings_path())
            .env("INTERNMATCH_DATA", self.path("listings.csv"))
            .env("INTERNMATCH_RESPONSES", self.responses_path())
            .env_remove("INTERNMATCH_OPENAI_KEY")
            .env_remove("OPENAI_API_KEY")
            .env_remove("OPENAI_API_BASE")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.imatch().args(args).output().expect("run imatch")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn full_match_args<'a>(domain: &'a str) -> Vec<&'a str> {
    vec![
        "match", "--name", "Ada Lovelace", "--contact", "ada@example.com",
        "--domain", domain, "--role", "Analyst", "--level", "Beginner", "--industry", "Finance",
    ]
}

// ---------------------------------------------------------------------------
// options
// ---------------------------------------------------------------------------

#[test]
fn options_json_lists_sorted_distinct_values() {
    let fx = Fixture::new();
    let output = fx.run(&["options", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = json(&output);
    assert_eq!(v["domain"], serde_json::json!(["Data Analytics", "Marketing", "Software"]));
    assert_eq!(v["job_role"], serde_json::json!(["Analyst", "Associate", "Engineer"]));
    assert_eq!(v["level"], serde_json::json!(["Beginner", "Intermediate"]));
    assert_eq!(v["industry"], serde_json::json!(["Finance", "Media"]));
}

#[test]
fn options_human_names_flags() {
    let fx = Fixture::new();
    let output = fx.run(&["options"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("job role (--role)"));
    assert!(out.contains("  Intermediate"));
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

#[test]
fn match_records_submission_and_lists_matches() {
    let fx = Fixture::new();
    let mut args = full_match_args("Data Analytics");
    args.push("--json");
    let output = fx.run(&args);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = json(&output);
    assert_eq!(v["recorded"], true);
    assert_eq!(v["count"], 1);
    assert_eq!(v["listings"][0]["name"], "Data Analyst Intern");
    assert_eq!(v["listings"][0]["company"], "Acme");

    let log = fs::read_to_string(fx.responses_path()).expect("log created");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Timestamp,Name,Contact,Domain,Job Role,Level,Industry");
    assert!(lines[1].ends_with(",Ada Lovelace,ada@example.com,Data Analytics,Analyst,Beginner,Finance"));
}

#[test]
fn match_without_results_prints_info_and_succeeds() {
    let fx = Fixture::new();
    let output = fx.run(&full_match_args("Marketing"));

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No exact matches found. Try broader criteria."));
    assert!(fx.responses_path().exists(), "submission is recorded even without matches");
}

#[test]
fn match_human_output_shows_details() {
    let fx = Fixture::new();
    let output = fx.run(&full_match_args("Data Analytics"));

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Found 1 matching internships."));
    assert!(out.contains("Data Analyst Intern at Acme"));
    assert!(out.contains("  Website:  https://acme.example"));
}

#[test]
fn match_blank_name_is_rejected_and_not_recorded() {
    let fx = Fixture::new();
    let output = fx.run(&["match", "--name", "   ", "--contact", "ada@example.com", "--domain", "Marketing"]);

    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("Please fill in your name and contact info."));
    assert!(!fx.responses_path().exists());
}

#[test]
fn match_warns_about_empty_categories() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "match", "--name", "Ada", "--contact", "555-0100", "--domain", "Data Analytics",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        stderr(&output).contains("warning: no job role, level, industry selected"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("No exact matches found."));
}

#[test]
fn match_no_log_leaves_log_untouched() {
    let fx = Fixture::new();
    let mut args = full_match_args("Data Analytics");
    args.extend(["--no-log", "--json"]);
    let output = fx.run(&args);

    assert!(output.status.success());
    assert_eq!(json(&output)["recorded"], false);
    assert!(!fx.responses_path().exists());
}

// ---------------------------------------------------------------------------
// dataset errors
// ---------------------------------------------------------------------------

#[test]
fn missing_dataset_exits_with_io_code() {
    let fx = Fixture::new();
    let output = fx
        .imatch()
        .args(["options", "--data", "does-not-exist.csv"])
        .output()
        .expect("run imatch");

    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("error: cannot read"));
    assert!(err.contains("hint:"));
}

#[test]
fn missing_column_exits_with_format_code() {
    let fx = Fixture::new();
    let bad = fx.path("bad.csv");
    fs::write(&bad, "Company,Domain\nAcme,Data\n").expect("write");
    let output = fx.run(&["options", "--data", bad.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("missing column 'Menternship Name'"));
}

// ---------------------------------------------------------------------------
// responses
// ---------------------------------------------------------------------------

#[test]
fn responses_lists_submissions_in_order() {
    let fx = Fixture::new();
    assert!(fx.run(&full_match_args("Data Analytics")).status.success());
    assert!(fx
        .run(&[
            "match", "--name", "Grace", "--contact", "grace@example.com",
            "--domain", "Data Analytics", "--domain", "Marketing",
        ])
        .status
        .success());

    let output = fx.run(&["responses", "--json"]);
    assert!(output.status.success());
    let v = json(&output);
    let rows = v.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Name"], "Ada Lovelace");
    assert_eq!(rows[1]["Name"], "Grace");
    assert_eq!(rows[1]["Domain"], "Data Analytics, Marketing");
    assert_eq!(rows[1]["Job Role"], "");

    let human = stdout(&fx.run(&["responses"]));
    assert!(human.contains("2 response(s)"));
}

#[test]
fn responses_empty_log() {
    let fx = Fixture::new();
    let output = fx.run(&["responses"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No responses recorded"));
}

// ---------------------------------------------------------------------------
// ask / ai doctor
// ---------------------------------------------------------------------------

#[test]
fn ask_with_ai_disabled_exits_10() {
    let fx = Fixture::with_settings(r#"{ "ai": { "provider": "none" } }"#);
    let output = fx.run(&["ask", "data visualization"]);

    assert_eq!(output.status.code(), Some(10));
    assert!(stderr(&output).contains("error: Error using AI:"));
}

#[test]
fn ask_blank_query_is_rejected() {
    let fx = Fixture::new();
    let output = fx.run(&["ask", "  "]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn ask_reconciles_agent_answer() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [ { "message": { "content": "Try the Data Analyst Intern role at Acme." } } ]
        }));
    });

    let settings = format!(
        r#"{{ "ai": {{ "provider": "local", "endpoint": "{}" }} }}"#,
        server.url("/v1")
    );
    let fx = Fixture::with_settings(&settings);
    let output = fx.run(&["ask", "data", "--json"]);

    mock.assert();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = json(&output);
    assert_eq!(v["outcome"], "referenced");
    assert_eq!(v["listings"][0]["name"], "Data Analyst Intern");
    assert_eq!(v["context"]["truncated"], false);
}

#[test]
fn ask_reports_truncated_context() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_includes("DATASET (1 of 3 rows)");
        then.status(200).json_body(serde_json::json!({
            "choices": [ { "message": { "content": "Try the Data Analyst Intern role at Acme." } } ]
        }));
    });

    let settings = format!(
        r#"{{ "ai": {{ "provider": "local", "endpoint": "{}", "max_context_rows": 1 }} }}"#,
        server.url("/v1")
    );
    let fx = Fixture::with_settings(&settings);

    let output = fx.run(&["ask", "data", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = json(&output);
    assert_eq!(v["context"]["truncated"], true);
    assert_eq!(v["context"]["sent_rows"], 1);
    assert_eq!(v["context"]["total_rows"], 3);

    let output = fx.run(&["ask", "data"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("note: the AI saw only the first 1 of 3 listings"));
    mock.assert_hits(2);
}

#[test]
fn ask_falls_back_to_keyword_search() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [ { "message": { "content": "Look at analytics roles." } } ]
        }));
    });

    let settings = format!(
        r#"{{ "ai": {{ "provider": "local", "endpoint": "{}" }} }}"#,
        server.url("/v1")
    );
    let fx = Fixture::with_settings(&settings);
    let output = fx.run(&["ask", "rust"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("We couldn’t find an exact match, but here are some related internships:"));
    assert!(out.contains("Related: Backend Intern at Initech"));
    assert!(out.contains("We’ll work on your feedback"));
}

#[test]
fn ask_agent_failure_exits_13() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).json_body(serde_json::json!({ "error": { "message": "model overloaded" } }));
    });

    let settings = format!(
        r#"{{ "ai": {{ "provider": "local", "endpoint": "{}" }} }}"#,
        server.url("/v1")
    );
    let fx = Fixture::with_settings(&settings);
    let output = fx.run(&["ask", "data"]);

    assert_eq!(output.status.code(), Some(13));
    assert!(stderr(&output).contains("error: Error using AI: API error (500): model overloaded"));
}

#[test]
fn ai_doctor_reports_disabled() {
    let fx = Fixture::with_settings(r#"{ "ai": { "provider": "none" } }"#);
    let output = fx.run(&["ai", "doctor", "--json"]);

    assert_eq!(output.status.code(), Some(10));
    let v = json(&output);
    assert_eq!(v["status"], "disabled");
    assert_eq!(v["provider"], "none");
}

#[test]
fn ai_doctor_local_is_ready() {
    let fx = Fixture::with_settings(r#"{ "ai": { "provider": "local" } }"#);
    let output = fx.run(&["ai", "doctor", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = json(&output);
    assert_eq!(v["status"], "ready");
    assert_eq!(v["endpoint"], "http://localhost:11434/v1");
    assert_eq!(v["model"], "llama3:8b");
}
