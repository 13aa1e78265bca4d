use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn langdoc_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("langdoc"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    langdoc_cmd(dir).args(args).output().unwrap()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

const NESTED_JSON: &str = r#"{
  "menu": {
    "open": "Open",
    "close": "Close"
  },
  "items": ["zero", "one"],
  "flat.key": "Flat"
}
"#;

fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("en.json"), NESTED_JSON).unwrap();
    temp_dir
}

#[test]
fn test_view_lists_leaves() {
    let temp_dir = setup();
    let output = run(temp_dir.path(), &["view", "-i", "en.json"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("menu.open = Open"));
    assert!(stdout.contains("items.1 = one"));
    assert!(stdout.contains("flat.key = Flat"));

    let output = run(temp_dir.path(), &["view", "-i", "en.json", "--key-style", "flat"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#"menu = {"open":"Open","close":"Close"}"#));
}

#[test]
fn test_get_prints_value_or_fails() {
    let temp_dir = setup();
    let output = run(temp_dir.path(), &["get", "-i", "en.json", "-k", "menu.close"]);
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Close\n");

    let output = run(temp_dir.path(), &["get", "-i", "en.json", "-k", "items[0]"]);
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "zero\n");

    let output = run(
        temp_dir.path(),
        &["get", "-i", "en.json", "-k", "flat.key", "--key-style", "flat"],
    );
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Flat\n");

    let output = run(temp_dir.path(), &["get", "-i", "en.json", "-k", "menu.missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Key `menu.missing` not found"));
}

#[test]
fn test_locate_text_and_json() {
    let temp_dir = setup();
    let output = run(temp_dir.path(), &["locate", "-i", "en.json", "-k", "menu.open"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(line 3, column 13)"), "{}", stdout);
    assert!(stdout.ends_with("\"Open\"\n"));

    let output = run(
        temp_dir.path(),
        &["locate", "-i", "en.json", "-k", "menu.open", "--json"],
    );
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["key"], "menu.open");
    assert_eq!(report["line"], 3);
    assert_eq!(report["text"], "\"Open\"");
    let start = report["start"].as_u64().unwrap() as usize;
    let end = report["end"].as_u64().unwrap() as usize;
    let slice: String = NESTED_JSON.chars().skip(start).take(end - start).collect();
    assert_eq!(slice, "\"Open\"");

    let output = run(temp_dir.path(), &["locate", "-i", "en.json", "-k", "nope"]);
    assert!(!output.status.success());
}

#[test]
fn test_get_and_locate_agree_on_properties() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("en.properties"), "menu.open=Open\n").unwrap();

    let output = run(temp_dir.path(), &["get", "-i", "en.properties", "-k", "menu.open"]);
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Open\n");

    let output = run(temp_dir.path(), &["locate", "-i", "en.properties", "-k", "menu.open"]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).ends_with("Open\n"));
}

#[test]
fn test_locate_in_file_with_bom() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("en.json"), "\u{feff}{\"a\": \"x\"}\n").unwrap();

    let output = run(temp_dir.path(), &["get", "-i", "en.json", "-k", "a"]);
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "x\n");

    let output = run(temp_dir.path(), &["locate", "-i", "en.json", "-k", "a", "--json"]);
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["start"], 7);
    assert_eq!(report["text"], "\"x\"");
}

#[test]
fn test_format_with_flags_and_config() {
    let temp_dir = setup();
    let output = run(
        temp_dir.path(),
        &["format", "-i", "en.json", "-o", "sorted.json", "--sort", "--indent", "0"],
    );
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("sorted.json")).unwrap(),
        "{\"flat.key\":\"Flat\",\"items\":[\"zero\",\"one\"],\"menu\":{\"close\":\"Close\",\"open\":\"Open\"}}\n"
    );
    // The input is left alone when an output is given.
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("en.json")).unwrap(),
        NESTED_JSON
    );

    fs::write(
        temp_dir.path().join("langdoc.toml"),
        "[format]\nindent = 1\ntab = \"\\t\"\nsort_keys = true\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("small.json"), "{\"b\": 1, \"a\": 2}").unwrap();
    let output = run(temp_dir.path(), &["format", "-i", "small.json"]);
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("small.json")).unwrap(),
        "{\n\t\"a\": 2,\n\t\"b\": 1\n}\n"
    );
}

#[test]
fn test_convert_between_formats() {
    let temp_dir = setup();
    let output = run(
        temp_dir.path(),
        &["convert", "-i", "en.json", "-o", "en.properties"],
    );
    assert_success(&output);
    let properties = fs::read_to_string(temp_dir.path().join("en.properties")).unwrap();
    assert!(properties.contains("menu.open=Open\n"));
    assert!(properties.contains("items.0=zero\n"));

    fs::write(temp_dir.path().join("flat.properties"), "app.title=Hello\napp.menu=Menu\n").unwrap();
    let output = run(
        temp_dir.path(),
        &["convert", "-i", "flat.properties", "-o", "nested.yaml", "--key-style", "nested"],
    );
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("nested.yaml")).unwrap(),
        "app:\n  title: Hello\n  menu: Menu\n"
    );
}

#[test]
fn test_errors_are_reported() {
    let temp_dir = setup();
    let output = run(temp_dir.path(), &["view", "-i", "en.xliff"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: unsupported format"));

    fs::write(temp_dir.path().join("broken.yaml"), "a: [1, 2\n").unwrap();
    let output = run(temp_dir.path(), &["view", "-i", "broken.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("yaml parse error"));

    let output = run(
        temp_dir.path(),
        &["view", "-i", "en.json", "--config", "missing.toml"],
    );
    assert!(!output.status.success());

    let output = run(temp_dir.path(), &["get", "-i", "en.json", "-k", "a..b"]);
    assert!(!output.status.success());
}

#[test]
fn test_completions() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["completions", "bash"]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("langdoc"));
}
