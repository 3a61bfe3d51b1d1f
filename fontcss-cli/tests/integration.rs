use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn write_fixtures(dir: &Path) {
    fs::write(
        dir.join("subsets.json"),
        r#"{"cyrillic": "U+0400-045F", "latin": "U+0000-00FF"}"#,
    )
    .expect("write subsets");
    fs::write(
        dir.join("fonts.json"),
        r#"[{"id": "jost", "family": "Jost", "subsets": ["cyrillic", "latin"]}]"#,
    )
    .expect("write registry");
}

fn fontcss(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fontcss"));
    cmd.env_remove("FONTCSS_DOMAIN").env("RUST_LOG", "warn");
    cmd.arg("css")
        .arg("--subsets")
        .arg(dir.join("subsets.json"))
        .arg("--registry")
        .arg(dir.join("fonts.json"));
    cmd
}

#[test]
fn css_command_prints_stylesheet() {
    let tmp = tempdir().expect("tempdir");
    write_fixtures(tmp.path());

    let output = fontcss(tmp.path())
        .args(["--domain", "cdn.example.com", "Jost:ital,wght@0,100..900;1,100..900"])
        .output()
        .expect("run fontcss");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("@font-face").count(), 18 * 2);
    assert!(stdout.contains("https://cdn.example.com/jost/italic/900.woff2"));
}

#[test]
fn domain_falls_back_to_environment() {
    let tmp = tempdir().expect("tempdir");
    write_fixtures(tmp.path());

    let output = fontcss(tmp.path())
        .env("FONTCSS_DOMAIN", "env.example.com")
        .arg("Jost")
        .output()
        .expect("run fontcss");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://env.example.com/jost/normal/400.woff2"));
}

#[test]
fn ndjson_emits_one_rule_per_line() {
    let tmp = tempdir().expect("tempdir");
    write_fixtures(tmp.path());

    let output = fontcss(tmp.path())
        .args(["--ndjson", "--url-layout", "per-subset", "Jost:wght@700"])
        .output()
        .expect("run fontcss");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["src_url"], "https://localhost/jost/normal/700-cyrillic.woff2");
}

#[test]
fn unknown_family_exits_non_zero() {
    let tmp = tempdir().expect("tempdir");
    write_fixtures(tmp.path());

    let output = fontcss(tmp.path())
        .arg("NonExistentFont")
        .output()
        .expect("run fontcss");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not available"), "stderr: {stderr}");
}
