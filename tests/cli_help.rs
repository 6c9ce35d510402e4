use assert_cmd::Command;

fn normalize_output(output: &[u8]) -> String {
    String::from_utf8_lossy(output).replace("\r\n", "\n")
}

#[test]
fn cli_help_prints_expected_banner() {
    let assert = Command::cargo_bin("local-cli")
        .expect("binary")
        .arg("--help")
        .assert()
        .success();

    let stdout = normalize_output(&assert.get_output().stdout);
    assert!(stdout.contains("A fast CLI interface for Local by Flywheel/WP"));
    assert!(stdout.contains("ACTIONS:"));
}

#[test]
fn help_word_prints_usage_without_touching_local() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let assert = Command::cargo_bin("local-cli")
        .expect("binary")
        .env("LOCAL_CLI_HOME", tmp.path())
        .env("LOCAL_CLI_LOCAL_DIR", tmp.path().join("missing"))
        .arg("help")
        .assert()
        .success();

    let stdout = normalize_output(&assert.get_output().stdout);
    assert!(stdout.contains("local-cli updraftplus db"));
}
