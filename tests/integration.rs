use std::{
    fs,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

fn run_bin(args: &[&str], stdin: &str) -> Output {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_menagerie"));

    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to execute command");

    child
        .stdin
        .take()
        .expect("failed to open stdin")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait for command")
}

fn to_str(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).expect("failed to convert output to string")
}

#[test]
fn quiet_game_is_won() {
    let output = run_bin(&["--name", "Test", "--seed", "7"], &"5\n".repeat(30));
    let stdout_str = to_str(&output.stdout);
    let stderr_str = to_str(&output.stderr);

    assert!(
        output.status.success(),
        "stdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    assert!(stdout_str.contains("Welcome to Test!"));
    assert!(stdout_str.contains("--- Day 30 ---"));
    assert!(stdout_str.contains("Congratulations!"));
}

#[test]
fn bad_input_is_asked_again() {
    let output = run_bin(&["--seed", "1"], "  Night   Safari \nhello\n6\n");
    let stdout_str = to_str(&output.stdout);

    assert!(output.status.success());
    assert!(stdout_str.contains("=== Night Safari | day 0 ==="));
    assert!(stdout_str.contains("Please enter a number."));
    assert!(stdout_str.contains("Goodbye!"));
}

#[test]
fn config_file_changes_the_rules() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("config_file_changes_the_rules");
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[start]\n"
        + "money = 150\n"
        + "\n"
        + "[rules]\n"
        + "win_day = 3\n";
    fs::write(&config_path, config_contents).expect("failed to write config file");
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let output = run_bin(&["--config", config_str, "--name", "Tiny"], &"5\n".repeat(2));
    let stdout_str = to_str(&output.stdout);
    assert!(output.status.success());
    assert!(stdout_str.contains("Tiny went bankrupt on day 2."), "{stdout_str}");

    fs::write(&config_path, "[rules]\nsickness_prob = 2.0\n").expect("failed to write config file");
    let output = run_bin(&["--config", config_str, "--name", "Tiny"], "");
    assert!(!output.status.success());
    assert!(to_str(&output.stderr).contains("invalid sickness probability"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn closed_input_fails() {
    let output = run_bin(&["--name", "Test", "--seed", "3"], "1\n");
    assert!(!output.status.success());
    assert!(to_str(&output.stderr).contains("input closed"));
}
