use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn get_cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mrad-cli"))
}

fn profile_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("profiles");
    path.push(name);
    path
}

#[test]
fn test_cli_calculate_basic() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "--distance", "500"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vertical Adjustment: 3.7 MRADs"), "{stdout}");
    assert!(stdout.contains("Horizontal Adjustment: 0.3 MRADs"), "{stdout}");
    assert!(stdout.contains("Horizontal Adjustment (Wind): 0.0 MRADs"), "{stdout}");
}

#[test]
fn test_cli_calculate_with_wind() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "-d", "1000", "-w", "10", "-a", "90"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vertical Adjustment: 14.0 MRADs"), "{stdout}");
    assert!(stdout.contains("Horizontal Adjustment: 0.8 MRADs"), "{stdout}");
}

#[test]
fn test_cli_calculate_between_keys() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "--distance", "295"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vertical Adjustment: 1.4 MRADs"), "{stdout}");
    assert!(stdout.contains("Horizontal Adjustment: 0.2 MRADs"), "{stdout}");
}

#[test]
fn test_cli_invalid_angle() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "--distance", "500", "--angle", "30"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid angle should fail");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Please enter valid numeric values.");
}

#[test]
fn test_cli_out_of_range() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "--distance", "1200"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Out of range distance should fail");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("between 100 and 1000 meters"), "{stdout}");
}

#[test]
fn test_cli_output_format_json() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "--distance", "525", "--output", "json"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["distance"], 525.0);
    assert_eq!(json["vertical_mrad"], 4.1);
    assert_eq!(json["horizontal_mrad"], 0.4);
    assert_eq!(json["wind_mrad"], 0.0);
}

#[test]
fn test_cli_profile_file() {
    let output = Command::new(get_cli_binary())
        .args(["calculate", "--distance", "1500", "--wind-speed", "8", "--angle", "20"])
        .arg("--profile")
        .arg(profile_path("l129a1_wind.toml"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Clamped profile should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vertical Adjustment: 14.0 MRADs"), "{stdout}");
    // 0.5 / 10 * 8 * 0.5 = 0.2
    assert!(stdout.contains("Horizontal Adjustment (Wind): 0.2 MRADs"), "{stdout}");
}

#[test]
fn test_cli_missing_profile() {
    let output = Command::new(get_cli_binary())
        .args(["info", "--profile", "/nonexistent/profile.toml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing profile should fail");
}

#[test]
fn test_cli_table_csv() {
    let output = Command::new(get_cli_binary())
        .args(["table", "--output", "csv"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "distance,vertical_mrad,horizontal_mrad");
    assert_eq!(lines.len(), 20);
    assert!(lines.contains(&"500,3.7,0.3"));
    assert!(lines.contains(&"1000,14.0,0.8"));
}

#[test]
fn test_cli_form_session() {
    let mut child = Command::new(get_cli_binary())
        .arg("form")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"abc\n0\n0\n500\n0\n0\nq\n")
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success(), "Form session should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please enter valid numeric values."), "{stdout}");
    assert!(stdout.contains("Vertical Adjustment: 3.7 MRADs"), "{stdout}");
}

#[test]
fn test_cli_info_panel_is_framed() {
    let output = Command::new(get_cli_binary())
        .args(["info"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("L129A1"), "{stdout}");
    for line in stdout.lines() {
        assert_eq!(line.chars().count(), 42, "ragged line: {line:?}");
        let first = line.chars().next().unwrap_or(' ');
        assert!(matches!(first, '║' | '╔' | '╠' | '╚'), "unframed line: {line:?}");
    }
}

#[test]
fn test_cli_help() {
    let output = Command::new(get_cli_binary())
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("calculate"), "Should list calculate command");
    assert!(stdout.contains("form"), "Should list form command");
    assert!(stdout.contains("table"), "Should list table command");
    assert!(stdout.contains("info"), "Should list info command");
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(get_cli_binary())
        .args(["invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_cli_missing_required_args() {
    let output = Command::new(get_cli_binary())
        .args(["calculate"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Should fail with missing distance");
}
