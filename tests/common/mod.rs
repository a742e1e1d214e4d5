#![allow(dead_code, deprecated)]

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

pub fn lifeos_cmd() -> Command {
    let mut cmd = Command::cargo_bin("lifeos").unwrap();
    cmd.env_remove("LIFEOS_ROOT");
    cmd.env_remove("LIFEOS_LOG");
    cmd
}

/// Fresh workspace without sample data
pub fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    lifeos_cmd()
        .arg("init")
        .arg(temp.path())
        .args(["--owner", "tester"])
        .assert()
        .success();
    temp
}

/// Add a record and return its full id
pub fn add_record(root: &Path, kind: &str, json: &str) -> String {
    let output = lifeos_cmd()
        .current_dir(root)
        .args(["add", kind, json])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .find_map(|line| line.strip_prefix("id: "))
        .map(str::to_string)
        .expect("add prints the new id")
}
