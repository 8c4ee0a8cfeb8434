use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

/// Environment variables that would leak the developer's setup into a test
const ISOLATED_VARS: &[&str] = &[
    "TREESUM_API_KEY",
    "OPENROUTER_API_KEY",
    "TREESUM_MODEL",
    "TREESUM_BASE_URL",
    "TREESUM_TIMEOUT",
    "TREESUM_CONFIG",
    "TREESUM_LOG",
    "RUST_LOG",
];

/// Get a Command for treesum, isolated from user config and environment
pub fn treesum(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("treesum");
    for var in ISOLATED_VARS {
        cmd.env_remove(var);
    }
    cmd.env("TREESUM_CONFIG_DIR", cwd.join(".no-user-config"));
    cmd.current_dir(cwd);
    cmd
}

/// Same as [`treesum`], with an oracle configured that must never be reached
#[allow(dead_code)]
pub fn treesum_offline(cwd: &Path) -> Command {
    let mut cmd = treesum(cwd);
    cmd.env("TREESUM_API_KEY", "test-key")
        .env("TREESUM_MODEL", "test/model")
        .env("TREESUM_BASE_URL", "http://127.0.0.1:9/v1")
        .env("TREESUM_TIMEOUT", "5");
    cmd
}

/// Write a file, creating parent directories
pub fn write(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Write a summary record the way the scanner lays them out
#[allow(dead_code)]
pub fn write_record(path: &Path, label: &str, body: &str) {
    write(path, format!("# Summary: {label}\n\n{body}\n"));
}
