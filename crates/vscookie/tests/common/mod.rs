#![allow(dead_code)]

use std::process::{Command, Output};

pub const SECRET: &str = "This is test cookie signing secret";

/// Create a new vscookie CLI command with a clean environment
pub fn vscookie() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vscookie"));
    cmd.env_remove("VSCOOKIE_SECRET").env_remove("RUST_LOG");
    cmd
}

/// Run the command and return trimmed stdout, asserting success
pub fn stdout_of(cmd: &mut Command) -> String {
    let output = run(cmd);
    assert!(
        output.status.success(),
        "Command should exit successfully: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim_end().to_owned()
}

pub fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("Failed to execute vscookie command")
}
