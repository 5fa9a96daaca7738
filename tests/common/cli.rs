//! CLI test runner.
//!
//! Executes the `devkeep` binary against a temporary database file and
//! captures output for assertions.

use std::path::PathBuf;
use std::process::Output;

use tempfile::TempDir;

/// Runs the `devkeep` binary with an isolated temp database.
///
/// # Example
///
/// ```ignore
/// let cli = CliRunner::new();
/// let result = cli.run_robot(&["list"]);
/// result.assert_success();
/// ```
pub struct CliRunner {
    /// Holds the temp dir alive for the lifetime of the runner.
    dir: TempDir,
}

impl CliRunner {
    /// Creates a runner with a fresh temporary database location.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path to the isolated database file for this runner.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("devices.db")
    }

    /// A scratch path inside the runner's temp directory.
    #[must_use]
    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Runs the binary with the given arguments plus `--db <temp>`.
    pub fn run(&self, args: &[&str]) -> RunResult {
        let output = assert_cmd::Command::cargo_bin("devkeep")
            .expect("devkeep binary not built")
            .arg("--db")
            .arg(self.db_path())
            .args(args)
            .env("NO_COLOR", "1")
            .env_remove("DEVKEEP_FORMAT")
            // Keep stderr clean for error-output assertions
            .env("RUST_LOG", "off")
            .output()
            .expect("Failed to execute devkeep");
        RunResult::from_output(&output)
    }

    /// Runs with `--robot` appended.
    pub fn run_robot(&self, args: &[&str]) -> RunResult {
        let mut full: Vec<&str> = args.to_vec();
        full.push("--robot");
        self.run(&full)
    }
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured result of one binary invocation.
pub struct RunResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl RunResult {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        }
    }

    /// True if the process exited 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Panics with full output if the process failed.
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "Command failed (exit {:?})\nstdout:\n{}\nstderr:\n{}",
            self.exit_code,
            self.stdout,
            self.stderr
        );
        self
    }

    /// Panics with full output if the process succeeded.
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success(),
            "Command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            self.stdout,
            self.stderr
        );
        self
    }
}
