//! Shared harness for workspace specs.
//!
//! Starts one daemon per spec against a throwaway state directory and
//! provides a command builder for the CLI pointed at it.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Upper bound for condition polling in specs.
pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

/// Poll `cond` until it holds or the deadline passes.
pub fn wait_for(max_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(max_ms) {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

/// Captured output of one CLI invocation.
pub struct CmdResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdResult {
    pub fn passes(self) -> Self {
        assert_eq!(self.code, 0, "command failed\nstdout: {}\nstderr: {}", self.stdout, self.stderr);
        self
    }

    pub fn fails(self) -> Self {
        assert_ne!(self.code, 0, "command unexpectedly passed\nstdout: {}", self.stdout);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}: {}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}: {}", self.stderr);
        self
    }
}

/// A running daemon bound to a temp state directory.
pub struct Daemon {
    state: tempfile::TempDir,
    child: Child,
}

impl Daemon {
    pub fn start() -> Self {
        Self::start_with_env(&[])
    }

    pub fn start_with_env(env: &[(&str, &str)]) -> Self {
        let state = tempfile::tempdir().expect("create temp state dir");

        let mut cmd = Command::new(bin_path("runboxd"));
        cmd.env("RUNBOX_STATE_DIR", state.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for (key, value) in env {
            cmd.env(key, value);
        }
        let child = cmd.spawn().expect("spawn runboxd");

        let daemon = Self { state, child };

        // The socket is bound as the last startup step.
        let socket = daemon.state_dir().join("daemon.sock");
        assert!(
            wait_for(SPEC_WAIT_MAX_MS, || socket.exists()),
            "daemon did not come up (no socket at {})",
            socket.display()
        );
        daemon
    }

    pub fn state_dir(&self) -> &Path {
        self.state.path()
    }

    pub fn sandbox_dir(&self) -> PathBuf {
        self.state_dir().join("sandbox")
    }

    /// Run the CLI against this daemon and capture the result.
    pub fn runbox(&self, args: &[&str]) -> CmdResult {
        let output = Command::new(bin_path("runbox"))
            .env("RUNBOX_STATE_DIR", self.state_dir())
            .args(args)
            .output()
            .expect("run runbox");
        CmdResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Spawn a CLI invocation without waiting for it.
    pub fn runbox_spawn(&self, args: &[&str]) -> Child {
        Command::new(bin_path("runbox"))
            .env("RUNBOX_STATE_DIR", self.state_dir())
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn runbox")
    }

    /// Parsed execution history straight from the store.
    pub fn history_json(&self) -> serde_json::Value {
        let path = self.state_dir().join("history.json");
        if !path.exists() {
            return serde_json::Value::Array(Vec::new());
        }
        let data = std::fs::read(&path).expect("read history store");
        serde_json::from_slice(&data).expect("parse history store")
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Path to a workspace binary.
///
/// Prefers the `CARGO_BIN_EXE_<name>` variable cargo sets when the binary
/// belongs to the test's own package; these specs live in the workspace
/// root package, so that variable is absent and we fall back to locating
/// the binary next to the test executable in the target directory.
pub fn bin_path(name: &str) -> PathBuf {
    let env_var = format!("CARGO_BIN_EXE_{name}");
    if let Some(path) = std::env::var_os(&env_var) {
        return PathBuf::from(path);
    }

    // The test runner lives at `<target>/<profile>/deps/<exe>`; the
    // workspace binaries sit one directory up at `<target>/<profile>/<name>`.
    let exe = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    let test_exe = std::env::current_exe().expect("locate test executable");
    let profile_dir = test_exe
        .parent()
        .and_then(|deps| deps.parent())
        .expect("locate target profile directory");
    profile_dir.join(exe)
}
