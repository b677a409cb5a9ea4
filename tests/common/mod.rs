// Shared setup for the binary tests: every command runs with its own
// config home and without the BF_* overrides of the calling environment.
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    /// A `bf` command that only sees this sandbox's config home.
    pub fn bf(&self) -> Command {
        let mut cmd = Command::cargo_bin("bf").unwrap();
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env_remove("BF_TAPE_SIZE")
            .env_remove("BF_EOF")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write a program source into the sandbox and return its path.
    pub fn program(&self, source: &str) -> PathBuf {
        let path = self.dir.path().join("program.bf");
        fs::write(&path, source).expect("write program");
        path
    }

    /// Write `bf.toml` into the sandbox's config home.
    pub fn config(&self, content: &str) {
        fs::write(self.dir.path().join("bf.toml"), content).expect("write bf.toml");
    }
}
