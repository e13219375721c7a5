use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CONFIG_VARS: [&str; 7] = [
    "WORKLOG_ENDPOINT",
    "WORKLOG_MODEL",
    "WORKLOG_API_KEY",
    "WORKLOG_MAX_TOKENS",
    "WORKLOG_TEMPERATURE",
    "WORKLOG_TIMEOUT_SECS",
    "WORKLOG_LANGUAGE",
];

/// A work log home in a temp dir, driven through the real binary
pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn store_file(&self) -> PathBuf {
        self.home().join("entries.json")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.home().join("reports")
    }

    pub fn write_config(&self, json: &str) {
        std::fs::write(self.home().join("config.json"), json).unwrap();
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_worklog"));
        cmd.args(args)
            .env("WORKLOG_HOME", self.home())
            .env("WORKLOG_REPORT_DIR", self.report_dir())
            .env_remove("RUST_LOG");
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.output().unwrap()
    }

    /// Run and assert success, returning stdout
    pub fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "worklog {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    pub fn stored(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(self.store_file()).unwrap()).unwrap()
    }
}

/// Id of the entry at `index` in the stored file
pub fn id_at(store: &serde_json::Value, index: usize) -> String {
    store[index]["id"].as_str().unwrap().to_string()
}
