//! Integration tests for Taskdeck

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Isolated config + state directory
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new(base_url: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let state = dir.path().join("state");
            let config = format!(
                "[api]\nbase_url = \"{}\"\ntimeout_secs = 2\n\n[storage]\ndir = \"{}\"\n",
                base_url,
                state.display()
            );
            std::fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn state_dir(&self) -> PathBuf {
            self.dir.path().join("state")
        }

        fn record(&self) -> PathBuf {
            self.state_dir().join("root.json")
        }

        fn seed(&self, json: &str) {
            std::fs::create_dir_all(self.state_dir()).unwrap();
            std::fs::write(self.record(), json).unwrap();
        }

        fn cmd(&self) -> Command {
            let mut cmd = taskdeck();
            cmd.arg("--config").arg(self.config_path());
            cmd
        }
    }

    fn taskdeck() -> Command {
        let mut cmd = cargo_bin_cmd!("taskdeck");
        cmd.env_remove("TASKDECK_CONFIG")
            .env_remove("TASKDECK_BASE_URL")
            .env("CI", "1");
        cmd
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn help_displays() {
        taskdeck()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("task manager for the command line"));
    }

    #[test]
    fn version_displays() {
        taskdeck()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("taskdeck"));
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[api]"))
            .stdout(predicate::str::contains("http://127.0.0.1:9"));
    }

    #[test]
    fn config_show_applies_base_url_flag() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["--base-url", "http://localhost:4000", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("http://localhost:4000"));
    }

    #[test]
    fn config_set_then_show() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["config", "set", "api.base_url", "http://localhost:3000"])
            .assert()
            .success();

        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("http://localhost:3000"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["config", "set", "api.token", "abc"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn config_set_rejects_root_key_outside_store() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["config", "set", "storage.root_key", "../../x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("storage.root_key"));
    }

    #[test]
    fn config_file_with_escaping_root_key_fails() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        let mut config = read(&sandbox.config_path());
        config.push_str("root_key = \"../../x\"\n");
        std::fs::write(sandbox.config_path(), config).unwrap();

        sandbox
            .cmd()
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
        assert!(!sandbox.dir.path().join("x.json").exists());
    }

    #[test]
    fn status_signed_out() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("logged out"))
            .stdout(predicate::str::contains("http://127.0.0.1:9"));
    }

    #[test]
    fn status_restores_session() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox.seed(r#"{"session":{"token":"abc"}}"#);

        sandbox
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("logged in"));
    }

    #[test]
    fn corrupt_record_starts_signed_out() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox.seed("{not json");

        sandbox
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("logged out"));
    }

    #[test]
    fn logout_when_signed_out() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["logout", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Not logged in"));
    }

    #[test]
    fn logout_clears_persisted_token() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox.seed(r#"{"session":{"token":"abc"}}"#);

        sandbox
            .cmd()
            .args(["logout", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Logged out"));

        let record = read(&sandbox.record());
        assert!(!record.contains("abc"));
    }

    #[test]
    fn logout_without_yes_keeps_session() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox.seed(r#"{"session":{"token":"abc"}}"#);

        sandbox
            .cmd()
            .arg("logout")
            .assert()
            .success()
            .stdout(predicate::str::contains("Logout cancelled"));

        assert!(read(&sandbox.record()).contains("abc"));
    }

    #[test]
    fn network_failure_is_reported() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["tasks", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn refresh_failure_is_reported() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["tasks", "list", "--refresh"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn missing_base_url_is_reported() {
        let sandbox = Sandbox::new("");
        sandbox
            .cmd()
            .args(["tasks", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("API base URL is not configured"));
    }

    #[test]
    fn invalid_login_never_reaches_network() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["login", "--email", "not-an-email", "--password", "12345678"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid email"));
    }

    #[test]
    fn short_password_rejected() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["signup", "-n", "Ada", "-e", "ada@example.com", "-p", "short"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Password must be at least 8 characters"));
    }

    #[test]
    fn cache_list_empty() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox
            .cmd()
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached queries."));
    }

    #[test]
    fn cache_clear_drops_persisted_entries() {
        let sandbox = Sandbox::new("http://127.0.0.1:9");
        sandbox.seed(
            r#"{"session":{"token":"abc"},"cache":{"entries":[{"query":{"request":{"method":"GET","path":"/tasks"},"provides":["Task"]},"data":[]}]}}"#,
        );

        sandbox
            .cmd()
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("GET /tasks"));

        sandbox
            .cmd()
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 cached queries"));

        let record = read(&sandbox.record());
        assert!(!record.contains("/tasks"));
        assert!(record.contains("abc"));
    }

    #[test]
    fn completions_bash() {
        taskdeck()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("taskdeck"));
    }
}
