//! Integration tests for forgepy

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// forgepy with an isolated config file and cache home
    fn forgepy(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("forgepy");
        cmd.arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--cache-home")
            .arg(temp.path().join("cache"))
            .env_remove("PY")
            .env_remove("FORGEPY_CACHE_HOME");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Python environments for CI builds"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("forgepy"));
    }

    #[test]
    fn resolve_exact_version() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["resolve", "--python", "3.9"])
            .assert()
            .success()
            .stdout("3.9\n");
    }

    #[test]
    fn resolve_reads_py_env() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .arg("resolve")
            .env("PY", "3.12")
            .assert()
            .success()
            .stdout("3.12\n");
    }

    #[test]
    fn resolve_flag_beats_env() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["resolve", "--python", "3.8"])
            .env("PY", "3.12")
            .assert()
            .success()
            .stdout("3.8\n");
    }

    #[test]
    fn resolve_rejects_python2() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["resolve", "--python", "2.7"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported Python version: 2.7"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn resolve_rejects_empty_py_env() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .arg("resolve")
            .env("PY", "")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported Python version"));
    }

    #[test]
    fn resolve_uses_configured_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[python]\nversion = \"3.11\"\n",
        )
        .unwrap();

        forgepy(&temp)
            .arg("resolve")
            .assert()
            .success()
            .stdout("3.11\n");
    }

    #[test]
    fn setup_rejects_bad_version_before_installing() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["setup", "--python", "3.x1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported Python version"));

        assert!(!temp.path().join("cache").join("miniforge").exists());
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[miniforge]"));
    }

    #[test]
    fn config_set_then_resolve() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["config", "set", "python.version", "3.10"])
            .assert()
            .success();

        forgepy(&temp)
            .arg("resolve")
            .assert()
            .success()
            .stdout("3.10\n");
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn clean_empty_cache() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["clean", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing to clean"));
    }

    #[test]
    fn clean_removes_miniforge() {
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("cache").join("miniforge");
        std::fs::create_dir_all(prefix.join("bin")).unwrap();

        forgepy(&temp).args(["clean", "--yes"]).assert().success();
        assert!(!prefix.exists());
    }

    #[test]
    fn setup_help() {
        let temp = TempDir::new().unwrap();
        forgepy(&temp)
            .args(["setup", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--github-env"));
    }
}
