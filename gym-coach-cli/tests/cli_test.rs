use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn gym_coach(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gym-coach").unwrap();
    cmd.env("GYM_COACH_CONFIG", config_dir.path().join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("gym-coach").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Terminal client for students"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("routines"))
        .stdout(predicate::str::contains("record-injury"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("gym-coach").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("gym-coach").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_gym__coach"))
        .stdout(predicate::str::contains("gym-coach"));
}

#[test]
fn test_config_init_writes_defaults_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    gym_coach(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("usuarios"));
    assert!(contents.contains("firestore.googleapis.com"));

    gym_coach(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    gym_coach(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));
}

#[test]
fn test_config_show_masks_tokens() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        concat!(
            "[auth]\n",
            "id_token = \"abcdefghijklmnop\"\n",
            "refresh_token = \"\"\n",
            "uid = \"u1\"\n",
            "email = \"a@b.com\"\n"
        ),
    )
    .unwrap();

    gym_coach(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcdef..."))
        .stdout(predicate::str::contains("abcdefghijklmnop").not());
}

#[test]
fn test_whoami_without_session() {
    let dir = TempDir::new().unwrap();

    gym_coach(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in."));
}

#[test]
fn test_logout_without_session() {
    let dir = TempDir::new().unwrap();

    gym_coach(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in."));
}

#[test]
fn test_list_screens_require_backend_config() {
    let dir = TempDir::new().unwrap();

    gym_coach(&dir)
        .arg("routines")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backend is not configured"));
}

#[test]
fn test_injury_status_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();

    gym_coach(&dir)
        .args(["injury-status", "s1", "i1", "healed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_progress_rejects_out_of_range_window() {
    let dir = TempDir::new().unwrap();

    for weeks in ["0", "20000000"] {
        gym_coach(&dir)
            .args(["progress", "--weeks", weeks])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid value"));
    }
}
