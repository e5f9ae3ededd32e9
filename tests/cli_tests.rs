use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn journey_map(dir: &TempDir) -> Command {
  let mut cmd = Command::cargo_bin("journey-map").unwrap();
  cmd.env_clear().current_dir(dir.path());
  cmd
}

#[test]
fn test_stages_lists_builtin_table() {
  let dir = TempDir::new().unwrap();

  journey_map(&dir)
    .arg("stages")
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Discovery: #CDF4D3 (3 action(s), 0 touchpoint(s))",
    ))
    .stdout(predicate::str::contains("Scale & Grow: #FFE0C2"));
}

#[test]
fn test_stages_uses_metadata_file_from_settings() {
  let dir = TempDir::new().unwrap();
  fs::write(
    dir.path().join("stages.yaml"),
    "Onboarding:\n  color: \"#123456\"\n  actions: [Sign up]\n  touchpoints: [Docs]\n",
  )
  .unwrap();
  fs::write(
    dir.path().join("journey-map.yaml"),
    "metadata_file: stages.yaml\n",
  )
  .unwrap();

  journey_map(&dir)
    .arg("stages")
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Onboarding: #123456 (1 action(s), 1 touchpoint(s))",
    ))
    .stdout(predicate::str::contains("Discovery").not());
}

#[test]
fn test_metadata_file_resolves_next_to_settings_file() {
  let dir = TempDir::new().unwrap();
  let conf = dir.path().join("conf");
  fs::create_dir(&conf).unwrap();
  fs::write(
    conf.join("stages.yaml"),
    "Launch:\n  color: \"#ABCDEF\"\n",
  )
  .unwrap();
  fs::write(conf.join("map.yaml"), "metadata_file: stages.yaml\n").unwrap();

  journey_map(&dir)
    .args(["--config", "conf/map.yaml", "stages"])
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Launch: #ABCDEF (0 action(s), 0 touchpoint(s))",
    ));
}

#[test]
fn test_missing_settings_file_fails() {
  let dir = TempDir::new().unwrap();

  journey_map(&dir)
    .args(["--config", "missing.yaml", "stages"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_show_requires_github_env() {
  let dir = TempDir::new().unwrap();

  journey_map(&dir)
    .arg("show")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains(
      "missing required environment variable: GITHUB_TOKEN",
    ));
}

#[test]
fn test_serve_rejects_bad_project_number() {
  let dir = TempDir::new().unwrap();

  journey_map(&dir)
    .arg("serve")
    .env("GITHUB_TOKEN", "t")
    .env("GITHUB_OWNER", "acme")
    .env("GITHUB_REPO", "experience-map")
    .env("GITHUB_PROJECT_NUMBER", "first")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains(
      "GITHUB_PROJECT_NUMBER must be a positive integer",
    ));
}
