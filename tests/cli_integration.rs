// Drives the compiled binary with piped stdin. Stdout is not a TTY here, so
// screen clearing and the progress bar stay out of the captured output.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, rows: &[(&str, &str)]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut body = String::from("dutch,english\n");
    for (a, b) in rows {
        body.push_str(&format!("{a},{b}\n"));
    }
    fs::write(&path, body).unwrap();
    path
}

fn termquiz(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("termquiz").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("TERMQUIZ_LOG");
    cmd
}

#[test]
fn fresh_run_reports_and_persists() {
    let home = TempDir::new().unwrap();
    let data = write_csv(home.path(), "words.csv", &[("hond", "dog"), ("kat", "cat")]);
    let store = home.path().join("session.json");

    let output = termquiz(&home)
        .arg("--data")
        .arg(&data)
        .arg("--store")
        .arg(&store)
        .args(["-n", "2", "--forward", "--fresh", "--seed", "3"])
        .write_stdin("/\n/\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pattern: dutch -> english"));
    assert!(stdout.contains("No previous session found."));
    assert!(stdout.contains("Corrects: 0"));
    assert!(stdout.contains("Incorrects: 2"));
    assert!(stdout.contains("hond  ->  dog"));
    assert!(store.exists());
}

#[test]
fn changed_dataset_is_refused_until_discarded() {
    let home = TempDir::new().unwrap();
    let store = home.path().join("session.json");
    let small = write_csv(home.path(), "small.csv", &[("hond", "dog"), ("kat", "cat")]);
    let large = write_csv(
        home.path(),
        "large.csv",
        &[("hond", "dog"), ("kat", "cat"), ("vis", "fish")],
    );

    termquiz(&home)
        .arg("--data")
        .arg(&small)
        .arg("--store")
        .arg(&store)
        .args(["-n", "1", "--forward", "--fresh"])
        .write_stdin("q\n")
        .assert()
        .success();
    let before = fs::read(&store).unwrap();

    let output = termquiz(&home)
        .arg("--data")
        .arg(&large)
        .arg("--store")
        .arg(&store)
        .args(["-n", "1", "--forward", "--resume"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("stored session has 2 items"));
    assert_eq!(fs::read(&store).unwrap(), before);

    let output = termquiz(&home)
        .arg("--data")
        .arg(&large)
        .arg("--store")
        .arg(&store)
        .args(["-n", "1", "--forward", "--resume", "--discard-stale"])
        .write_stdin("q\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Starting a new session."));
}

#[test]
fn malformed_dataset_aborts_before_quizzing() {
    let home = TempDir::new().unwrap();
    let data = home.path().join("broken.csv");
    fs::write(&data, "a,b\none,two\nlonely\n").unwrap();
    let store = home.path().join("session.json");

    let output = termquiz(&home)
        .arg("--data")
        .arg(&data)
        .arg("--store")
        .arg(&store)
        .args(["-n", "1", "--forward", "--fresh"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("dataset is malformed"));
    assert!(!store.exists());
}
