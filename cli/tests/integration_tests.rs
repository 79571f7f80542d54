use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn textmeta(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_textmeta"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run textmeta")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Record subcommands
// ---------------------------------------------------------------------------

#[test]
fn artist_all_good_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "maze.yml", "name: Maze\naliases: [foo, bar]\nsocial:\n  twitter: handle\n");
    write(dir.path(), "jazz.yml", "name: Lord Jazz\n");

    let output = textmeta(dir.path(), &["artist", "maze.yml", "jazz.yml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "GOOD 2 files passed");
}

#[test]
fn verbose_prints_each_good_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "maze.yml", "name: Maze\n");

    let output = textmeta(dir.path(), &["-v", "artist", "maze.yml"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("GOOD maze.yml"));
    assert!(out.contains("GOOD 1 files passed"));
}

#[test]
fn failures_set_exit_status_to_count() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.yml", "social:\n  myspace: x\n");
    write(dir.path(), "b.yml", "aliases: [\"two words\"]\n");
    write(dir.path(), "c.yml", "name: fine\n");

    let output = textmeta(dir.path(), &["artist", "."]);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr(&output);
    assert!(err.contains("FAIL ./a.yml: social.myspace: social site \"myspace\" invalid"), "{err}");
    assert!(err.contains("FAIL ./b.yml: aliases[0]: invalid slug \"two words\""), "{err}");
    assert!(!stdout(&output).contains("files passed"));
}

#[test]
fn pack_font_failure() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.yml", "files:\n  a.ans:\n    font: microknight+\n");
    write(dir.path(), "bad.yml", "files:\n  a.ans:\n    font: comic sans\n");

    let output = textmeta(dir.path(), &["pack", "good.yml"]);
    assert!(output.status.success());

    let output = textmeta(dir.path(), &["pack", "bad.yml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("files.a.ans.font: invalid font \"comic sans\""));
}

#[test]
fn unknown_field_is_rejected_for_every_kind() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "extra.yml", "name: x\nfavourite_colour: red\n");

    for kind in ["artist", "group", "pack"] {
        let output = textmeta(dir.path(), &[kind, "extra.yml"]);
        assert_eq!(output.status.code(), Some(1), "{kind}");
        assert!(stderr(&output).contains("favourite_colour"), "{kind}");
    }
}

#[test]
fn group_revision_flag_overrides_default() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "fire.yml", "name: Fire\nsocial:\n  twitter: fire\n");

    assert!(textmeta(dir.path(), &["group", "fire.yml"]).status.success());

    let output = textmeta(dir.path(), &["--group-revision", "legacy", "group", "fire.yml"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn config_file_in_working_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".textmeta.yml", "schema:\n  fonts: legacy\n");
    write(dir.path(), "pack.yml", "files:\n  a.ans:\n    font: IBM VGA 437\n");

    let output = textmeta(dir.path(), &["pack", "pack.yml"]);
    assert_eq!(output.status.code(), Some(1));

    let output = textmeta(dir.path(), &["--fonts", "current", "pack", "pack.yml"]);
    assert!(output.status.success());
}

#[test]
fn json_format_emits_report() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.yml", "social:\n  pouet: abc\n");

    let output = textmeta(dir.path(), &["--format", "json", "artist", "bad.yml"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcome = &report["outcomes"][0];
    assert_eq!(outcome["kind"], "artist");
    assert_eq!(outcome["source"], "bad.yml");
    assert_eq!(outcome["error"]["cause"], "invalid_handle");
    assert_eq!(outcome["error"]["field"], "social.pouet");
}

// ---------------------------------------------------------------------------
// Errors and configuration
// ---------------------------------------------------------------------------

#[test]
fn missing_path_fails_without_stopping_batch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.yml", "name: Maze\n");
    write(dir.path(), "bad.yml", "social:\n  myspace: x\n");

    let output = textmeta(dir.path(), &["-v", "artist", "good.yml", "nope.yml", "bad.yml"]);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr(&output);
    assert!(err.contains("FAIL nope.yml: "), "{err}");
    assert!(err.contains("FAIL bad.yml: social.myspace"), "{err}");
    assert!(!err.contains("error: "), "{err}");
    assert!(stdout(&output).contains("GOOD good.yml"));
}

#[test]
fn no_inputs_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = textmeta(dir.path(), &["artist"]);
    assert!(!output.status.success());
}

#[test]
fn invalid_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad-config.yml", "schema:\n  group: ancient\n");
    write(dir.path(), "a.yml", "name: x\n");

    let output = textmeta(dir.path(), &["--config", "bad-config.yml", "artist", "a.yml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load config 'bad-config.yml'"));
}

#[test]
fn config_subcommand_prints_effective_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = textmeta(dir.path(), &["--pack-revision", "legacy", "config"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("pack: legacy"), "{out}");
    assert!(out.contains("group: current"), "{out}");
}
