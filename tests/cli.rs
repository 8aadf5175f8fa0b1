//! End-to-end tests driving the `imgconst` binary against throwaway Flutter
//! projects.
//!
//! Run with: cargo test --test cli

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn imgconst(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgconst"))
        .arg("--project")
        .arg(project)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn pubspec(root: &Path, assets_yaml: &str) {
    fs::write(
        root.join("pubspec.yaml"),
        format!("name: app\nflutter:\n  assets:{assets_yaml}\n"),
    )
    .unwrap();
}

fn without_timestamp(text: &str) -> String {
    text.lines()
        .filter(|l| !l.starts_with("// Generated at: "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn generates_group_and_index_files() {
    let tmp = TempDir::new().unwrap();
    pubspec(tmp.path(), "\n    - assets/icons/\n    - assets/backgrounds/");
    touch(tmp.path(), "assets/icons/home.png");
    touch(tmp.path(), "assets/backgrounds/splash.png");

    let out = imgconst(tmp.path(), &[]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).is_empty());
    assert!(stdout(&out).contains("001 Backgrounds → backgrounds_images.dart (1 image)"));
    assert!(stdout(&out).contains("Generated 3 files for 2 images"));

    let dir = tmp.path().join("lib/generated/images");
    let icons = fs::read_to_string(dir.join("icons_images.dart")).unwrap();
    assert!(icons.contains("static const String home = 'assets/icons/home.png';"));

    let index = fs::read_to_string(dir.join("images.dart")).unwrap();
    assert!(index.contains("export 'backgrounds_images.dart';\nexport 'icons_images.dart';\n"));
    assert!(!index.contains("app_images.dart"));
}

#[test]
fn missing_directory_warns_on_stderr() {
    let tmp = TempDir::new().unwrap();
    pubspec(tmp.path(), "\n    - assets/\n    - assets/missing/");
    touch(tmp.path(), "assets/logo.png");

    let out = imgconst(tmp.path(), &[]);
    assert!(out.status.success());
    assert!(stderr(&out).contains("warning: Asset directory not found: assets/missing"));
    assert!(tmp.path().join("lib/generated/images/app_images.dart").exists());
}

#[test]
fn empty_asset_list_is_a_notice() {
    let tmp = TempDir::new().unwrap();
    pubspec(tmp.path(), " []");

    let out = imgconst(tmp.path(), &[]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("No asset paths found"));
    assert!(!tmp.path().join("lib").exists());
}

#[test]
fn missing_pubspec_fails() {
    let tmp = TempDir::new().unwrap();

    let out = imgconst(tmp.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error: Project manifest not found: "));
    assert!(stdout(&out).is_empty());
}

#[test]
fn output_flag_overrides_default() {
    let tmp = TempDir::new().unwrap();
    pubspec(tmp.path(), "\n    - assets/");
    touch(tmp.path(), "assets/logo.png");

    let out = imgconst(tmp.path(), &["--output", "lib/src/gen"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(tmp.path().join("lib/src/gen/images.dart").exists());
    assert!(!tmp.path().join("lib/generated").exists());
}

#[test]
fn reruns_differ_only_in_timestamp() {
    let tmp = TempDir::new().unwrap();
    pubspec(tmp.path(), "\n    - assets/");
    touch(tmp.path(), "assets/icons/b.png");
    touch(tmp.path(), "assets/icons/a.png");
    touch(tmp.path(), "assets/logo.png");

    let file = tmp.path().join("lib/generated/images/icons_images.dart");
    assert!(imgconst(tmp.path(), &[]).status.success());
    let first = fs::read_to_string(&file).unwrap();
    assert!(imgconst(tmp.path(), &[]).status.success());
    let second = fs::read_to_string(&file).unwrap();

    assert_eq!(without_timestamp(&first), without_timestamp(&second));
}

#[test]
fn json_summary() {
    let tmp = TempDir::new().unwrap();
    pubspec(tmp.path(), "\n    - assets/");
    touch(tmp.path(), "assets/icons/home.png");
    touch(tmp.path(), "assets/logo.png");

    let out = imgconst(tmp.path(), &["--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let summary: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(summary["outcome"], "generated");
    assert_eq!(summary["total_assets"], 2);
    assert_eq!(summary["groups"][0]["key"], "Icons");
    assert_eq!(summary["groups"][1]["file_name"], "app_images.dart");
    assert_eq!(summary["generated_files"].as_array().unwrap().len(), 3);
}

#[test]
fn gen_config_prints_stock_file() {
    let tmp = TempDir::new().unwrap();

    let out = imgconst(tmp.path(), &["--gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[naming]"));
    assert!(text.contains("collisions = \"suffix\""));
    assert!(!tmp.path().join("lib").exists());
}
