use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const SPIRAL: &str = r#"
name: spiral_gen
type: render
parameters:
  - { name: turns, kind: integer, default: 5, min: 1, max: 50, label: Turns }
metadata:
  author: Jane Doe
  version: 1.0.0
  description: Draws a spiral
"#;

fn inx(cwd: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("inx").expect("inx binary");
    cmd.current_dir(cwd.path())
        .env_remove("INX_OUTPUT_DIR")
        .env_remove("INX_TEMPLATE_DIR")
        .env_remove("INX_EXTENSIONS_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn build_writes_three_files_into_default_output() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["build", "spiral.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'spiral_gen' built in output (3 written, 0 unchanged)"));

    tmp.child("output/spiral_gen.py").assert(predicate::path::is_file());
    tmp.child("output/README.md").assert(predicate::path::is_file());
    tmp.child("output/spiral_gen.inx")
        .assert(predicate::str::contains("<submenu name=\"Render\"/>"));
}

#[test]
fn rebuild_reports_unchanged_files() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp).args(["build", "spiral.yaml"]).assert().success();
    inx(&tmp)
        .args(["build", "spiral.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 written, 3 unchanged)"));
}

#[test]
fn unknown_category_exits_one_and_writes_nothing() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("bogus.yaml")
        .write_str("name: x\ntype: bogus\n")
        .unwrap();

    inx(&tmp)
        .args(["build", "bogus.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown template category 'bogus'"));
    tmp.child("output").assert(predicate::path::missing());
}

#[test]
fn template_flag_is_validated() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["build", "spiral.yaml", "--template", "nope"])
        .assert()
        .code(1);
    tmp.child("output").assert(predicate::path::missing());
}

#[test]
fn template_flag_overrides_type() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["build", "spiral.yaml", "-t", "basic_effect", "-o", "fx"])
        .assert()
        .success();
    tmp.child("fx/spiral_gen.py")
        .assert(predicate::str::contains("inkex.EffectExtension"));
    tmp.child("fx/spiral_gen.inx")
        .assert(predicate::str::contains("<id>org.inkscape.effect.spiral_gen</id>"))
        .assert(predicate::str::contains("<submenu").not());
}

#[test]
fn custom_template_dir_is_relative_to_config_file() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("sub/ext.yaml")
        .write_str("name: fancy\ntype: custom\ntemplate_dir: templates\n")
        .unwrap();
    tmp.child("sub/templates/{{ ext_name }}.txt.tera")
        .write_str("hello {{ ext_name }}\n")
        .unwrap();

    inx(&tmp)
        .args(["build", "sub/ext.yaml"])
        .assert()
        .success();
    tmp.child("output/fancy.txt").assert("hello fancy\n");
}

#[test]
fn missing_config_exits_one() {
    let tmp = assert_fs::TempDir::new().unwrap();
    inx(&tmp)
        .args(["build", "absent.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn dry_run_touches_nothing() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["build", "spiral.yaml", "--dry-run", "--archive"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[dry-run]"))
        .stdout(predicate::str::contains("spiral_gen-1.0.0.zip"));
    tmp.child("output").assert(predicate::path::missing());
}

#[test]
fn archive_only_leaves_no_loose_files() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["build", "spiral.yaml", "--archive-only"])
        .assert()
        .success();
    tmp.child("output/spiral_gen-1.0.0.zip")
        .assert(predicate::path::is_file());
    tmp.child("output/spiral_gen.py").assert(predicate::path::missing());
}

#[test]
fn saved_snapshot_rebuilds_the_same_files() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["build", "spiral.yaml", "--save-config"])
        .assert()
        .success();
    tmp.child("output/extension.json").assert(predicate::path::is_file());

    inx(&tmp)
        .args(["build", "output", "-o", "again"])
        .assert()
        .success();
    let first = std::fs::read(tmp.path().join("output/spiral_gen.inx")).unwrap();
    let second = std::fs::read(tmp.path().join("again/spiral_gen.inx")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn list_templates_table_and_json() {
    let tmp = assert_fs::TempDir::new().unwrap();

    inx(&tmp)
        .arg("list-templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("basic_effect"))
        .stdout(predicate::str::contains("input_output"))
        .stdout(predicate::str::contains("custom"));

    let out = inx(&tmp)
        .args(["list-templates", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["basic_effect", "input_output", "render", "custom"]);
}

#[test]
fn install_copies_into_install_dir() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();

    inx(&tmp)
        .args(["install", "spiral.yaml", "--install-dir", "ext"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed into"));
    tmp.child("ext/spiral_gen/spiral_gen.inx")
        .assert(predicate::path::is_file());
}

#[test]
fn failed_install_exits_two_after_build() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("spiral.yaml").write_str(SPIRAL).unwrap();
    tmp.child("blocker").write_str("not a directory").unwrap();

    inx(&tmp)
        .args(["install", "spiral.yaml", "--install-dir", "blocker"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("'spiral_gen' built in output"))
        .stderr(predicate::str::contains("install failed"));
    tmp.child("output/spiral_gen.py").assert(predicate::path::is_file());
}

#[test]
fn new_without_terminal_fails_cleanly() {
    let tmp = assert_fs::TempDir::new().unwrap();
    inx(&tmp)
        .arg("new")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("interactive prompt failed"));
    tmp.child("output").assert(predicate::path::missing());
}

#[test]
fn usage_errors_exit_one() {
    let tmp = assert_fs::TempDir::new().unwrap();
    inx(&tmp).args(["build", "--frobnicate"]).assert().code(1);
    inx(&tmp)
        .args(["build", "x.yaml", "--archive", "--archive-only"])
        .assert()
        .code(1);
}
