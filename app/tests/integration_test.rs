use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

/// The name of the CLI binary
const BINARY: &str = "fortpeg";

fn fortpeg_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("fortpeg");
    cmd.env("FORTPEG_COLORIZE", "never");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().clone();
    String::from_utf8(output.stdout).unwrap()
}

fn stderr_of_failure(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().clone();
    String::from_utf8(output.stderr).unwrap()
}

/// Check that "fortpeg --version" works correctly
#[test]
fn version_command() {
    println!("{BINARY:?}");
    let assert = fortpeg_cmd().arg("--version").assert();
    assert.success().stdout("fortpeg 0.1.0\n");
}

/// Check that "fortpeg check" works correctly
#[test]
fn check_command() {
    let assert = fortpeg_cmd().args(vec!["check", "../test/grammars/arith.json"]).assert();
    assert.success().stdout("../test/grammars/arith.json translated successfully!\n");
}

#[test]
fn compile_to_stdout() {
    let source = stdout_of(fortpeg_cmd().args(vec!["compile", "../test/grammars/arith.json"]));

    let lines: Vec<&str> = source.lines().collect();
    assert_eq!(lines[0], "! Generated from arith.json");
    assert!(source.contains("\nmodule parser\n"));
    assert!(source.contains("recursive function peg_main(res) result(accept)"));
    assert!(source.contains("recursive function peg_expr(res) result(accept)"));
    assert!(source.contains("function action_term_0(n) result(res)"));
    assert_eq!(lines.last(), Some(&"end module parser"));
}

#[test]
fn compile_is_deterministic() {
    let first = stdout_of(fortpeg_cmd().args(vec!["compile", "../test/grammars/identifiers.json"]));
    let second = stdout_of(fortpeg_cmd().args(vec!["compile", "../test/grammars/identifiers.json"]));
    assert_eq!(first, second);
}

#[test]
fn compile_with_config_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("fortpeg.toml");
    let output = dir.path().join("out").join("identifiers.f90");
    fs::write(&config, "module_name = \"from_config\"\nruntime_module = \"rt\"\nindent = 2\n").unwrap();

    fortpeg_cmd()
        .args(vec!["compile", "../test/grammars/identifiers.json", "--module", "ident_parser"])
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    let source = fs::read_to_string(&output).unwrap();
    assert!(source.starts_with("module ident_parser\n  use rt\n  implicit none\n"), "{source}");
    assert!(source.contains("recursive function peg_identifier(res) result(accept)"));
}

#[test]
fn unresolved_references_fail() {
    let stderr = stderr_of_failure(fortpeg_cmd().args(vec!["compile", "../test/grammars/unresolved.json"]));
    assert!(stderr.contains("unresolved rule reference"), "{stderr}");
    assert!(stderr.contains("`item`"), "{stderr}");
    assert!(stderr.contains("`comma`"), "{stderr}");
}

#[test]
fn missing_file_fails() {
    let stderr = stderr_of_failure(fortpeg_cmd().args(vec!["check", "../test/grammars/missing.json"]));
    assert!(stderr.contains("File not found"), "{stderr}");
}

#[test]
fn invalid_module_name_fails() {
    let stderr = stderr_of_failure(
        fortpeg_cmd().args(vec!["compile", "../test/grammars/arith.json", "--module", "2fast"]),
    );
    assert!(stderr.contains("not a valid Fortran module name"), "{stderr}");
}

#[test]
fn ir_command() {
    let ir = stdout_of(fortpeg_cmd().args(vec!["ir", "../test/grammars/arith.json"]));
    assert!(ir.contains("start main (peg_main) : integer"), "{ir}");
    assert!(ir.contains("action action_term_0(n : character(len=:), allocatable) : integer {"), "{ir}");
}
