//! Integration tests for the tree-pattern command-line interface

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tree-pattern"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_lists_commands() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["split", "tree", "match", "xpath", "find", "scan"] {
        assert!(text.contains(command), "missing {command} in help");
    }
}

#[test]
fn test_split() {
    let output = run(&["split", "<ID> = <e:expr>;"]);
    assert!(output.status.success());
    let lines: Vec<_> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("ID"));
    assert!(lines[1].ends_with("' = '"));
    assert!(lines[2].ends_with("e:expr"));
}

#[test]
fn test_split_json_and_errors() {
    let output = run(&["split", "--json", "a <b:expr>"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["kind"], "text");
    assert_eq!(value[1]["tag"], "expr");
    assert_eq!(value[1]["label"], "b");

    let output = run(&["split", "<ID = 1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated tag in pattern"));
}

#[test]
fn test_tree() {
    let output = run(&["tree", "--rule", "stat", "-e", "x = 1;"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "(stat x = (expr (primary 1)) ;)");
}

#[test]
fn test_tree_from_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("prog.expr");
    fs::write(&file, "def f(x) { return x; }\n").unwrap();
    let output = run(&["tree", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("(prog (func def f"));
}

#[test]
fn test_match() {
    let output = run(&["match", "-p", "<v:ID> = <expr>;", "-e", "x = 1 + 2;"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Match succeeded; found 3 labels"));
    assert!(text.contains("v = x"));
    assert!(text.contains("expr = 1+2"));

    let output = run(&["match", "-p", "y = <expr>;", "-e", "x = 1;"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("mismatch at 'x'"));
}

#[test]
fn test_xpath_json() {
    let program = "def f(x,y) { x = 3+4; y; ; }";
    let output = run(&["xpath", "--json", "-p", "//arg/ID", "-e", program]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let texts: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["x", "y"]);
}

#[test]
fn test_xpath_invalid_path() {
    let output = run(&["xpath", "-p", "//Ick", "-e", "def f(x) { ; }"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Ick at index 2 isn't a valid token name"));
}

#[test]
fn test_find() {
    let program = "def f(x) { x = 1; y = x * 2; return y; }";
    let output = run(&["find", "-p", "<ID> = <expr>;", "-e", program]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("x=1;"));
    assert!(text.contains("y=x*2;"));
    assert!(text.contains("2 matches"));
}

#[test]
fn test_scan_directory() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        r#"
[[rules]]
id = "assign"
pattern = "<ID> = <expr>;"
rule = "stat"
"#,
    )
    .unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.expr"), "def a(x) { x = 1; }").unwrap();
    fs::write(src.join("b.expr"), "def b(y) { y = 2; y = 3; }").unwrap();
    fs::write(src.join("notes.txt"), "not source").unwrap();

    let output = run(&[
        "scan",
        "--json",
        "--config",
        rules.to_str().unwrap(),
        src.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = value.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0]["file"].as_str().unwrap().ends_with("a.expr"));
    assert_eq!(files[0]["rules"][0]["matches"].as_array().unwrap().len(), 1);
    assert_eq!(files[1]["rules"][0]["matches"].as_array().unwrap().len(), 2);
}

#[test]
fn test_scan_reports_unparsable_files() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        "[[rules]]\nid = \"assign\"\npattern = \"<ID> = <expr>;\"\nrule = \"stat\"\n",
    )
    .unwrap();
    let broken = dir.path().join("broken.expr");
    fs::write(&broken, "def (").unwrap();

    let output = run(&[
        "scan",
        "--config",
        rules.to_str().unwrap(),
        broken.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.expr"));
}

#[test]
fn test_scan_survives_deeply_nested_file() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        "[[rules]]\nid = \"assign\"\npattern = \"<ID> = <expr>;\"\nrule = \"stat\"\n",
    )
    .unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    let nested = format!("{}x{}", "(".repeat(20_000), ")".repeat(20_000));
    fs::write(src.join("a_deep.expr"), format!("def f(x) {{ x = {nested}; }}")).unwrap();
    fs::write(src.join("b_ok.expr"), "def g(y) { y = 2; }").unwrap();

    let output = run(&["scan", "--config", rules.to_str().unwrap(), src.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a_deep.expr"));
    assert!(stderr.contains("nested more than 200 levels"));
    let text = stdout(&output);
    assert!(text.contains("b_ok.expr"));
    assert!(text.contains("1 files"));
}

#[test]
fn test_xpath_and_find_on_snippets() {
    let output = run(&[
        "xpath",
        "--json",
        "--input-rule",
        "stat",
        "-p",
        "//primary/ID",
        "-e",
        "x = y + 1;",
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["text"], "y");

    let output = run(&[
        "find",
        "-p",
        "<expr> * <expr>",
        "-r",
        "expr",
        "--input-rule",
        "expr",
        "-e",
        "1 + 2*x",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2*x"));
    assert!(text.contains("1 matches"));
}

#[test]
fn test_scan_rejects_rules_the_grammar_cannot_resolve() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        "[[rules]]\nid = \"typo\"\npattern = \"<expr>;\"\nrule = \"statement\"\n",
    )
    .unwrap();
    let source = dir.path().join("a.expr");
    fs::write(&source, "def a(x) { x = 1; }").unwrap();

    let output = run(&[
        "scan",
        "--config",
        rules.to_str().unwrap(),
        source.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rules.toml"));
    assert!(stderr.contains("rule 'typo' names unknown start rule 'statement'"));
}
