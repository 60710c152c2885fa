use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use structptr_cli::{run, Cli, Error};

fn document_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run_args(args: &[&str]) -> Result<String, Error> {
    let argv = std::iter::once("structptr").chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    // stdin must be ignored when --input is given
    run(&cli, "not json".as_bytes(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn reads_document_from_file() {
    let file = document_file(r#"{"users": [{"name": "Alice", "tags": ["a", "b"]}]}"#);
    let path = file.path().to_str().unwrap();

    let out = run_args(&["-i", path, "get", "/users/0/tags/1"]).unwrap();
    assert_eq!(out, "\"b\"\n");
}

#[test]
fn edits_do_not_touch_the_file() {
    let original = r#"{"n": 1}"#;
    let file = document_file(original);
    let path = file.path().to_str().unwrap();

    let out = run_args(&["--compact", "-i", path, "set", "/n", "2"]).unwrap();
    assert_eq!(out, "{\"n\":2}\n");
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), original);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let path = missing.to_str().unwrap();

    let err = run_args(&["-i", path, "get", ""]).unwrap_err();
    assert!(matches!(err, Error::ReadInput { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn sort_reads_pointer_file() {
    let file = document_file("/z\n/a/b\n/a\n");
    let path = file.path().to_str().unwrap();

    let out = run_args(&["-i", path, "sort"]).unwrap();
    assert_eq!(out, "/a\n/a/b\n/z\n");
}

#[test]
fn pointer_errors_surface_unchanged() {
    let file = document_file(r#"{"xs": [1]}"#);
    let path = file.path().to_str().unwrap();

    let err = run_args(&["-i", path, "get", "/xs/4"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "/xs/4 at part 1: index 4 is out of range (length = 1)"
    );
}
