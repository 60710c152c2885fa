//! Command execution.
//!
//! Every command reads at most one JSON document, from `--input` or stdin,
//! and writes its result to the given output. Documents are loaded with
//! closed objects unless `--create` is passed, so a mistyped key in `set`
//! fails instead of silently adding a sibling.

use std::fs;
use std::io::{Read, Write};

use structptr_core::{sort_for_removal, sort_pointers, Pointer, Value};
use structptr_serde::{json_to_open_value, json_to_value, value_to_json};

use crate::args::{Cli, Command};
use crate::error::{Error, Result};

/// Run the parsed command line against `stdin`, writing results to `out`.
pub fn run(cli: &Cli, stdin: impl Read, mut out: impl Write) -> Result<()> {
    let mut input = Input { cli, stdin };

    match &cli.command {
        Command::Get { pointer } => {
            let doc = input.document()?;
            let pointer = Pointer::parse(pointer)?;
            let found = pointer.get(&doc)?;
            emit(&mut out, cli, found.clone())
        }
        Command::Set {
            pointer,
            value,
            string,
        } => {
            let pointer = Pointer::parse(pointer)?;
            let value = if *string {
                Value::String(value.clone())
            } else {
                let json = serde_json::from_str(value).map_err(|source| Error::Json {
                    what: "value",
                    source,
                })?;
                load(json, cli.create)
            };
            let mut doc = input.document()?;
            log::debug!("setting {} to {}", pointer, value);
            pointer.set(&mut doc, value)?;
            emit(&mut out, cli, doc)
        }
        Command::Delete { pointers } => {
            let mut pointers = parse_all(pointers)?;
            let mut doc = input.document()?;
            sort_for_removal(&mut pointers);
            for pointer in &pointers {
                let removed = pointer.delete(&mut doc)?;
                log::debug!("deleted {}: {:?}", pointer, removed);
            }
            emit(&mut out, cli, doc)
        }
        Command::Sort { pointers } => {
            let mut pointers = if pointers.is_empty() {
                let text = input.text()?;
                let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
                parse_all(&lines)?
            } else {
                parse_all(pointers)?
            };
            sort_pointers(&mut pointers);
            for pointer in &pointers {
                writeln!(out, "{}", pointer)?;
            }
            Ok(())
        }
        Command::Parse { pointer } => {
            let pointer = Pointer::parse(pointer)?;
            let segments = serde_json::Value::from(pointer.segments().to_vec());
            writeln!(out, "{}", render(&segments, cli.compact)?)?;
            Ok(())
        }
    }
}

struct Input<'a, R> {
    cli: &'a Cli,
    stdin: R,
}

impl<R: Read> Input<'_, R> {
    fn text(&mut self) -> Result<String> {
        match &self.cli.input {
            Some(path) => fs::read_to_string(path).map_err(|source| Error::ReadInput {
                path: path.clone(),
                source,
            }),
            None => {
                let mut text = String::new();
                self.stdin.read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }

    fn document(&mut self) -> Result<Value> {
        let text = self.text()?;
        let json = serde_json::from_str(&text).map_err(|source| Error::Json {
            what: "document",
            source,
        })?;
        Ok(load(json, self.cli.create))
    }
}

fn load(json: serde_json::Value, create: bool) -> Value {
    if create {
        json_to_open_value(json)
    } else {
        json_to_value(json)
    }
}

fn parse_all<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Pointer>> {
    inputs
        .iter()
        .map(|s| Pointer::parse(s.as_ref()).map_err(Error::from))
        .collect()
}

fn emit(out: &mut impl Write, cli: &Cli, value: Value) -> Result<()> {
    let json = value_to_json(value);
    writeln!(out, "{}", render(&json, cli.compact)?)?;
    Ok(())
}

fn render(json: &serde_json::Value, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(json)
    } else {
        serde_json::to_string_pretty(json)
    };
    text.map_err(|source| Error::Json {
        what: "output",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run_with(args: &[&str], stdin: &str) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("structptr").chain(args.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        run(&cli, stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn get_prints_json() {
        let out = run_with(&["--compact", "get", "/a/1"], r#"{"a": [1, {"b": 2}]}"#).unwrap();
        assert_eq!(out, "{\"b\":2}\n");
    }

    #[test]
    fn set_parses_json_values() {
        let out = run_with(&["--compact", "set", "/a/-", "[true]"], r#"{"a": []}"#).unwrap();
        assert_eq!(out, "{\"a\":[[true]]}\n");
    }

    #[test]
    fn set_string_flag_skips_json() {
        let out = run_with(&["--compact", "set", "-s", "/a", "not json"], r#"{"a": 1}"#).unwrap();
        assert_eq!(out, "{\"a\":\"not json\"}\n");
    }

    #[test]
    fn set_new_key_needs_create() {
        let err = run_with(&["set", "/b", "1"], r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Pointer(_)));

        let out = run_with(&["--compact", "--create", "set", "/b", "1"], r#"{"a": 1}"#).unwrap();
        assert_eq!(out, "{\"a\":1,\"b\":1}\n");
    }

    #[test]
    fn delete_handles_sibling_indices() {
        let out = run_with(
            &["--compact", "delete", "/xs/0", "/xs/2", "/xs/0"],
            r#"{"xs": ["a", "b", "c", "d"]}"#,
        )
        .unwrap();
        assert_eq!(out, "{\"xs\":[\"b\",\"d\"]}\n");
    }

    #[test]
    fn delete_orders_multi_digit_indices_by_value() {
        let doc = r#"{"xs": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]}"#;
        let out = run_with(&["--compact", "delete", "/xs/2", "/xs/10"], doc).unwrap();
        assert_eq!(out, "{\"xs\":[0,1,3,4,5,6,7,8,9,11]}\n");

        let out = run_with(&["--compact", "delete", "/xs/11", "/xs/2"], doc).unwrap();
        assert_eq!(out, "{\"xs\":[0,1,3,4,5,6,7,8,9,10]}\n");
    }

    #[test]
    fn delete_removes_children_before_parents() {
        let out = run_with(
            &["--compact", "delete", "/a", "/a/xs/0", "/b/1"],
            r#"{"a": {"xs": [1]}, "b": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(out, "{\"b\":[1]}\n");
    }

    #[test]
    fn sort_reads_lines_without_arguments() {
        let out = run_with(&["sort"], "/b\n/a/1\n\n/a\n").unwrap();
        assert_eq!(out, "/a\n/a/1\n/b\n");
    }

    #[test]
    fn parse_prints_segments() {
        let out = run_with(&["--compact", "parse", "/a~1b/~0/"], "").unwrap();
        assert_eq!(out, "[\"a/b\",\"~\",\"\"]\n");
    }

    #[test]
    fn invalid_document_is_reported() {
        let err = run_with(&["get", ""], "{").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON document"));
    }
}
