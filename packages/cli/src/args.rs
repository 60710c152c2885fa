use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// structptr - read and edit JSON documents with RFC 6901 pointers
#[derive(Parser, Debug)]
#[command(name = "structptr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read the document from a file instead of stdin
    #[arg(short, long, global = true, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Let `set` add keys that don't exist yet
    #[arg(long, global = true)]
    pub create: bool,

    /// Log more (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the value a pointer refers to
    Get { pointer: String },

    /// Replace or append the value at a pointer and print the document
    Set {
        pointer: String,
        /// JSON value to store
        value: String,
        /// Store VALUE as a string instead of parsing it as JSON
        #[arg(short, long)]
        string: bool,
    },

    /// Remove the values at one or more pointers and print the document
    Delete {
        #[arg(required = true)]
        pointers: Vec<String>,
    },

    /// Print pointers in traversal order, one per line
    ///
    /// Pointers are taken from the arguments, or from the input one per line
    /// when none are given.
    Sort { pointers: Vec<String> },

    /// Print the decoded segments of a pointer as a JSON array
    Parse { pointer: String },
}

impl Cli {
    /// Log filter implied by `-v` flags; `RUST_LOG` still wins.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
