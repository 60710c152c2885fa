//! # structptr-cli
//!
//! Command-line access to JSON documents through RFC 6901 pointers.
//!
//! ```bash
//! echo '{"users": [{"name": "Alice"}]}' | structptr get /users/0/name
//! structptr -i data.json set /users/0/name '"Bob"'
//! structptr -i data.json --create set /users/0/email '"bob@example.com"'
//! structptr -i data.json delete /users/0/email /users/3
//! structptr sort /b /a/1 /a
//! ```

mod args;
mod commands;
mod error;

pub use args::{Cli, Command};
pub use commands::run;
pub use error::{Error, Result};
