//! CLI module for the guard tool
//!
//! Provides the `guard` command line:
//! - create / delete / delete-id: single-record operations
//! - list*: filtered listings as a table or JSON
//! - clear-all / invalidate-all: bulk operations

mod args;
mod commands;
mod errors;
mod io;

pub use args::{parse_elog, parse_record_id, Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{run, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{format_row, record_json, write_records, TABLE_HEADER, UNKNOWN_PATH};
