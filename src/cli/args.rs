//! CLI argument definitions using clap
//!
//! Commands:
//! - guard create <PATH> [--elog N] [--type T] [--no-overwrite]
//! - guard delete <PATH> | delete-id <ID>
//! - guard list | list-resolved | list-unresolved | list-ephemeral
//! - guard clear-all | invalidate-all [--keep-cores]
//! - guard version

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/guard/guard.json";

/// GUARD tool - manage guard records for faulty hardware units
#[derive(Parser, Debug)]
#[command(name = "guard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Guard file to operate on, overriding the configured one
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a guard record, expects a physical path
    Create {
        /// Physical path, e.g. /sys-0/node-0/proc-0
        path: String,

        /// Associated error log id
        #[arg(long, default_value_t = 0, value_parser = parse_elog)]
        elog: u32,

        /// Guard type (manual, fatal, predictive, ... or 0xNN)
        #[arg(long = "type", default_value = "manual")]
        err_type: String,

        /// Refuse to upgrade an existing record for the same unit
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Resolve the guard record of a physical path
    Delete {
        /// Physical path
        path: String,
    },

    /// Resolve a guard record by id, as printed by `list`
    DeleteId {
        /// Record id in hex
        #[arg(value_parser = parse_record_id)]
        id: u32,
    },

    /// List persistent guard records
    List,

    /// List resolved guard records
    ListResolved,

    /// List live guard records
    ListUnresolved,

    /// List firmware-owned ephemeral records
    ListEphemeral,

    /// Erase every guard record
    ClearAll,

    /// Resolve every live guard record
    InvalidateAll {
        /// Leave core and fused-core records in place
        #[arg(long)]
        keep_cores: bool,
    },

    /// Print the tool version
    Version,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Record ids are listed in hex; an optional `0x` prefix is accepted
pub fn parse_record_id(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid record id '{}': {}", s, e))
}

/// Error log ids: decimal, or hex with a `0x` prefix
pub fn parse_elog(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid error log id '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("0000000a"), Ok(10));
        assert_eq!(parse_record_id("0x1f"), Ok(31));
        assert!(parse_record_id("zz").is_err());
    }

    #[test]
    fn test_parse_elog() {
        assert_eq!(parse_elog("42"), Ok(42));
        assert_eq!(parse_elog("0x90000001"), Ok(0x9000_0001));
        assert!(parse_elog("-1").is_err());
    }

    #[test]
    fn test_create_defaults() {
        let cli = Cli::try_parse_from(["guard", "create", "/sys-0/node-0/dimm-0"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!cli.json);
        assert_eq!(
            cli.command,
            Command::Create {
                path: "/sys-0/node-0/dimm-0".to_string(),
                elog: 0,
                err_type: "manual".to_string(),
                no_overwrite: false,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["guard", "list", "--json", "--file", "/tmp/GUARD"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/GUARD")));
        assert_eq!(cli.command, Command::List);
    }

    #[test]
    fn test_invalidate_all_keep_cores() {
        let cli = Cli::try_parse_from(["guard", "invalidate-all", "--keep-cores"]).unwrap();
        assert_eq!(cli.command, Command::InvalidateAll { keep_cores: true });
    }
}
