//! CLI command implementations
//!
//! Each command loads configuration, opens the guard store, performs one
//! operation and renders the result. Nothing is kept between invocations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::entity::{build_resolver, PathResolver, ResolverKind};
use crate::record::{ErrorType, GuardRecord, RecordLayout};
use crate::store::{DeletionPolicy, GuardStore, RecordFilter, RecordSelector, StoreConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{record_json, write_message, write_records, write_response};

/// Path component that marks fused cores and the cores under them
const CORE_PATH_MARKER: &str = "fc";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Guard file location
    #[serde(default = "default_guard_file")]
    pub guard_file: PathBuf,

    /// On-disk record layout (default "headered")
    #[serde(default)]
    pub layout: RecordLayout,

    /// What resolving a record does (default "tombstone")
    #[serde(default)]
    pub deletion: DeletionPolicy,

    /// Physical path resolver (default "static")
    #[serde(default)]
    pub resolver: ResolverKind,

    /// Hardware description tree, required for the devtree resolver
    #[serde(default)]
    pub devtree_path: Option<PathBuf>,
}

fn default_guard_file() -> PathBuf {
    PathBuf::from("/var/lib/phosphor-software-manager/hostfw/running/GUARD")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guard_file: default_guard_file(),
            layout: RecordLayout::default(),
            deletion: DeletionPolicy::default(),
            resolver: ResolverKind::default(),
            devtree_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file; a missing file yields the defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.guard_file.as_os_str().is_empty() {
            return Err(CliError::config_error("guard_file must not be empty"));
        }

        if self.resolver == ResolverKind::Devtree && self.devtree_path.is_none() {
            return Err(CliError::config_error(
                "devtree_path is required when resolver is 'devtree'",
            ));
        }

        Ok(())
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.guard_file.clone())
            .with_layout(self.layout)
            .with_deletion(self.deletion)
    }
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(cli, &mut out)
}

/// Run a parsed command line, writing results to `out`
pub fn run_command<W: Write>(cli: Cli, out: &mut W) -> CliResult<()> {
    if cli.command == Command::Version {
        return version(out, cli.json);
    }

    let mut config = Config::load(&cli.config)?;
    if let Some(file) = cli.file {
        config.guard_file = file;
    }
    let resolver = build_resolver(config.resolver, config.devtree_path.as_deref())?;
    let mut store = GuardStore::new(config.store_config());
    store.open()?;

    let json = cli.json;
    match cli.command {
        Command::Create {
            path,
            elog,
            err_type,
            no_overwrite,
        } => create(&mut store, resolver.as_ref(), out, json, &path, elog, &err_type, !no_overwrite),
        Command::Delete { path } => {
            let target = resolver
                .path_to_entity(&path)
                .ok_or_else(|| CliError::unsupported_path(&path))?;
            store.resolve(&RecordSelector::ByPath(target))?;
            write_message(out, "Success", json)
        }
        Command::DeleteId { id } => {
            store.resolve(&RecordSelector::ById(id))?;
            write_message(out, "Success", json)
        }
        Command::List => list(&store, resolver.as_ref(), out, json, RecordFilter::Persistent),
        Command::ListResolved => list(&store, resolver.as_ref(), out, json, RecordFilter::Resolved),
        Command::ListUnresolved => {
            list(&store, resolver.as_ref(), out, json, RecordFilter::Unresolved)
        }
        Command::ListEphemeral => list(&store, resolver.as_ref(), out, json, RecordFilter::Ephemeral),
        Command::ClearAll => {
            store.erase_all()?;
            write_message(out, "Success", json)
        }
        Command::InvalidateAll { keep_cores } => {
            let resolved = if keep_cores {
                store.resolve_where(|record| !is_core(resolver.as_ref(), record))?
            } else {
                store.resolve_where(|_| true)?
            };
            write_message(out, &format!("Resolved {} record(s)", resolved), json)
        }
        Command::Version => version(out, json),
    }
}

#[allow(clippy::too_many_arguments)]
fn create<W: Write>(
    store: &mut GuardStore,
    resolver: &dyn PathResolver,
    out: &mut W,
    json: bool,
    path: &str,
    elog: u32,
    err_type: &str,
    overwrite: bool,
) -> CliResult<()> {
    let target = resolver
        .path_to_entity(path)
        .ok_or_else(|| CliError::unsupported_path(path))?;
    let err_type = err_type
        .parse::<ErrorType>()
        .map_err(|e| CliError::invalid_argument(e.message()))?;

    let record = store.create(&target, elog, err_type, overwrite)?;
    if json {
        return write_response(out, record_json(&record, resolver));
    }
    write_message(out, "Success", false)
}

fn list<W: Write>(
    store: &GuardStore,
    resolver: &dyn PathResolver,
    out: &mut W,
    json: bool,
    filter: RecordFilter,
) -> CliResult<()> {
    let records = store.records(filter)?;
    write_records(out, &records, resolver, json)
}

/// Cores and fused cores are named by an `fc-N` path component
fn is_core(resolver: &dyn PathResolver, record: &GuardRecord) -> bool {
    resolver
        .entity_to_path(&record.target_id)
        .map(|path| path.split('/').any(|part| part.starts_with(CORE_PATH_MARKER)))
        .unwrap_or(false)
}

fn version<W: Write>(out: &mut W, json: bool) -> CliResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        return write_response(out, json!({ "version": version }));
    }
    writeln!(out, "GUARD Tool version is {}", version)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::StaticTable;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout, RecordLayout::Headered);
    }

    #[test]
    fn test_config_fields_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guard.json");
        fs::write(
            &path,
            r#"{"guard_file": "/tmp/GUARD", "layout": "headerless", "deletion": "compact"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.guard_file, PathBuf::from("/tmp/GUARD"));
        assert_eq!(config.layout, RecordLayout::Headerless);
        assert_eq!(config.deletion, DeletionPolicy::Compact);
        assert_eq!(config.resolver, ResolverKind::Static);
    }

    #[test]
    fn test_devtree_without_path_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guard.json");
        fs::write(&path, r#"{"resolver": "devtree"}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "GUARD_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_json_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guard.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load(&path).unwrap_err().code_str(), "GUARD_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_is_core() {
        let table = StaticTable::new();
        let core = table
            .path_to_entity("/sys-0/node-0/proc-0/eq-0/fc-1/core-0")
            .unwrap();
        let dimm = table.path_to_entity("/sys-0/node-0/dimm-0").unwrap();
        let layout = RecordLayout::Headered;
        let core = GuardRecord::new(1, core, 0, ErrorType::Fatal, layout);
        let dimm = GuardRecord::new(2, dimm, 0, ErrorType::Fatal, layout);
        assert!(is_core(&table, &core));
        assert!(!is_core(&table, &dimm));
    }
}
