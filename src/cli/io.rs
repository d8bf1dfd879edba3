//! Output rendering for the CLI
//!
//! Plain mode prints operator text and the `ID | ERROR | Type | Path`
//! table. JSON mode prints a single JSON object per invocation:
//! `{"status": "ok", "data": ...}`.

use std::io::Write;

use serde_json::{json, Value};

use super::errors::CliResult;
use crate::entity::PathResolver;
use crate::record::GuardRecord;

/// Table header, column widths match the rows below it
pub const TABLE_HEADER: &str = "ID       | ERROR    |  Type  | Path ";

/// Printed in place of a path the resolver cannot name
pub const UNKNOWN_PATH: &str = "Unknown";

/// One table row: id and error log in 8-digit hex
pub fn format_row(record: &GuardRecord, resolver: &dyn PathResolver) -> String {
    let path = resolver
        .entity_to_path(&record.target_id)
        .unwrap_or_else(|| UNKNOWN_PATH.to_string());
    format!(
        "{:08x} | {:08x} | {} | {}",
        record.record_id.to_raw(),
        record.elog_id,
        record.err_type,
        path
    )
}

pub fn record_json(record: &GuardRecord, resolver: &dyn PathResolver) -> Value {
    json!({
        "record_id": format!("{:08x}", record.record_id.to_raw()),
        "resolved": record.is_resolved(),
        "elog_id": format!("{:08x}", record.elog_id),
        "err_type": record.err_type.to_string(),
        "ephemeral": record.is_ephemeral(),
        "path": resolver.entity_to_path(&record.target_id),
        "entity_path": record.target_id.to_string(),
    })
}

/// Write a listing as a table or as a JSON array
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[GuardRecord],
    resolver: &dyn PathResolver,
    as_json: bool,
) -> CliResult<()> {
    if as_json {
        let rows: Vec<Value> = records.iter().map(|r| record_json(r, resolver)).collect();
        return write_response(out, Value::Array(rows));
    }

    if records.is_empty() {
        writeln!(out, "No Records to display")?;
        return Ok(());
    }
    writeln!(out, "{}", TABLE_HEADER)?;
    for record in records {
        writeln!(out, "{}", format_row(record, resolver))?;
    }
    out.flush()?;
    Ok(())
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Plain text, or `{"status": "ok", "data": {"message": ...}}` in JSON mode
pub fn write_message<W: Write>(out: &mut W, message: &str, as_json: bool) -> CliResult<()> {
    if as_json {
        return write_response(out, json!({ "message": message }));
    }
    writeln!(out, "{}", message)?;
    out.flush()?;
    Ok(())
}
