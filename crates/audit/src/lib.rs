//! `storesync-audit` — append-only trail of processing outcomes.
//!
//! One comma-delimited line per outcome: timestamp (RFC 3339), source
//! order id, outcome tag, message. Records are never rewritten; the file
//! is opened in append mode on every write so concurrent processes
//! interleave whole lines rather than clobbering each other.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storesync_core::{SyncError, SyncResult};

/// Outcome tag of one processed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Error,
    Ignored,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Error => "error",
            AuditOutcome::Ignored => "ignored",
        }
    }
}

impl core::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub order_id: String,
    pub outcome: AuditOutcome,
    pub message: String,
}

/// Append-only audit trail backed by a delimited file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record with a generated timestamp.
    ///
    /// A failed append surfaces as `SyncError::Audit`; it must never be
    /// allowed to mask the sync outcome it was meant to record.
    pub fn append(
        &self,
        order_id: &str,
        outcome: AuditOutcome,
        message: &str,
    ) -> SyncResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                SyncError::audit(format!("opening audit trail {:?}: {e}", self.path))
            })?;

        let line = format!(
            "{},{},{},{}\n",
            Utc::now().to_rfc3339(),
            quote_field(order_id),
            outcome,
            quote_field(message),
        );
        file.write_all(line.as_bytes())
            .map_err(|e| SyncError::audit(format!("appending audit record: {e}")))?;
        Ok(())
    }

    /// Read the full trail back, oldest first. Operator/tooling path,
    /// not used by the sync loop.
    pub fn read_all(&self) -> SyncResult<Vec<AuditRecord>> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            SyncError::audit(format!("reading audit trail {:?}: {e}", self.path))
        })?;

        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line =
                line.map_err(|e| SyncError::audit(format!("reading audit record: {e}")))?;
            if line.is_empty() {
                continue;
            }
            records.push(parse_line(&line)?);
        }
        Ok(records)
    }
}

/// Quote a field if it contains the delimiter, a quote or a newline.
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_line(line: &str) -> SyncResult<AuditRecord> {
    let mut fields = split_delimited(line);
    if fields.len() != 4 {
        return Err(SyncError::audit(format!("malformed audit record: {line:?}")));
    }
    let message = fields.pop().unwrap_or_default();
    let outcome = match fields[2].as_str() {
        "success" => AuditOutcome::Success,
        "error" => AuditOutcome::Error,
        "ignored" => AuditOutcome::Ignored,
        other => {
            return Err(SyncError::audit(format!("unknown outcome tag: {other:?}")));
        }
    };
    let timestamp = DateTime::parse_from_rfc3339(&fields[0])
        .map_err(|e| SyncError::audit(format!("bad audit timestamp {:?}: {e}", fields[0])))?
        .with_timezone(&Utc);

    Ok(AuditRecord {
        timestamp,
        order_id: fields[1].clone(),
        outcome,
        message,
    })
}

/// Split one line on commas, honoring double-quoted fields.
fn split_delimited(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
