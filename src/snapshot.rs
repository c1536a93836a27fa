//! Snapshot codec for persisted "analysis" records.
//!
//! The overview is stored as an opaque JSON string next to a report-kind
//! discriminator column. Decoding verifies the payload against the declared
//! kind: a mismatched or malformed snapshot is a `Decode` error, never a
//! silently empty overview.

use crate::error::{Error, Result};
use crate::overview::Overview;
use crate::report::ReportKind;

pub fn encode_snapshot(overview: &Overview) -> Result<String> {
    serde_json::to_string(overview).map_err(|e| Error::Other(e.to_string()))
}

pub fn decode_snapshot(kind: ReportKind, raw: &str) -> Result<Overview> {
    let overview: Overview =
        serde_json::from_str(raw).map_err(|e| Error::Decode(e.to_string()))?;
    if overview.kind != kind {
        return Err(Error::Decode(format!(
            "snapshot kind mismatch: expected {kind}, found {}",
            overview.kind
        )));
    }
    if overview.total.kind() != kind {
        return Err(Error::Decode(format!(
            "snapshot total count does not match {kind}"
        )));
    }
    if let Some((uid, count)) = overview
        .users
        .iter()
        .find(|(_, count)| count.kind() != kind)
    {
        return Err(Error::Decode(format!(
            "snapshot breakdown for {uid} does not match {kind} ({})",
            count.kind()
        )));
    }
    Ok(overview)
}
