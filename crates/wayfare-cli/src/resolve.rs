//! Shared argument resolution helpers for the command handlers.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use wayfare_core::moves::SlotRef;
use wayfare_core::session::EditSession;
use wayfare_store::draft::DraftStore;
use wayfare_store::ids::UuidIds;
use wayfare_store::models::SlotName;

use crate::config::WayfareConfig;

/// Resume the edit session for a draft trip id, or fail with a hint.
pub fn open_session(config: &WayfareConfig, trip_id: &str) -> Result<EditSession> {
    let drafts = DraftStore::new(&config.store);
    match EditSession::resume(trip_id, drafts, Arc::new(UuidIds))? {
        Some(session) => Ok(session),
        None => bail!(
            "no draft found for trip {trip_id}\nUse `wayfare import <file>` to start one."
        ),
    }
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    s.parse::<NaiveDate>()
        .with_context(|| format!("invalid day key {s:?} (expected YYYY-MM-DD)"))
}

/// Parse a slot name (`morning`, `lunch`, `afternoon`, `evening`).
pub fn parse_slot(s: &str) -> Result<SlotName> {
    s.to_ascii_lowercase()
        .parse::<SlotName>()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Build a [`SlotRef`] from day/slot/index command arguments.
pub fn slot_ref(day: &str, slot: &str, index: usize) -> Result<SlotRef> {
    Ok(SlotRef {
        day: parse_day(day)?,
        slot: parse_slot(slot)?,
        index,
    })
}
