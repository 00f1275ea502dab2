//! Case management commands.

use crate::state::AppState;
use anyhow::Context;
use lookout_case::{CaseMetadata, CaseScope, CaseStatus};
use lookout_core::CaseId;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

/// Status answer for one case.
#[derive(Debug, Serialize)]
pub struct CaseStatusResponse {
    pub case_id: String,
    pub case_name: String,
    pub status: CaseStatus,
}

fn parse_case_id(case_id: &str) -> anyhow::Result<CaseId> {
    CaseId::new(case_id).with_context(|| format!("invalid case id: {case_id}"))
}

/// Create an empty case covering both identifier kinds.
pub fn create(state: &AppState, name: &str, analyst: &str) -> anyhow::Result<CaseMetadata> {
    let metadata = state
        .store
        .create_case(name, analyst, CaseScope::default())
        .context("failed to create case")?;
    info!("Created case {}", metadata.case_id);
    Ok(metadata)
}

pub fn status(state: &AppState, case_id: &str) -> anyhow::Result<CaseStatusResponse> {
    let id = parse_case_id(case_id)?;
    let metadata = state.store.load_metadata(&id)?;
    let status = state.store.case_status(&id)?;

    Ok(CaseStatusResponse {
        case_id: id.to_string(),
        case_name: metadata.case_name,
        status,
    })
}

/// Replace the analyst notes with a single `summary` field.
pub fn note(state: &AppState, case_id: &str, text: &str) -> anyhow::Result<Map<String, Value>> {
    let id = parse_case_id(case_id)?;
    let mut notes = Map::new();
    notes.insert("summary".to_string(), Value::String(text.to_string()));
    Ok(state.store.save_analyst_notes(&id, notes)?)
}
