//! Sign-here anchors built from host notes

use truesign_domain::{Anchor, Result};
use uuid::Uuid;

use super::ports::HostNote;
use super::session::{keys, SessionStore, SessionValue};

/// Convert host notes into required sign-here anchors on `doc_id`
///
/// The note text becomes the anchor comment and the note id its client
/// data.
pub fn anchors_from_notes(doc_id: Uuid, notes: &[HostNote]) -> Vec<Anchor> {
    notes
        .iter()
        .map(|note| Anchor {
            comment: Some(note.text.clone()),
            client_data: Some(note.id.clone()),
            ..Anchor::sign_here_from_pixels(
                doc_id,
                note.page,
                (note.x, note.y),
                (note.width, note.height),
            )
        })
        .collect()
}

/// Anchors accumulated so far in this batch
///
/// # Errors
/// Returns a serialization error when the stored value is not an anchor list
pub fn stored_anchors(session: &dyn SessionStore) -> Result<Vec<Anchor>> {
    match session.text(keys::ANCHORS) {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

/// Append `anchors` to the batch's stored anchors
///
/// # Errors
/// Returns a serialization error when the stored value cannot be read back
pub fn append_anchors(session: &dyn SessionStore, anchors: Vec<Anchor>) -> Result<usize> {
    let mut all = stored_anchors(session)?;
    all.extend(anchors);
    session.set(keys::ANCHORS, SessionValue::Text(serde_json::to_string(&all)?));
    Ok(all.len())
}
