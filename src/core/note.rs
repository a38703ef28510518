//! Shift notes - free-text annotations on an open drawer.

use crate::{
    core::{drawer, employee},
    entities::{ShiftNote, shift_note},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::debug;

/// Attaches a note to an open drawer. The text is stored trimmed.
pub async fn add_shift_note(
    db: &DatabaseConnection,
    drawer_id: i64,
    text: &str,
    created_by: i64,
) -> Result<shift_note::Model> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("Note cannot be empty"));
    }

    let txn = db.begin().await?;
    drawer::require_open_drawer(&txn, drawer_id).await?;
    employee::require_active_employee(&txn, created_by).await?;

    let note = shift_note::ActiveModel {
        drawer_id: Set(drawer_id),
        note: Set(text.to_string()),
        created_by: Set(created_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    debug!(drawer_id, note_id = note.id, "Shift note added");
    Ok(note)
}

/// Notes for a drawer, oldest first.
pub async fn notes_for_drawer<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<Vec<shift_note::Model>> {
    ShiftNote::find()
        .filter(shift_note::Column::DrawerId.eq(drawer_id))
        .order_by_asc(shift_note::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
