//! Load-time repair of raw session tables.
//!
//! Historical tables come from several generations of the tool and from
//! hand edits, so the policy here is deliberately permissive: every
//! malformed shape is healed to a safe default and nothing is ever
//! rejected. Every branch has a fallback, which is what makes the
//! transform infallible.

use crate::record::{PhotoEditStatus, SessionStatus, NOT_APPLICABLE};
use crate::schema::{self, Column, LEGACY_RENAMES};
use crate::table::{Table, Value};

/// Legacy not-applicable marker rewritten to the canonical token.
const LEGACY_NA: &str = "N/A";

/// Repair a raw table into canonical shape.
///
/// In order: drop duplicate-named columns (first occurrence wins), apply
/// the legacy column renames, fill in missing canonical columns, coerce
/// the boolean columns, rewrite the legacy `N/A` marker, default the two
/// editing-status columns, and project onto the canonical column order
/// (anything non-canonical is dropped). Pure and idempotent.
pub fn normalize(mut table: Table) -> Table {
    table.dedup_columns();

    for (legacy, canonical) in LEGACY_RENAMES {
        if table.column_index(legacy).is_none() {
            continue;
        }
        if table.column_index(canonical.as_str()).is_some() {
            // Canonical wins, no merge.
            table.drop_column(legacy);
        } else {
            table.rename_column(legacy, canonical.as_str());
        }
    }

    for column in Column::ALL {
        table.ensure_column(column.as_str(), Value::empty());
    }

    for column in Column::ALL.iter().filter(|c| c.is_boolean()) {
        table.map_column(column.as_str(), |value| Value::Bool(value.truthy()));
    }

    table.map_cells(|value| {
        if value.eq_text(LEGACY_NA) {
            Value::text(NOT_APPLICABLE)
        } else {
            value
        }
    });

    table.map_column(Column::PhotoEdit.as_str(), |value| {
        if value.is_empty() {
            Value::text(PhotoEditStatus::Pending.as_str())
        } else {
            value
        }
    });
    table.map_column(Column::VideoEdit.as_str(), |value| {
        if value.is_empty() {
            Value::text(NOT_APPLICABLE)
        } else {
            value
        }
    });

    table.select(&schema::canonical_headers())
}

/// Cross-field consistency rules, applied to a table about to be saved:
/// a service that was not shot, or a cancelled session, forces the
/// matching editing status to the not-applicable token. Works on whatever
/// columns are present; absent columns mean nothing to reconcile.
pub fn enforce_consistency(table: &mut Table) {
    let photo = table.column_index(Column::Photo.as_str());
    let video = table.column_index(Column::Video.as_str());
    let status = table.column_index(Column::Status.as_str());
    let photo_edit = table.column_index(Column::PhotoEdit.as_str());
    let video_edit = table.column_index(Column::VideoEdit.as_str());

    for row in table.rows_mut() {
        let cancelled =
            status.is_some_and(|i| row[i].eq_text(SessionStatus::Cancelled.as_str()));

        if let Some(target) = photo_edit {
            let shot = photo.map_or(true, |i| row[i].truthy());
            if cancelled || !shot {
                row[target] = Value::text(NOT_APPLICABLE);
            }
        }
        if let Some(target) = video_edit {
            let shot = video.map_or(true, |i| row[i].truthy());
            if cancelled || !shot {
                row[target] = Value::text(NOT_APPLICABLE);
            }
        }
    }
}
