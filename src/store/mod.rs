//! Persistence of the session table.
//!
//! `Logbook` is the repository the rest of the tool talks to. It owns one
//! of two interchangeable backends (CSV file in production, in-memory in
//! tests) and wraps their raw read/write with the normalization and
//! consistency passes, so callers only ever see canonical tables.
//!
//! There is no locking: the contract assumes a single active writer, and
//! concurrent writers race with last-writer-wins.

pub mod file;
pub mod memory;

use anyhow::Result;
use std::path::Path;

use crate::normalize::{enforce_consistency, normalize};
use crate::record::SessionRecord;
use crate::table::Table;

use file::FileStore;
use memory::MemoryStore;

/// Dispatch a method call to the active backend variant.
macro_rules! dispatch {
    ($self:expr, $method:ident($($arg:expr),* $(,)?)) => {
        match &mut $self.inner {
            StoreInner::File(store) => store.$method($($arg),*),
            StoreInner::Memory(store) => store.$method($($arg),*),
        }
    };
}

enum StoreInner {
    File(FileStore),
    Memory(MemoryStore),
}

pub struct Logbook {
    inner: StoreInner,
}

impl Logbook {
    /// Repository backed by a CSV file. The file is not touched until the
    /// first operation.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            inner: StoreInner::File(FileStore::open(path.as_ref())),
        }
    }

    /// Repository backed by process memory.
    pub fn in_memory() -> Self {
        Self {
            inner: StoreInner::Memory(MemoryStore::new()),
        }
    }

    /// Load the session table, creating empty storage if it does not exist
    /// yet, and repair it to canonical shape.
    pub fn load(&mut self) -> Result<Table> {
        let raw = dispatch!(self, load_raw())?;
        Ok(normalize(raw))
    }

    /// Append one session as the last row and rewrite storage in full.
    pub fn append(&mut self, record: &SessionRecord) -> Result<()> {
        let mut table = self.load()?;
        table.push_row(record.to_row());
        tracing::info!(id = %record.id, property = %record.property, "appending session");
        dispatch!(self, store(&table))
    }

    /// Replace the stored table with an externally edited one.
    ///
    /// The cross-field consistency rules are applied to the incoming table
    /// here, independent of whatever the load-time repair already did,
    /// because edits can reintroduce inconsistent states. Rows absent from
    /// `edited` are gone after this call; rows it added are kept. Anything
    /// else left malformed is healed by the next `load`.
    pub fn replace_all(&mut self, mut edited: Table) -> Result<()> {
        enforce_consistency(&mut edited);
        edited.dedup_columns();
        tracing::info!(rows = edited.len(), "rewriting session table");
        dispatch!(self, store(&edited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        Condition, NewSession, PhotoEditStatus, PropertyKind, SessionStatus, VideoEditStatus,
        NOT_APPLICABLE,
    };
    use crate::schema::canonical_headers;
    use crate::table::Value;
    use chrono::{Local, NaiveDate, TimeZone};

    fn capture(property: &str, advisor: &str) -> NewSession {
        NewSession {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            property: property.to_string(),
            kind: PropertyKind::House,
            zone: "Centro".to_string(),
            maps_link: String::new(),
            advisor: advisor.to_string(),
            status: SessionStatus::Done,
            cancel_reason: String::new(),
            photo: true,
            video: false,
            drone: false,
            photo_edit: PhotoEditStatus::Pending,
            video_edit: VideoEditStatus::Pending,
            condition: Condition::Good,
            comments: String::new(),
        }
    }

    fn record(property: &str, advisor: &str) -> SessionRecord {
        let now = Local.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap();
        capture(property, advisor).build(now).unwrap()
    }

    #[test]
    fn test_load_creates_missing_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitacora.csv");
        let mut logbook = Logbook::open(&path);

        let table = logbook.load().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), canonical_headers());

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.starts_with("ID,Fecha,Mes,"));
        assert_eq!(on_disk.lines().count(), 1);
    }

    #[test]
    fn test_append_preserves_prior_rows() {
        let mut logbook = Logbook::in_memory();
        logbook.append(&record("Casa A", "Maria")).unwrap();
        logbook.append(&record("Casa B", "Ana")).unwrap();
        let before = logbook.load().unwrap();
        assert_eq!(before.len(), 2);

        logbook.append(&record("Casa C", "Lucia")).unwrap();
        let after = logbook.load().unwrap();
        assert_eq!(after.len(), 3);
        for row in 0..2 {
            assert_eq!(after.rows()[row], before.rows()[row]);
        }
        assert_eq!(after.get(2, "Propiedad"), Some(&Value::text("Casa C")));
        assert_eq!(after.get(2, "ID"), Some(&Value::text("2506021030")));
        assert_eq!(after.get(2, "Mes"), Some(&Value::text("Junio")));
        assert_eq!(after.get(2, "Año"), Some(&Value::text("2025")));
    }

    #[test]
    fn test_capture_defaults_survive_round_trip() {
        // Photo shot, video not: the saved row must come back with the
        // photo edit pending and the video edit marked not applicable.
        let mut logbook = Logbook::in_memory();
        logbook.append(&record("Casa A", "Maria")).unwrap();

        let table = logbook.load().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "Foto"), Some(&Value::Bool(true)));
        assert_eq!(table.get(0, "Video"), Some(&Value::Bool(false)));
        assert_eq!(table.get(0, "Edicion_Foto"), Some(&Value::text("Pendiente")));
        assert_eq!(
            table.get(0, "Edicion_Video"),
            Some(&Value::text(NOT_APPLICABLE))
        );
    }

    #[test]
    fn test_replace_all_applies_cancellation_rule() {
        let mut logbook = Logbook::in_memory();
        let mut session = capture("Casa A", "Maria");
        session.photo_edit = PhotoEditStatus::Editing;
        let now = Local.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap();
        logbook.append(&session.build(now).unwrap()).unwrap();

        let mut edited = logbook.load().unwrap();
        edited.set(0, "Estatus", Value::text("Cancelada"));
        logbook.replace_all(edited).unwrap();

        let table = logbook.load().unwrap();
        assert_eq!(
            table.get(0, "Edicion_Foto"),
            Some(&Value::text(NOT_APPLICABLE))
        );
        assert_eq!(
            table.get(0, "Edicion_Video"),
            Some(&Value::text(NOT_APPLICABLE))
        );
    }

    #[test]
    fn test_replace_all_gates_edit_status_on_service() {
        let mut logbook = Logbook::in_memory();
        logbook.append(&record("Casa A", "Maria")).unwrap();

        let mut edited = logbook.load().unwrap();
        edited.set(0, "Foto", Value::Bool(false));
        edited.set(0, "Edicion_Foto", Value::text("Editando"));
        logbook.replace_all(edited).unwrap();

        let table = logbook.load().unwrap();
        assert_eq!(
            table.get(0, "Edicion_Foto"),
            Some(&Value::text(NOT_APPLICABLE))
        );
    }

    #[test]
    fn test_replace_all_drops_omitted_rows() {
        let mut logbook = Logbook::in_memory();
        logbook.append(&record("Casa A", "Maria")).unwrap();
        logbook.append(&record("Casa B", "Ana")).unwrap();

        let loaded = logbook.load().unwrap();
        let mut edited = Table::new(loaded.columns().to_vec());
        edited.push_row(loaded.rows()[1].clone());
        logbook.replace_all(edited).unwrap();

        let table = logbook.load().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "Propiedad"), Some(&Value::text("Casa B")));
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitacora.csv");

        {
            let mut logbook = Logbook::open(&path);
            logbook.append(&record("Casa A, lote 4", "Maria")).unwrap();
        }

        // A fresh repository over the same file sees the same data,
        // including the comma in the property name and the empty cells.
        let mut reopened = Logbook::open(&path);
        let table = reopened.load().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(0, "Propiedad"),
            Some(&Value::text("Casa A, lote 4"))
        );
        assert_eq!(table.get(0, "Entrega"), Some(&Value::empty()));
        assert_eq!(table.get(0, "TikTok"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_load_heals_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitacora.csv");
        std::fs::write(
            &path,
            "Ubicacion,Foto,Edicion_Foto,Comentarios\nNorte,Si,,N/A\n",
        )
        .unwrap();

        let mut logbook = Logbook::open(&path);
        let table = logbook.load().unwrap();
        assert_eq!(table.columns(), canonical_headers());
        assert_eq!(table.get(0, "Zona"), Some(&Value::text("Norte")));
        assert_eq!(table.get(0, "Foto"), Some(&Value::Bool(true)));
        assert_eq!(table.get(0, "Edicion_Foto"), Some(&Value::text("Pendiente")));
        assert_eq!(
            table.get(0, "Comentarios"),
            Some(&Value::text(NOT_APPLICABLE))
        );
    }
}
