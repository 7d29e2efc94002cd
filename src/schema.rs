//! Canonical schema of the session table.
//!
//! This is the single authority on column names, their persisted order,
//! which columns hold booleans, and how legacy column names migrate to
//! current ones. The table on disk is shared with an older deployment,
//! so the wire names are Spanish and must not change.

/// Canonical columns of the session table, in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Date,
    Month,
    Year,
    Property,
    Kind,
    Zone,
    MapsLink,
    Advisor,
    Status,
    CancelReason,
    Photo,
    Video,
    Drone,
    PhotoEdit,
    VideoEdit,
    Delivery,
    TikTok,
    YouTube,
    Insta,
    Comments,
    Condition,
}

impl Column {
    /// Every canonical column, in the order rows are persisted.
    pub const ALL: [Column; 22] = [
        Column::Id,
        Column::Date,
        Column::Month,
        Column::Year,
        Column::Property,
        Column::Kind,
        Column::Zone,
        Column::MapsLink,
        Column::Advisor,
        Column::Status,
        Column::CancelReason,
        Column::Photo,
        Column::Video,
        Column::Drone,
        Column::PhotoEdit,
        Column::VideoEdit,
        Column::Delivery,
        Column::TikTok,
        Column::YouTube,
        Column::Insta,
        Column::Comments,
        Column::Condition,
    ];

    /// Wire name of the column (the header token in the stored table).
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Date => "Fecha",
            Column::Month => "Mes",
            Column::Year => "Año",
            Column::Property => "Propiedad",
            Column::Kind => "Tipo",
            Column::Zone => "Zona",
            Column::MapsLink => "Link_Maps",
            Column::Advisor => "Asesora",
            Column::Status => "Estatus",
            Column::CancelReason => "Motivo_Cancel",
            Column::Photo => "Foto",
            Column::Video => "Video",
            Column::Drone => "Drone",
            Column::PhotoEdit => "Edicion_Foto",
            Column::VideoEdit => "Edicion_Video",
            Column::Delivery => "Entrega",
            Column::TikTok => "TikTok",
            Column::YouTube => "YouTube",
            Column::Insta => "Insta",
            Column::Comments => "Comentarios",
            Column::Condition => "Condicion",
        }
    }

    /// Whether the column holds a service/posting flag that the normalizer
    /// coerces to a boolean.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            Column::Photo
                | Column::Video
                | Column::Drone
                | Column::TikTok
                | Column::YouTube
                | Column::Insta
        )
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

/// Deprecated column names and the canonical columns that replace them.
///
/// Applied in order, once per load. When both the deprecated and the
/// canonical column are present, the canonical one wins and the deprecated
/// column is discarded without merging. New migrations are appended here;
/// existing load logic never changes.
pub const LEGACY_RENAMES: [(&str, Column); 5] = [
    ("Nombre_Propiedad", Column::Property),
    ("Tipo_Propiedad", Column::Kind),
    ("Ubicacion", Column::Zone),
    ("Estatus_Sesion", Column::Status),
    ("Fecha_Entrega", Column::Delivery),
];

/// The canonical header row, as written to storage.
pub fn canonical_headers() -> Vec<String> {
    Column::ALL.iter().map(|c| c.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_headers_are_unique() {
        let headers = canonical_headers();
        let unique: HashSet<&String> = headers.iter().collect();
        assert_eq!(headers.len(), Column::ALL.len());
        assert_eq!(unique.len(), headers.len());
    }

    #[test]
    fn test_from_name_round_trips() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.as_str()), Some(column));
        }
        assert_eq!(Column::from_name("Ubicacion"), None);
        assert_eq!(Column::from_name(""), None);
    }

    #[test]
    fn test_legacy_renames_target_canonical_columns() {
        for (legacy, canonical) in LEGACY_RENAMES {
            // A legacy name must never collide with the canonical set.
            assert_eq!(Column::from_name(legacy), None);
            assert!(Column::ALL.contains(&canonical));
        }
    }

    #[test]
    fn test_boolean_columns() {
        let booleans: Vec<&str> = Column::ALL
            .iter()
            .filter(|c| c.is_boolean())
            .map(|c| c.as_str())
            .collect();
        assert_eq!(
            booleans,
            ["Foto", "Video", "Drone", "TikTok", "YouTube", "Insta"]
        );
    }
}
