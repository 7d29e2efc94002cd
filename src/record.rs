//! Typed session records and the capture-time construction rules.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use thiserror::Error;

use crate::table::Value;

/// Canonical token for a field that intentionally does not apply.
/// The legacy literal `N/A` is rewritten to this on load.
pub const NOT_APPLICABLE: &str = "No Aplica";

/// Date format used for the `Fecha` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of a shoot session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Done,
    Cancelled,
    Rescheduled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Done => "Realizada",
            SessionStatus::Cancelled => "Cancelada",
            SessionStatus::Rescheduled => "Reprogramada",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [
            SessionStatus::Done,
            SessionStatus::Cancelled,
            SessionStatus::Rescheduled,
        ]
        .into_iter()
        .find(|status| s.eq_ignore_ascii_case(status.as_str()))
    }
}

/// Kind of property being shot. Historical rows may carry free text; the
/// enum covers what the capture workflow offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    House,
    Apartment,
    Land,
    Commercial,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::House => "Casa",
            PropertyKind::Apartment => "Depa",
            PropertyKind::Land => "Terreno",
            PropertyKind::Commercial => "Local",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [
            PropertyKind::House,
            PropertyKind::Apartment,
            PropertyKind::Land,
            PropertyKind::Commercial,
        ]
        .into_iter()
        .find(|kind| s.eq_ignore_ascii_case(kind.as_str()))
    }
}

/// Editing pipeline state for photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoEditStatus {
    Pending,
    Editing,
    Delivered,
    NotApplicable,
}

impl PhotoEditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoEditStatus::Pending => "Pendiente",
            PhotoEditStatus::Editing => "Editando",
            PhotoEditStatus::Delivered => "Entregado",
            PhotoEditStatus::NotApplicable => NOT_APPLICABLE,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [
            PhotoEditStatus::Pending,
            PhotoEditStatus::Editing,
            PhotoEditStatus::Delivered,
            PhotoEditStatus::NotApplicable,
        ]
        .into_iter()
        .find(|status| s.eq_ignore_ascii_case(status.as_str()))
    }
}

/// Editing pipeline state for video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEditStatus {
    Pending,
    Assembled,
    Delivered,
    NotApplicable,
}

impl VideoEditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoEditStatus::Pending => "Pendiente",
            VideoEditStatus::Assembled => "Montado",
            VideoEditStatus::Delivered => "Entregado",
            VideoEditStatus::NotApplicable => NOT_APPLICABLE,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [
            VideoEditStatus::Pending,
            VideoEditStatus::Assembled,
            VideoEditStatus::Delivered,
            VideoEditStatus::NotApplicable,
        ]
        .into_iter()
        .find(|status| s.eq_ignore_ascii_case(status.as_str()))
    }
}

/// Shooting conditions on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Bad,
    Fair,
    Good,
    Excellent,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Bad => "Mala",
            Condition::Fair => "Regular",
            Condition::Good => "Buena",
            Condition::Excellent => "Excelente",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        [
            Condition::Bad,
            Condition::Fair,
            Condition::Good,
            Condition::Excellent,
        ]
        .into_iter()
        .find(|condition| s.eq_ignore_ascii_case(condition.as_str()))
    }
}

/// Spanish month name for the derived `Mes` column.
pub fn spanish_month(month: u32) -> &'static str {
    match month {
        1 => "Enero",
        2 => "Febrero",
        3 => "Marzo",
        4 => "Abril",
        5 => "Mayo",
        6 => "Junio",
        7 => "Julio",
        8 => "Agosto",
        9 => "Septiembre",
        10 => "Octubre",
        11 => "Noviembre",
        12 => "Diciembre",
        _ => "",
    }
}

/// Session identifier: the creation instant at minute resolution
/// (`YYMMDDHHMM`). Two captures within the same minute share an ID; the
/// table treats that as display identity, not a key.
pub fn session_id(now: DateTime<Local>) -> String {
    now.format("%y%m%d%H%M").to_string()
}

/// A capture submission rejected before any write is attempted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("property name is required")]
    MissingProperty,
    #[error("advisor name is required")]
    MissingAdvisor,
}

/// One fully-derived shoot session, ready to append.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub date: NaiveDate,
    pub month: String,
    pub year: i32,
    pub property: String,
    pub kind: PropertyKind,
    pub zone: String,
    pub maps_link: String,
    pub advisor: String,
    pub status: SessionStatus,
    pub cancel_reason: String,
    pub photo: bool,
    pub video: bool,
    pub drone: bool,
    pub photo_edit: PhotoEditStatus,
    pub video_edit: VideoEditStatus,
    pub delivery: String,
    pub tiktok: bool,
    pub youtube: bool,
    pub insta: bool,
    pub comments: String,
    pub condition: Condition,
}

impl SessionRecord {
    /// The record as a table row, in canonical column order.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(self.id.clone()),
            Value::text(self.date.format(DATE_FORMAT).to_string()),
            Value::text(self.month.clone()),
            Value::text(self.year.to_string()),
            Value::text(self.property.clone()),
            Value::text(self.kind.as_str()),
            Value::text(self.zone.clone()),
            Value::text(self.maps_link.clone()),
            Value::text(self.advisor.clone()),
            Value::text(self.status.as_str()),
            Value::text(self.cancel_reason.clone()),
            Value::Bool(self.photo),
            Value::Bool(self.video),
            Value::Bool(self.drone),
            Value::text(self.photo_edit.as_str()),
            Value::text(self.video_edit.as_str()),
            Value::text(self.delivery.clone()),
            Value::Bool(self.tiktok),
            Value::Bool(self.youtube),
            Value::Bool(self.insta),
            Value::text(self.comments.clone()),
            Value::text(self.condition.as_str()),
        ]
    }
}

/// Capture-form input for a new session.
///
/// `build` turns it into a `SessionRecord`: validates the required fields,
/// applies the capture-time consistency rules, and derives `ID`, `Mes` and
/// `Año` from the shoot date and the creation instant.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub date: NaiveDate,
    pub property: String,
    pub kind: PropertyKind,
    pub zone: String,
    pub maps_link: String,
    pub advisor: String,
    pub status: SessionStatus,
    pub cancel_reason: String,
    pub photo: bool,
    pub video: bool,
    pub drone: bool,
    pub photo_edit: PhotoEditStatus,
    pub video_edit: VideoEditStatus,
    pub condition: Condition,
    pub comments: String,
}

impl NewSession {
    pub fn build(self, now: DateTime<Local>) -> Result<SessionRecord, ValidationError> {
        if self.property.trim().is_empty() {
            return Err(ValidationError::MissingProperty);
        }
        if self.advisor.trim().is_empty() {
            return Err(ValidationError::MissingAdvisor);
        }

        // A cancelled session has nothing to edit; otherwise a service that
        // was not shot cannot be edited either.
        let (photo_edit, video_edit) = if self.status == SessionStatus::Cancelled {
            (
                PhotoEditStatus::NotApplicable,
                VideoEditStatus::NotApplicable,
            )
        } else {
            (
                if self.photo {
                    self.photo_edit
                } else {
                    PhotoEditStatus::NotApplicable
                },
                if self.video {
                    self.video_edit
                } else {
                    VideoEditStatus::NotApplicable
                },
            )
        };

        let cancel_reason = if self.status == SessionStatus::Cancelled {
            self.cancel_reason
        } else {
            String::new()
        };

        Ok(SessionRecord {
            id: session_id(now),
            month: spanish_month(self.date.month()).to_string(),
            year: self.date.year(),
            date: self.date,
            property: self.property,
            kind: self.kind,
            zone: self.zone,
            maps_link: self.maps_link,
            advisor: self.advisor,
            status: self.status,
            cancel_reason,
            photo: self.photo,
            video: self.video,
            drone: self.drone,
            photo_edit,
            video_edit,
            delivery: String::new(),
            tiktok: false,
            youtube: false,
            insta: false,
            comments: self.comments,
            condition: self.condition,
        })
    }
}
