//! Time-filtered statistics over the session table.
//!
//! Pure functions over the table returned by `Logbook::load`; nothing here
//! reads or writes storage. Rows whose `Fecha` cell does not parse as a
//! date are excluded from every report.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::record::{spanish_month, PhotoEditStatus, SessionStatus, DATE_FORMAT};
use crate::schema::Column;
use crate::table::{Table, Value};

/// A reporting time window. All variants resolve against the parsed
/// per-row shoot date, `Range` bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
    /// Monday through Friday of the week containing `reference`.
    Week { reference: NaiveDate },
    Range { from: NaiveDate, to: NaiveDate },
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year(year) => date.year() == year,
            Period::Week { reference } => {
                let monday = reference
                    - Days::new(u64::from(reference.weekday().num_days_from_monday()));
                let friday = monday + Days::new(4);
                date >= monday && date <= friday
            }
            Period::Range { from, to } => date >= from && date <= to,
        }
    }

    /// Human-readable label for report headings.
    pub fn label(&self) -> String {
        match *self {
            Period::Month { year, month } => format!("{} {year}", spanish_month(month)),
            Period::Year(year) => format!("Año {year}"),
            Period::Week { reference } => {
                let monday = reference
                    - Days::new(u64::from(reference.weekday().num_days_from_monday()));
                format!("Semana del {}", monday.format("%d/%m/%Y"))
            }
            Period::Range { from, to } => {
                format!("{} a {}", from.format("%d/%m/%Y"), to.format("%d/%m/%Y"))
            }
        }
    }
}

/// Sessions attributed to one advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorCount {
    pub advisor: String,
    pub sessions: usize,
}

/// One cancelled session, for the cancellation detail listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cancellation {
    pub date: String,
    pub advisor: String,
    pub property: String,
    pub reason: String,
}

/// Aggregates for one reporting window.
///
/// Photo counts and service percentages are computed over realized
/// sessions only; a cancelled shoot has no services to deliver.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub realized: usize,
    pub cancelled: usize,
    pub rescheduled: usize,
    pub photos_pending: usize,
    pub photos_delivered: usize,
    pub photo_pct: f64,
    pub video_pct: f64,
    pub drone_pct: f64,
    pub top_advisors: Vec<AdvisorCount>,
    pub cancellations: Vec<Cancellation>,
    pub cancellations_by_advisor: Vec<AdvisorCount>,
}

fn cell_text(row: &[Value], idx: usize) -> String {
    row.get(idx).map(Value::to_field).unwrap_or_default()
}

fn ranked(counts: BTreeMap<String, usize>) -> Vec<AdvisorCount> {
    let mut list: Vec<AdvisorCount> = counts
        .into_iter()
        .map(|(advisor, sessions)| AdvisorCount { advisor, sessions })
        .collect();
    // BTreeMap iteration already ordered by name; keep that as tie-break.
    list.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    list
}

/// Aggregate the table over `period` (`None` = full history).
pub fn summarize(table: &Table, period: Option<&Period>) -> Summary {
    let idx = |column: Column| table.column_index(column.as_str());
    let (Some(date_i), Some(status_i)) = (idx(Column::Date), idx(Column::Status)) else {
        return Summary::default();
    };
    let photo_edit_i = idx(Column::PhotoEdit);
    let photo_i = idx(Column::Photo);
    let video_i = idx(Column::Video);
    let drone_i = idx(Column::Drone);
    let advisor_i = idx(Column::Advisor);
    let property_i = idx(Column::Property);
    let reason_i = idx(Column::CancelReason);

    let mut summary = Summary::default();
    let mut services = (0usize, 0usize, 0usize);
    let mut realized_by_advisor: BTreeMap<String, usize> = BTreeMap::new();
    let mut cancelled_by_advisor: BTreeMap<String, usize> = BTreeMap::new();

    for row in table.rows() {
        let Ok(date) = NaiveDate::parse_from_str(&cell_text(row, date_i), DATE_FORMAT) else {
            continue;
        };
        if let Some(period) = period {
            if !period.contains(date) {
                continue;
            }
        }

        let status = cell_text(row, status_i);
        match SessionStatus::from_str(&status) {
            Some(SessionStatus::Done) => {
                summary.realized += 1;

                if let Some(i) = photo_edit_i {
                    match PhotoEditStatus::from_str(&cell_text(row, i)) {
                        Some(PhotoEditStatus::Pending) | Some(PhotoEditStatus::Editing) => {
                            summary.photos_pending += 1;
                        }
                        Some(PhotoEditStatus::Delivered) => summary.photos_delivered += 1,
                        _ => {}
                    }
                }

                if photo_i.is_some_and(|i| row[i].truthy()) {
                    services.0 += 1;
                }
                if video_i.is_some_and(|i| row[i].truthy()) {
                    services.1 += 1;
                }
                if drone_i.is_some_and(|i| row[i].truthy()) {
                    services.2 += 1;
                }

                if let Some(i) = advisor_i {
                    let advisor = cell_text(row, i);
                    if !advisor.trim().is_empty() {
                        *realized_by_advisor.entry(advisor).or_default() += 1;
                    }
                }
            }
            Some(SessionStatus::Cancelled) => {
                summary.cancelled += 1;
                let advisor = advisor_i.map(|i| cell_text(row, i)).unwrap_or_default();
                if !advisor.trim().is_empty() {
                    *cancelled_by_advisor.entry(advisor.clone()).or_default() += 1;
                }
                summary.cancellations.push(Cancellation {
                    date: date.format(DATE_FORMAT).to_string(),
                    advisor,
                    property: property_i.map(|i| cell_text(row, i)).unwrap_or_default(),
                    reason: reason_i.map(|i| cell_text(row, i)).unwrap_or_default(),
                });
            }
            Some(SessionStatus::Rescheduled) => summary.rescheduled += 1,
            // Free-text statuses from hand edits count toward nothing.
            None => {}
        }
    }

    if summary.realized > 0 {
        let base = summary.realized as f64;
        summary.photo_pct = services.0 as f64 / base * 100.0;
        summary.video_pct = services.1 as f64 / base * 100.0;
        summary.drone_pct = services.2 as f64 / base * 100.0;
    }
    summary.top_advisors = ranked(realized_by_advisor);
    summary.cancellations_by_advisor = ranked(cancelled_by_advisor);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn table(rows: &[&[&str]]) -> Table {
        // Columns used by the reporting layer; normalize fills the rest.
        let columns = [
            "Fecha",
            "Propiedad",
            "Asesora",
            "Estatus",
            "Motivo_Cancel",
            "Foto",
            "Video",
            "Drone",
            "Edicion_Foto",
        ];
        let mut raw = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            raw.push_row(row.iter().map(|s| Value::text(*s)).collect());
        }
        normalize(raw)
    }

    #[test]
    fn test_week_period_is_monday_through_friday() {
        // 2025-06-04 is a Wednesday.
        let week = Period::Week {
            reference: NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
        };
        assert!(week.contains(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())); // Monday
        assert!(week.contains(NaiveDate::from_ymd_opt(2025, 6, 6).unwrap())); // Friday
        assert!(!week.contains(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap())); // Saturday
        assert!(!week.contains(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())); // prior Sunday
    }

    #[test]
    fn test_month_year_and_range_periods() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert!(Period::Month { year: 2025, month: 3 }.contains(date));
        assert!(!Period::Month { year: 2025, month: 4 }.contains(date));
        assert!(Period::Year(2025).contains(date));
        assert!(!Period::Year(2024).contains(date));

        let range = Period::Range {
            from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        };
        assert!(range.contains(date)); // inclusive upper bound
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
    }

    #[test]
    fn test_summarize_counts_and_percentages() {
        let summary = summarize(
            &table(&[
                &["2025-03-03", "Casa A", "Maria", "Realizada", "", "si", "si", "", "Pendiente"],
                &["2025-03-04", "Casa B", "Maria", "Realizada", "", "si", "", "", "Entregado"],
                &["2025-03-05", "Casa C", "Ana", "Realizada", "", "si", "", "si", "Editando"],
                &["2025-03-06", "Casa D", "Ana", "Reprogramada", "", "", "", "", ""],
                &["2025-03-07", "Casa E", "Lucia", "Cancelada", "Lluvia", "", "", "", ""],
            ]),
            None,
        );

        assert_eq!(summary.realized, 3);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.rescheduled, 1);
        assert_eq!(summary.photos_pending, 2); // Pendiente + Editando
        assert_eq!(summary.photos_delivered, 1);
        assert_eq!(summary.photo_pct, 100.0);
        assert!((summary.video_pct - 100.0 / 3.0).abs() < 1e-9);
        assert!((summary.drone_pct - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            summary.top_advisors,
            [
                AdvisorCount { advisor: "Maria".into(), sessions: 2 },
                AdvisorCount { advisor: "Ana".into(), sessions: 1 },
            ]
        );
        assert_eq!(summary.cancellations.len(), 1);
        assert_eq!(summary.cancellations[0].reason, "Lluvia");
        assert_eq!(
            summary.cancellations_by_advisor,
            [AdvisorCount { advisor: "Lucia".into(), sessions: 1 }]
        );
    }

    #[test]
    fn test_summarize_filters_by_period() {
        let data = table(&[
            &["2025-03-03", "Casa A", "Maria", "Realizada", "", "si", "", "", ""],
            &["2025-04-01", "Casa B", "Maria", "Realizada", "", "si", "", "", ""],
        ]);
        let march = summarize(&data, Some(&Period::Month { year: 2025, month: 3 }));
        assert_eq!(march.realized, 1);
        let all = summarize(&data, None);
        assert_eq!(all.realized, 2);
    }

    #[test]
    fn test_rows_with_bad_dates_are_excluded() {
        let summary = summarize(
            &table(&[
                &["no es fecha", "Casa A", "Maria", "Realizada", "", "si", "", "", ""],
                &["", "Casa B", "Maria", "Realizada", "", "si", "", "", ""],
                &["2025-03-03", "Casa C", "Maria", "Realizada", "", "si", "", "", ""],
            ]),
            None,
        );
        assert_eq!(summary.realized, 1);
    }

    #[test]
    fn test_unknown_status_counts_toward_nothing() {
        let summary = summarize(
            &table(&[&["2025-03-03", "Casa A", "Maria", "pendiente?", "", "", "", "", ""]]),
            None,
        );
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_empty_table_summary_is_zeroed() {
        let summary = summarize(&normalize(Table::new(Vec::new())), None);
        assert_eq!(summary, Summary::default());
    }
}
