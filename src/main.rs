use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bitacora::config::Config;
use bitacora::record::{
    Condition, PhotoEditStatus, PropertyKind, SessionStatus, VideoEditStatus, DATE_FORMAT,
};
use bitacora::report::{self, Period};
use bitacora::schema::Column;
use bitacora::table::{distinct_advisors, is_truthy, Table, Value};
use bitacora::{logging, Logbook, NewSession};

#[derive(Parser)]
#[command(
    name = "bitacora",
    version,
    about = "Production logbook for a photo/video shoot studio"
)]
struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Session table CSV (overrides the configured location)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new shoot session
    Add {
        /// Shoot date (YYYY-MM-DD); today if omitted
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Property name
        #[arg(long)]
        property: String,
        /// Property kind (Casa, Depa, Terreno, Local)
        #[arg(long, value_parser = parse_kind, default_value = "Casa")]
        kind: PropertyKind,
        /// Zone or neighbourhood
        #[arg(long, default_value = "")]
        zone: String,
        /// Google Maps link
        #[arg(long = "maps", default_value = "")]
        maps_link: String,
        /// Advisor in charge; new names are introduced on first use
        #[arg(long)]
        advisor: String,
        /// Session status (Realizada, Cancelada, Reprogramada)
        #[arg(long, value_parser = parse_status, default_value = "Realizada")]
        status: SessionStatus,
        /// Reason, when the session was cancelled
        #[arg(long = "cancel-reason", default_value = "")]
        cancel_reason: String,
        /// Photos were shot
        #[arg(long)]
        photo: bool,
        /// Video was shot
        #[arg(long)]
        video: bool,
        /// Drone footage was shot
        #[arg(long)]
        drone: bool,
        /// Photo editing status (Pendiente, Editando, Entregado, No Aplica)
        #[arg(long = "photo-edit", value_parser = parse_photo_edit, default_value = "Pendiente")]
        photo_edit: PhotoEditStatus,
        /// Video editing status (Pendiente, Montado, Entregado, No Aplica)
        #[arg(long = "video-edit", value_parser = parse_video_edit, default_value = "Pendiente")]
        video_edit: VideoEditStatus,
        /// Conditions on site (Mala, Regular, Buena, Excelente)
        #[arg(long, value_parser = parse_condition, default_value = "Buena")]
        condition: Condition,
        #[arg(long, default_value = "")]
        comments: String,
    },
    /// Print the session table
    List {
        /// Emit the full table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set cells on the sessions with the given ID, then rewrite the table
    Edit {
        id: String,
        /// Assignment, e.g. --set Estatus=Cancelada (repeatable)
        #[arg(long = "set", value_name = "COLUMN=VALUE", required = true)]
        sets: Vec<String>,
    },
    /// Remove the sessions with the given ID
    Remove { id: String },
    /// List advisor names seen in the table
    Advisors,
    /// Period-filtered statistics
    Stats {
        #[arg(long)]
        year: Option<i32>,
        /// Month number 1-12 (with --year)
        #[arg(long)]
        month: Option<u32>,
        /// Any date inside the wanted Monday-Friday week
        #[arg(long, value_parser = parse_date)]
        week: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| format!("expected YYYY-MM-DD, got '{s}'"))
}

fn parse_status(s: &str) -> Result<SessionStatus, String> {
    SessionStatus::from_str(s)
        .ok_or_else(|| format!("unknown status '{s}' (Realizada, Cancelada, Reprogramada)"))
}

fn parse_kind(s: &str) -> Result<PropertyKind, String> {
    PropertyKind::from_str(s)
        .ok_or_else(|| format!("unknown property kind '{s}' (Casa, Depa, Terreno, Local)"))
}

fn parse_photo_edit(s: &str) -> Result<PhotoEditStatus, String> {
    PhotoEditStatus::from_str(s).ok_or_else(|| {
        format!("unknown photo editing status '{s}' (Pendiente, Editando, Entregado, No Aplica)")
    })
}

fn parse_video_edit(s: &str) -> Result<VideoEditStatus, String> {
    VideoEditStatus::from_str(s).ok_or_else(|| {
        format!("unknown video editing status '{s}' (Pendiente, Montado, Entregado, No Aplica)")
    })
}

fn parse_condition(s: &str) -> Result<Condition, String> {
    Condition::from_str(s)
        .ok_or_else(|| format!("unknown condition '{s}' (Mala, Regular, Buena, Excelente)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init()?;

    let data_path = match cli.data {
        Some(path) => path,
        None => {
            let config = match &cli.config {
                Some(path) => Config::load_from(path)?,
                None => Config::load()?,
            };
            config.data_path
        }
    };
    let mut logbook = Logbook::open(&data_path);

    match cli.command {
        Command::Add {
            date,
            property,
            kind,
            zone,
            maps_link,
            advisor,
            status,
            cancel_reason,
            photo,
            video,
            drone,
            photo_edit,
            video_edit,
            condition,
            comments,
        } => {
            let now = Local::now();
            let session = NewSession {
                date: date.unwrap_or_else(|| now.date_naive()),
                property,
                kind,
                zone,
                maps_link,
                advisor,
                status,
                cancel_reason,
                photo,
                video,
                drone,
                photo_edit,
                video_edit,
                condition,
                comments,
            };
            let record = match session.build(now) {
                Ok(record) => record,
                Err(err) => {
                    // Rejected before any write: storage stays untouched.
                    eprintln!("Error: {err}");
                    std::process::exit(2);
                }
            };
            let id = record.id.clone();
            logbook.append(&record)?;
            println!("Saved session {id}");
        }
        Command::List { json } => {
            let table = logbook.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&table_to_json(&table))?);
            } else {
                print_listing(&table);
            }
        }
        Command::Edit { id, sets } => {
            let assignments = sets
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<Result<Vec<_>>>()?;
            let mut table = logbook.load()?;
            let matches = rows_with_id(&table, &id);
            if matches.is_empty() {
                bail!("no session with ID {id}");
            }
            // A minute-resolution ID can cover several sessions; edits
            // apply to all of them, like a grid edit would.
            for &row in &matches {
                for (column, value) in &assignments {
                    let cell = if column.is_boolean() {
                        Value::Bool(is_truthy(value))
                    } else {
                        Value::text(value.clone())
                    };
                    table.set(row, column.as_str(), cell);
                }
            }
            logbook.replace_all(table)?;
            println!("Updated {} session(s)", matches.len());
        }
        Command::Remove { id } => {
            let table = logbook.load()?;
            let matches = rows_with_id(&table, &id);
            if matches.is_empty() {
                bail!("no session with ID {id}");
            }
            let mut kept = Table::new(table.columns().to_vec());
            for (row, cells) in table.rows().iter().enumerate() {
                if !matches.contains(&row) {
                    kept.push_row(cells.clone());
                }
            }
            logbook.replace_all(kept)?;
            println!("Removed {} session(s)", matches.len());
        }
        Command::Advisors => {
            let table = logbook.load()?;
            for advisor in distinct_advisors(&table) {
                println!("{advisor}");
            }
        }
        Command::Stats {
            year,
            month,
            week,
            from,
            to,
            json,
        } => {
            let period = build_period(year, month, week, from, to)?;
            let table = logbook.load()?;
            let summary = report::summarize(&table, period.as_ref());
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary, period.as_ref());
            }
        }
    }

    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(Column, String)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected COLUMN=VALUE, got '{raw}'");
    };
    let Some(column) = Column::from_name(name) else {
        bail!("unknown column '{name}'");
    };
    Ok((column, value.to_string()))
}

fn rows_with_id(table: &Table, id: &str) -> Vec<usize> {
    let Some(idx) = table.column_index(Column::Id.as_str()) else {
        return Vec::new();
    };
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row[idx].eq_text(id))
        .map(|(row, _)| row)
        .collect()
}

fn build_period(
    year: Option<i32>,
    month: Option<u32>,
    week: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Option<Period>> {
    match (year, month, week, from, to) {
        (None, None, None, None, None) => Ok(None),
        (None, None, Some(reference), None, None) => Ok(Some(Period::Week { reference })),
        (None, None, None, Some(from), Some(to)) => {
            if from > to {
                bail!("--from is after --to");
            }
            Ok(Some(Period::Range { from, to }))
        }
        (Some(year), Some(month), None, None, None) => {
            if !(1..=12).contains(&month) {
                bail!("--month must be 1-12");
            }
            Ok(Some(Period::Month { year, month }))
        }
        (Some(year), None, None, None, None) => Ok(Some(Period::Year(year))),
        _ => bail!("use --year [--month], --week, or --from with --to, not a mix"),
    }
}

fn table_to_json(table: &Table) -> serde_json::Value {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let object = table
                .columns()
                .iter()
                .zip(row)
                .map(|(name, cell)| {
                    let value = match cell {
                        Value::Bool(b) => serde_json::Value::Bool(*b),
                        Value::Text(s) => serde_json::Value::String(s.clone()),
                    };
                    (name.clone(), value)
                })
                .collect::<serde_json::Map<String, serde_json::Value>>();
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn print_listing(table: &Table) {
    if table.is_empty() {
        println!("No sessions recorded.");
        return;
    }
    let columns = [
        Column::Id,
        Column::Date,
        Column::Property,
        Column::Advisor,
        Column::Status,
        Column::PhotoEdit,
        Column::VideoEdit,
    ];
    let cell = |row: usize, column: Column| {
        table
            .get(row, column.as_str())
            .map(Value::to_field)
            .unwrap_or_default()
    };
    println!(
        "{:<11} {:<11} {:<28} {:<16} {:<13} {:<11} {:<11}",
        "ID", "Fecha", "Propiedad", "Asesora", "Estatus", "Ed.Foto", "Ed.Video"
    );
    for row in 0..table.len() {
        let fields: Vec<String> = columns.iter().map(|&c| cell(row, c)).collect();
        println!(
            "{:<11} {:<11} {:<28} {:<16} {:<13} {:<11} {:<11}",
            fields[0], fields[1], fields[2], fields[3], fields[4], fields[5], fields[6]
        );
    }
}

fn print_summary(summary: &report::Summary, period: Option<&Period>) {
    match period {
        Some(period) => println!("Period: {}", period.label()),
        None => println!("Period: full history"),
    }
    println!(
        "Sessions: {} realized, {} cancelled, {} rescheduled",
        summary.realized, summary.cancelled, summary.rescheduled
    );
    println!(
        "Photos: {} pending, {} delivered",
        summary.photos_pending, summary.photos_delivered
    );
    println!(
        "Services (over {} realized): photo {:.1}%, video {:.1}%, drone {:.1}%",
        summary.realized, summary.photo_pct, summary.video_pct, summary.drone_pct
    );
    if !summary.top_advisors.is_empty() {
        println!("Top advisors (realized sessions):");
        for entry in &summary.top_advisors {
            println!("  {:<20} {}", entry.advisor, entry.sessions);
        }
    }
    if !summary.cancellations.is_empty() {
        println!("Cancellations:");
        for cancellation in &summary.cancellations {
            println!(
                "  {}  {:<16} {:<24} {}",
                cancellation.date, cancellation.advisor, cancellation.property, cancellation.reason
            );
        }
        println!("Cancellations by advisor:");
        for entry in &summary.cancellations_by_advisor {
            println!("  {:<20} {}", entry.advisor, entry.sessions);
        }
    }
}
