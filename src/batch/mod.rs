//! CSV batch input and output.
//!
//! Input columns are resolved by fuzzy substring match ("lat",
//! "lon"/"long", and id-ish names like "boring" or "point"), and degree
//! symbols are stripped from coordinate fields, matching how field
//! crews' spreadsheets actually arrive.

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use thiserror::Error;

use crate::models::{InputPoint, RowOutcome};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to process CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no latitude column found (looked for a header containing 'lat')")]
    MissingLatitude,

    #[error("no longitude column found (looked for a header containing 'lon')")]
    MissingLongitude,

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Which input columns hold the id and coordinates.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub id: Option<usize>,
    pub lat: usize,
    pub lon: usize,
}

impl ColumnMap {
    /// Resolve columns from headers by case-insensitive substring match.
    pub fn resolve(headers: &StringRecord) -> Result<Self, BatchError> {
        let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let lat = lower
            .iter()
            .position(|h| h.contains("lat"))
            .ok_or(BatchError::MissingLatitude)?;

        let lon = lower
            .iter()
            .enumerate()
            .position(|(i, h)| i != lat && h.contains("lon"))
            .ok_or(BatchError::MissingLongitude)?;

        let id = lower.iter().enumerate().position(|(i, h)| {
            i != lat
                && i != lon
                && ["id", "boring", "point", "name"].iter().any(|k| h.contains(k))
        });

        Ok(Self { id, lat, lon })
    }
}

/// Read input points from CSV.
///
/// Rows with unparseable coordinate fields are kept (as NaN) so the
/// transform step can report them per row; the batch always produces
/// one output row per input row.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<InputPoint>, BatchError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut points = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;

        let id = columns
            .id
            .and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Point_{}", row + 1));

        let lat = parse_coordinate(record.get(columns.lat).unwrap_or(""));
        let lon = parse_coordinate(record.get(columns.lon).unwrap_or(""));

        points.push(InputPoint::new(Some(id), lat, lon));
    }
    Ok(points)
}

/// Parse a coordinate field, tolerating degree symbols and stray
/// whitespace. Unparseable fields become NaN.
fn parse_coordinate(field: &str) -> f64 {
    field
        .replace('°', "")
        .trim()
        .parse()
        .unwrap_or(f64::NAN)
}

const OUTPUT_HEADERS: &[&str] = &[
    "ID",
    "Latitude_WGS84",
    "Longitude_WGS84",
    "Detected_County",
    "State_Plane_Zone",
    "State_Plane_EPSG",
    "Easting_StatePlane_ft",
    "Northing_StatePlane_ft",
    "County_EPSG",
    "Easting_County_ft",
    "Northing_County_ft",
    "Error",
];

/// Write one output row per outcome, preserving input order. Fields
/// that could not be produced stay empty rather than being omitted.
pub fn write_results<W: Write>(writer: W, outcomes: &[RowOutcome]) -> Result<(), BatchError> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(OUTPUT_HEADERS)?;

    for outcome in outcomes {
        match outcome {
            RowOutcome::Ok(result) => {
                let county = result
                    .county
                    .as_ref()
                    .map(|c| c.display_name())
                    .unwrap_or_default();
                let (county_epsg, county_e, county_n) = match &result.county_system {
                    Some(p) => (
                        p.epsg.to_string(),
                        format!("{:.2}", p.easting),
                        format!("{:.2}", p.northing),
                    ),
                    None => (String::new(), String::new(), String::new()),
                };

                csv_writer.write_record([
                    result.point.id.clone().unwrap_or_default(),
                    format!("{:.6}", result.point.lat),
                    format!("{:.6}", result.point.lon),
                    county,
                    result.zone.name().to_string(),
                    result.state_plane.epsg.to_string(),
                    format!("{:.2}", result.state_plane.easting),
                    format!("{:.2}", result.state_plane.northing),
                    county_epsg,
                    county_e,
                    county_n,
                    String::new(),
                ])?;
            }
            RowOutcome::Failed { point, reason } => {
                csv_writer.write_record([
                    point.id.clone().unwrap_or_default(),
                    format!("{}", point.lat),
                    format!("{}", point.lon),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    reason.clone(),
                ])?;
            }
        }
    }

    csv_writer.flush()?;
    Ok(())
}
