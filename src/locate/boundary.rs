//! County boundary acquisition from the Census county GeoJSON dataset.

use std::time::Duration;

use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::County;

/// Default boundary dataset: US county polygons keyed by Census FIPS code.
pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json";

/// Indiana's state FIPS code.
const INDIANA_STATE_FIPS: &str = "18";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("boundary download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("boundary payload is not valid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("no Indiana county features in boundary payload")]
    Empty,
}

/// One county boundary polygon.
#[derive(Debug, Clone)]
pub struct CountyBoundary {
    pub county: County,
    pub geometry: MultiPolygon<f64>,
}

impl CountyBoundary {
    /// Envelope of the boundary geometry as (min_x, min_y, max_x, max_y).
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        use geo::BoundingRect;
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

/// Download and parse the Indiana county boundaries.
///
/// One-shot acquisition: callers cache the result for the process
/// lifetime and fall back to bounding-box-only detection when this
/// fails. Never called more than once per process in normal operation.
pub async fn fetch_county_boundaries(
    url: &str,
    timeout: Duration,
) -> Result<Vec<CountyBoundary>, FetchError> {
    info!("Downloading county boundaries from {}", url);

    let client = reqwest::Client::builder()
        .user_agent("wabash/0.1 (coordinate transformer)")
        .timeout(timeout)
        .build()?;

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_county_boundaries(&body)
}

/// Parse a county FeatureCollection, keeping Indiana features only.
///
/// Features are matched on the `STATE` property and their `GEO_ID` FIPS
/// code mapped to a county key. Features with unusable geometry are
/// skipped with a warning rather than failing the whole dataset.
pub fn parse_county_boundaries(geojson_text: &str) -> Result<Vec<CountyBoundary>, FetchError> {
    let geojson: GeoJson = geojson_text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    let mut boundaries = Vec::new();
    for feature in collection.features {
        let Some(props) = &feature.properties else {
            continue;
        };

        if props.get("STATE").and_then(|v| v.as_str()) != Some(INDIANA_STATE_FIPS) {
            continue;
        }

        // GEO_ID looks like "0500000US18097"; the part after "US" is the
        // five-digit county FIPS code.
        let Some(fips) = props
            .get("GEO_ID")
            .and_then(|v| v.as_str())
            .and_then(|id| id.split_once("US").map(|(_, fips)| fips.to_string()))
        else {
            continue;
        };

        let Some(county) = county_for_fips(&fips) else {
            warn!("Unknown Indiana county FIPS code {}", fips);
            continue;
        };

        let Some(geometry) = feature.geometry else {
            continue;
        };
        let geometry = match geo_types::Geometry::<f64>::try_from(geometry) {
            Ok(g) => g,
            Err(e) => {
                warn!("Skipping {}: unusable geometry ({})", county, e);
                continue;
            }
        };

        let polygons = match geometry {
            geo_types::Geometry::Polygon(p) => MultiPolygon(vec![p]),
            geo_types::Geometry::MultiPolygon(mp) => mp,
            _ => {
                warn!("Skipping {}: expected polygonal geometry", county);
                continue;
            }
        };

        boundaries.push(CountyBoundary {
            county,
            geometry: polygons,
        });
    }

    if boundaries.is_empty() {
        return Err(FetchError::Empty);
    }

    info!("Parsed {} Indiana county boundaries", boundaries.len());
    Ok(boundaries)
}

/// Census FIPS → county key for Indiana's 92 counties.
fn county_for_fips(fips: &str) -> Option<County> {
    let name = match fips {
        "18001" => "ADAMS",
        "18003" => "ALLEN",
        "18005" => "BARTHOLOMEW",
        "18007" => "BENTON",
        "18009" => "BLACKFORD",
        "18011" => "BOONE",
        "18013" => "BROWN",
        "18015" => "CARROLL",
        "18017" => "CASS",
        "18019" => "CLARK",
        "18021" => "CLAY",
        "18023" => "CLINTON",
        "18025" => "CRAWFORD",
        "18027" => "DAVIESS",
        "18029" => "DEARBORN",
        "18031" => "DECATUR",
        "18033" => "DEKALB",
        "18035" => "DELAWARE",
        "18037" => "DUBOIS",
        "18039" => "ELKHART",
        "18041" => "FAYETTE",
        "18043" => "FLOYD",
        "18045" => "FOUNTAIN",
        "18047" => "FRANKLIN",
        "18049" => "FULTON",
        "18051" => "GIBSON",
        "18053" => "GRANT",
        "18055" => "GREENE",
        "18057" => "HAMILTON",
        "18059" => "HANCOCK",
        "18061" => "HARRISON",
        "18063" => "HENDRICKS",
        "18065" => "HENRY",
        "18067" => "HOWARD",
        "18069" => "HUNTINGTON",
        "18071" => "JACKSON",
        "18073" => "JASPER",
        "18075" => "JAY",
        "18077" => "JEFFERSON",
        "18079" => "JENNINGS",
        "18081" => "JOHNSON",
        "18083" => "KNOX",
        "18085" => "KOSCIUSKO",
        "18087" => "LAGRANGE",
        "18089" => "LAKE",
        "18091" => "LA_PORTE",
        "18093" => "LAWRENCE",
        "18095" => "MADISON",
        "18097" => "MARION",
        "18099" => "MARSHALL",
        "18101" => "MARTIN",
        "18103" => "MIAMI",
        "18105" => "MONROE",
        "18107" => "MONTGOMERY",
        "18109" => "MORGAN",
        "18111" => "NEWTON",
        "18113" => "NOBLE",
        "18115" => "OHIO",
        "18117" => "ORANGE",
        "18119" => "OWEN",
        "18121" => "PARKE",
        "18123" => "PERRY",
        "18125" => "PIKE",
        "18127" => "PORTER",
        "18129" => "POSEY",
        "18131" => "PULASKI",
        "18133" => "PUTNAM",
        "18135" => "RANDOLPH",
        "18137" => "RIPLEY",
        "18139" => "RUSH",
        "18141" => "ST_JOSEPH",
        "18143" => "SCOTT",
        "18145" => "SHELBY",
        "18147" => "SPENCER",
        "18149" => "STARKE",
        "18151" => "STEUBEN",
        "18153" => "SULLIVAN",
        "18155" => "SWITZERLAND",
        "18157" => "TIPPECANOE",
        "18159" => "TIPTON",
        "18161" => "UNION",
        "18163" => "VANDERBURGH",
        "18165" => "VERMILLION",
        "18167" => "VIGO",
        "18169" => "WABASH",
        "18171" => "WARREN",
        "18173" => "WARRICK",
        "18175" => "WASHINGTON",
        "18177" => "WAYNE",
        "18179" => "WELLS",
        "18181" => "WHITE",
        "18183" => "WHITLEY",
        _ => return None,
    };
    Some(County::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"GEO_ID": "0500000US18097", "STATE": "18", "NAME": "Marion"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-86.3, 39.6], [-85.9, 39.6], [-85.9, 40.0], [-86.3, 40.0], [-86.3, 39.6]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"GEO_ID": "0500000US17031", "STATE": "17", "NAME": "Cook"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-88.3, 41.5], [-87.5, 41.5], [-87.5, 42.2], [-88.3, 42.2], [-88.3, 41.5]]]
                }
            }
        ]
    }"#;

    #[test]
    fn keeps_indiana_features_only() {
        let boundaries = parse_county_boundaries(SAMPLE).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].county, County::new("MARION"));
        let (min_x, min_y, max_x, max_y) = boundaries[0].bbox().unwrap();
        assert_eq!((min_x, min_y, max_x, max_y), (-86.3, 39.6, -85.9, 40.0));
    }

    #[test]
    fn empty_payload_is_an_error() {
        let empty = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(
            parse_county_boundaries(empty),
            Err(FetchError::Empty)
        ));
    }

    #[test]
    fn garbage_payload_is_an_error() {
        assert!(matches!(
            parse_county_boundaries("not geojson"),
            Err(FetchError::GeoJson(_))
        ));
    }

    #[test]
    fn fips_table_covers_all_92_counties() {
        let count = (1..=183)
            .step_by(2)
            .filter(|n| county_for_fips(&format!("18{:03}", n)).is_some())
            .count();
        assert_eq!(count, 92);
    }

    #[test]
    fn fips_assignments_around_st_joseph() {
        // St. Joseph precedes Scott in the Census assignment order
        assert_eq!(county_for_fips("18141"), Some(County::new("ST_JOSEPH")));
        assert_eq!(county_for_fips("18143"), Some(County::new("SCOTT")));
        assert_eq!(county_for_fips("18147"), Some(County::new("SPENCER")));
    }
}
