//! Tabular location input.
//!
//! Reads CSV with a header row naming the columns `name`, `latitude` and
//! `longitude`. The capitalised headers `Ville`, `Latitude` and `Longitude`
//! are accepted as well. Extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::Result;
use crate::geo::{Location, LocationSet};

#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(alias = "Ville", alias = "Name")]
    name: String,
    #[serde(alias = "Latitude")]
    latitude: f64,
    #[serde(alias = "Longitude")]
    longitude: f64,
}

/// Reads a [`LocationSet`] from CSV.
///
/// # Errors
/// `Csv` for malformed rows or missing columns, `DuplicateLocation` for
/// repeated names, `InvalidCoordinate` for out-of-range coordinates.
///
/// ```
/// let data = "Ville,Latitude,Longitude\nParis,48.8566,2.3522\nLyon,45.7640,4.8357\n";
/// let cities = u_tsp::io::read_locations(data.as_bytes()).unwrap();
/// assert_eq!(cities.len(), 2);
/// assert_eq!(cities.name_of(1).unwrap(), "Lyon");
/// ```
pub fn read_locations<R: Read>(reader: R) -> Result<LocationSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut locations = Vec::new();
    for record in rdr.deserialize() {
        let record: LocationRecord = record?;
        locations.push(Location::new(record.name, record.latitude, record.longitude));
    }
    debug!("io: read {} locations", locations.len());

    LocationSet::new(locations)
}

/// Reads a [`LocationSet`] from a CSV file.
pub fn read_locations_from_path(path: impl AsRef<Path>) -> Result<LocationSet> {
    let file = File::open(path)?;
    read_locations(file)
}
