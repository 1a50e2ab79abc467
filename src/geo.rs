//! Geographic locations and the great-circle distance metric.
//!
//! Locations are addressed by their position in a [`LocationSet`]; every
//! solver works on these stable indices and only maps back to names when
//! producing results.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TspError};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points given in degrees.
///
/// Uses the haversine formula. The intermediate term is clamped into
/// `[0, 1]` so rounding near coincident or antipodal points never leaves the
/// domain of `asin`/`sqrt`. Longitudes are normalised first: `180` and
/// `-180` name the same meridian, and longitude is ignored at either pole.
///
/// # Examples
///
/// ```
/// use u_tsp::geo::haversine_km;
///
/// let d = haversine_km(48.8566, 2.3522, 45.7640, 4.8357); // Paris -> Lyon
/// assert!((d - 391.5).abs() < 0.5);
/// assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lon1 = canonical_longitude(lat1, lon1);
    let lon2 = canonical_longitude(lat2, lon2);
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let sin_phi = (d_phi / 2.0).sin();
    let sin_lambda = (d_lambda / 2.0).sin();
    let a = sin_phi * sin_phi + phi1.cos() * phi2.cos() * sin_lambda * sin_lambda;
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Longitude in `[-180, 180)`, or `0` at a pole.
fn canonical_longitude(lat: f64, lon: f64) -> f64 {
    if lat.abs() == 90.0 {
        0.0
    } else if (-180.0..180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// A named point on the globe, coordinates in degrees.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Location) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    fn validate(&self) -> Result<()> {
        let lat_ok = (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(TspError::InvalidCoordinate {
                name: self.name.clone(),
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Ordered, read-only collection of uniquely named locations.
///
/// Construction rejects duplicate names and out-of-range coordinates, so
/// every index in `0..len()` resolves to exactly one location.
#[derive(Debug, Clone)]
pub struct LocationSet {
    locations: Vec<Location>,
    by_name: HashMap<String, usize>,
}

impl LocationSet {
    /// Builds a set, failing on duplicate names or invalid coordinates.
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(locations.len());
        for (idx, loc) in locations.iter().enumerate() {
            loc.validate()?;
            if by_name.insert(loc.name.clone(), idx).is_some() {
                return Err(TspError::DuplicateLocation(loc.name.clone()));
            }
        }
        Ok(Self { locations, by_name })
    }

    /// Builds a set keeping only the first record for each name.
    pub fn deduplicated(locations: Vec<Location>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(locations.len());
        let mut kept = Vec::with_capacity(locations.len());
        for loc in locations {
            if !seen.insert(loc.name.clone()) {
                log::warn!("dropping duplicate location {}", loc.name);
                continue;
            }
            kept.push(loc);
        }
        Self::new(kept)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    /// Index of the location called `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TspError::UnknownLocation(name.to_string()))
    }

    /// Name of the location at `index`.
    pub fn name_of(&self, index: usize) -> Result<&str> {
        self.locations
            .get(index)
            .map(|loc| loc.name.as_str())
            .ok_or_else(|| TspError::UnknownLocation(format!("#{index}")))
    }

    /// Distance between the locations at indices `a` and `b`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.locations[a].distance_to(&self.locations[b])
    }

    /// Maps a sequence of indices to location names.
    pub fn names(&self, order: &[usize]) -> Result<Vec<String>> {
        order
            .iter()
            .map(|&idx| self.name_of(idx).map(str::to_string))
            .collect()
    }

    /// Fails with `InsufficientLocations` unless at least two locations exist.
    pub fn ensure_solvable(&self) -> Result<()> {
        if self.len() < 2 {
            return Err(TspError::InsufficientLocations { found: self.len() });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}
