// src/models/location.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::utils::constants::INTERNAL_SOURCE;

/// Coarse category of a pickup/drop-off point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Airport,
    Downtown,
    Port,
    Train,
    #[default]
    #[serde(other)]
    Unknown,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Airport => "airport",
            LocationType::Downtown => "downtown",
            LocationType::Port => "port",
            LocationType::Train => "train",
            LocationType::Unknown => "unknown",
        }
    }

    /// Display form used when a bare city name is expanded ("Dubai" -> "Dubai Airport").
    pub fn title(&self) -> &'static str {
        match self {
            LocationType::Airport => "Airport",
            LocationType::Downtown => "Downtown",
            LocationType::Port => "Port",
            LocationType::Train => "Train",
            LocationType::Unknown => "Unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, LocationType::Unknown)
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One listing from one supplier, or from the internal catalog.
///
/// Supplier clients emit the name under `label`; both spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    pub id: String,
    pub source: String,
    #[serde(alias = "label", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub below_label: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub provider_location_id: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
}

impl RawLocation {
    pub fn new(id: impl Into<String>, source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_provider_location_id(mut self, provider_location_id: impl Into<String>) -> Self {
        self.provider_location_id = Some(provider_location_id.into());
        self
    }

    pub fn with_location_type(mut self, location_type: LocationType) -> Self {
        self.location_type = Some(location_type);
        self
    }

    pub fn is_internal(&self) -> bool {
        self.source == INTERNAL_SOURCE
    }

    pub fn city_str(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }

    pub fn country_str(&self) -> &str {
        self.country.as_deref().unwrap_or("")
    }

    /// Both coordinates present and non-zero. Suppliers send `0` for "unknown".
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Where a unified location can be booked with a given supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMapping {
    pub provider: String,
    pub pickup_id: String,
    pub original_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedLocation {
    pub unified_location_id: u32,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub location_type: LocationType,
    #[serde(default)]
    pub providers: Vec<ProviderMapping>,
    #[serde(default)]
    pub our_location_id: Option<String>,
}

impl UnifiedLocation {
    pub fn provider_entry(&self, provider: &str, pickup_id: &str) -> Option<&ProviderMapping> {
        self.providers
            .iter()
            .find(|p| p.provider == provider && p.pickup_id == pickup_id)
    }
}

/// The full output of one aggregation run. Read-only once built; a new run
/// produces a new set that replaces the previous one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSet {
    locations: Vec<UnifiedLocation>,
}

impl CanonicalSet {
    pub fn new(locations: Vec<UnifiedLocation>) -> Self {
        Self { locations }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnifiedLocation> {
        self.locations.iter()
    }

    pub fn as_slice(&self) -> &[UnifiedLocation] {
        &self.locations
    }

    pub fn into_inner(self) -> Vec<UnifiedLocation> {
        self.locations
    }
}

impl<'a> IntoIterator for &'a CanonicalSet {
    type Item = &'a UnifiedLocation;
    type IntoIter = std::slice::Iter<'a, UnifiedLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_location_accepts_label_alias_and_ignores_extra_fields() {
        let json = r#"{
            "id": "greenmotion_359",
            "source": "greenmotion",
            "label": "Fiumicino Airport",
            "below_label": "Rome, Lazio",
            "location": "Fiumicino Airport",
            "matched_field": "location",
            "city": "Rome",
            "country": "Italy",
            "latitude": 41.8015,
            "longitude": 12.239,
            "provider_location_id": "359"
        }"#;
        let raw: RawLocation = serde_json::from_str(json).unwrap();
        assert_eq!(raw.name, "Fiumicino Airport");
        assert_eq!(raw.provider_location_id.as_deref(), Some("359"));
        assert_eq!(raw.coordinates(), Some((41.8015, 12.239)));
        assert!(!raw.is_internal());
    }

    #[test]
    fn test_null_label_reads_as_empty_name() {
        let raw: RawLocation = serde_json::from_str(
            r#"{"id": "usave_12", "source": "usave", "label": null, "city": "Nice"}"#,
        )
        .unwrap();
        assert_eq!(raw.name, "");
        assert_eq!(raw.city.as_deref(), Some("Nice"));

        let missing: RawLocation =
            serde_json::from_str(r#"{"id": "usave_13", "source": "usave"}"#).unwrap();
        assert_eq!(missing.name, "");
    }

    #[test]
    fn test_zero_coordinates_count_as_missing() {
        let raw = RawLocation::new("internal_1", "internal", "Rome").with_coordinates(0.0, 12.5);
        assert!(raw.coordinates().is_none());
        assert!(raw.is_internal());
    }

    #[test]
    fn test_unrecognized_location_type_falls_back_to_unknown() {
        let raw: RawLocation = serde_json::from_str(
            r#"{"id": "x", "source": "usave", "name": "Hotel Desk", "location_type": "hotel"}"#,
        )
        .unwrap();
        assert_eq!(raw.location_type, Some(LocationType::Unknown));
    }

    #[test]
    fn test_unified_location_serializes_lowercase_type() {
        let unified = UnifiedLocation {
            unified_location_id: 42,
            name: "Dubai Airport".to_string(),
            aliases: vec![],
            city: Some("Dubai".to_string()),
            country: None,
            latitude: 25.2532,
            longitude: 55.3657,
            location_type: LocationType::Airport,
            providers: vec![],
            our_location_id: None,
        };
        let value = serde_json::to_value(&unified).unwrap();
        assert_eq!(value["location_type"], "airport");
        assert!(value["our_location_id"].is_null());
    }
}
