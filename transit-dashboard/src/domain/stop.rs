//! Stop and coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// WGS84 coordinates, serialized as a `[lon, lat]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    /// Create coordinates from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(lon, lat)
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.0
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.1
    }
}

/// Kind of point returned by a stop search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopCategory {
    Stop,
    Station,
    Address,
    #[serde(rename = "POI")]
    Poi,
    Coords,
}

impl StopCategory {
    /// Parse a provider type tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Stop" => Some(Self::Stop),
            "Station" => Some(Self::Station),
            "Address" => Some(Self::Address),
            "POI" => Some(Self::Poi),
            "Coords" => Some(Self::Coords),
            _ => None,
        }
    }

    /// Ranking priority, lower is preferred.
    ///
    /// Categories without an explicit priority (including a missing one)
    /// rank after all others.
    pub fn priority(category: Option<Self>) -> u8 {
        match category {
            Some(Self::Stop) => 1,
            Some(Self::Station) => 2,
            Some(Self::Address) => 3,
            Some(Self::Poi) => 4,
            Some(Self::Coords) | None => 5,
        }
    }
}

impl fmt::Display for StopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stop => "Stop",
            Self::Station => "Station",
            Self::Address => "Address",
            Self::Poi => "POI",
            Self::Coords => "Coords",
        };
        f.write_str(s)
    }
}

/// A stop (or other point) as returned by the transit data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub city: String,
    pub coords: Coords,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StopCategory>,
}

impl Stop {
    /// Create a stop with no category.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        coords: Coords,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            coords,
            category: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: StopCategory) -> Self {
        self.category = Some(category);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_json_shape() {
        let stop = Stop::new("33000037", "Postplatz", "Dresden", Coords::new(13.73, 51.05))
            .with_category(StopCategory::Stop);

        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["id"], "33000037");
        assert_eq!(json["type"], "Stop");
        assert_eq!(json["coords"][0], 13.73);
        assert_eq!(json["coords"][1], 51.05);
    }

    #[test]
    fn missing_category_is_omitted() {
        let stop = Stop::new("1", "A", "Dresden", Coords::default());
        let json = serde_json::to_string(&stop).unwrap();
        assert!(!json.contains("type"));

        let back: Stop = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category, None);
    }

    #[test]
    fn poi_uses_upper_case_tag() {
        let json = serde_json::to_string(&StopCategory::Poi).unwrap();
        assert_eq!(json, "\"POI\"");
        assert_eq!(StopCategory::parse("POI"), Some(StopCategory::Poi));
        assert_eq!(StopCategory::parse("Platform"), None);
    }

    #[test]
    fn priority_order() {
        assert!(StopCategory::priority(Some(StopCategory::Stop)) < StopCategory::priority(Some(StopCategory::Station)));
        assert!(StopCategory::priority(Some(StopCategory::Station)) < StopCategory::priority(Some(StopCategory::Address)));
        assert!(StopCategory::priority(Some(StopCategory::Address)) < StopCategory::priority(Some(StopCategory::Poi)));
        assert!(StopCategory::priority(Some(StopCategory::Poi)) < StopCategory::priority(None));
        assert_eq!(
            StopCategory::priority(Some(StopCategory::Coords)),
            StopCategory::priority(None)
        );
    }
}
