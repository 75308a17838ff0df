//! Transport mode descriptors.

use serde::{Deserialize, Serialize};

const ICON_BASE: &str = "https://www.dvb.de/assets/img/trans-icon";

/// Display descriptor for a mode of transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    /// Provider name, e.g. `Tram`.
    pub name: String,
    /// Human-readable title, e.g. `Straßenbahn`.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Modes of transport known to the VVO network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Tram,
    CityBus,
    IntercityBus,
    SuburbanRailway,
    Train,
    Cableway,
    Ferry,
    HailedSharedTaxi,
    Footpath,
    MobilityStairsUp,
    MobilityStairsDown,
    MobilityEscalatorUp,
    MobilityEscalatorDown,
    MobilityElevatorUp,
    MobilityElevatorDown,
}

impl TransportMode {
    /// Parse a provider mode name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        let mode = match name.to_ascii_lowercase().as_str() {
            "tram" => Self::Tram,
            "citybus" | "bus" => Self::CityBus,
            "intercitybus" | "plusbus" => Self::IntercityBus,
            "suburbanrailway" => Self::SuburbanRailway,
            "train" | "rapidtransit" => Self::Train,
            "cableway" => Self::Cableway,
            "ferry" => Self::Ferry,
            "hailedsharedtaxi" => Self::HailedSharedTaxi,
            "footpath" => Self::Footpath,
            "mobilitystairsup" => Self::MobilityStairsUp,
            "mobilitystairsdown" => Self::MobilityStairsDown,
            "mobilityescalatorup" => Self::MobilityEscalatorUp,
            "mobilityescalatordown" => Self::MobilityEscalatorDown,
            "mobilityelevatorup" => Self::MobilityElevatorUp,
            "mobilityelevatordown" => Self::MobilityElevatorDown,
            _ => return None,
        };
        Some(mode)
    }

    /// Canonical provider name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tram => "Tram",
            Self::CityBus => "CityBus",
            Self::IntercityBus => "IntercityBus",
            Self::SuburbanRailway => "SuburbanRailway",
            Self::Train => "Train",
            Self::Cableway => "Cableway",
            Self::Ferry => "Ferry",
            Self::HailedSharedTaxi => "HailedSharedTaxi",
            Self::Footpath => "Footpath",
            Self::MobilityStairsUp => "MobilityStairsUp",
            Self::MobilityStairsDown => "MobilityStairsDown",
            Self::MobilityEscalatorUp => "MobilityEscalatorUp",
            Self::MobilityEscalatorDown => "MobilityEscalatorDown",
            Self::MobilityElevatorUp => "MobilityElevatorUp",
            Self::MobilityElevatorDown => "MobilityElevatorDown",
        }
    }

    /// German display title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Tram => "Straßenbahn",
            Self::CityBus => "Bus",
            Self::IntercityBus => "Regionalbus",
            Self::SuburbanRailway => "S-Bahn",
            Self::Train => "Zug",
            Self::Cableway => "Seil-/Schwebebahn",
            Self::Ferry => "Fähre",
            Self::HailedSharedTaxi => "Anrufsammeltaxi (AST)/ Rufbus",
            Self::Footpath => "Fussweg",
            Self::MobilityStairsUp => "Treppe aufwärts",
            Self::MobilityStairsDown => "Treppe abwärts",
            Self::MobilityEscalatorUp => "Rolltreppe aufwärts",
            Self::MobilityEscalatorDown => "Rolltreppe abwärts",
            Self::MobilityElevatorUp => "Fahrstuhl aufwärts",
            Self::MobilityElevatorDown => "Fahrstuhl abwärts",
        }
    }

    fn icon_file(self) -> Option<&'static str> {
        match self {
            Self::Tram => Some("transport-tram.svg"),
            Self::CityBus | Self::IntercityBus => Some("transport-bus.svg"),
            Self::SuburbanRailway => Some("transport-metropolitan.svg"),
            Self::Train => Some("transport-train.svg"),
            Self::Cableway => Some("transport-lift.svg"),
            Self::Ferry => Some("transport-ferry.svg"),
            Self::HailedSharedTaxi => Some("transport-alita.svg"),
            _ => None,
        }
    }

    /// Build the display descriptor.
    pub fn descriptor(self) -> Mode {
        Mode {
            name: self.name().to_string(),
            title: self.title().to_string(),
            icon_url: self.icon_file().map(|f| format!("{ICON_BASE}/{f}")),
        }
    }
}

/// Build a mode descriptor from a provider name.
///
/// Unknown names keep the raw name as title and carry no icon.
pub fn mode_from_name(name: &str) -> Option<Mode> {
    if name.is_empty() {
        return None;
    }
    Some(match TransportMode::parse(name) {
        Some(mode) => mode.descriptor(),
        None => Mode {
            name: name.to_string(),
            title: name.to_string(),
            icon_url: None,
        },
    })
}
