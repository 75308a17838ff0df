//! VVO WebAPI client.
//!
//! HTTP client for the Dresden transport association's public API, which
//! backs stop search, departure monitors, trip planning and line lists.
//!
//! Key characteristics of the API:
//! - Every endpoint is a JSON `POST`; responses use PascalCase keys
//! - Timestamps are `/Date(milliseconds+zone)/` strings
//! - Positions are Gauss-Krüger zone 4 grid values, not WGS84
//! - An empty city field means Dresden

mod client;
mod convert;
mod coords;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, VvoClient, VvoConfig};
pub use convert::{ConversionError, DEFAULT_CITY, parse_point, parse_vvo_date};
pub use coords::gk4_to_wgs84;
pub use error::VvoError;
