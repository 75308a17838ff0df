//! Domain types for the transit dashboard.
//!
//! These are the shapes passed between the transit data provider, the
//! rankers and the persistence layer. They serialize to the camelCase JSON
//! the browser front-end and the stored lists use.

mod departure;
mod history;
mod line;
mod mode;
mod stop;
mod trip;

pub use departure::{Departure, DepartureBoard, DepartureState, Diva, Platform, RankedDeparture};
pub use history::RouteHistoryEntry;
pub use line::{Line, LineHistory, LineStop};
pub use mode::{Mode, TransportMode, mode_from_name};
pub use stop::{Coords, Stop, StopCategory};
pub use trip::{Location, Node, NodeEndpoint, NodeStop, RouteResult, Trip, TripEndpoint};
