//! Transit dashboard server.
//!
//! Ranks stop searches, departure boards and route plans from the Dresden
//! VVO API, reconstructs the stops of a departure's line, and keeps bounded
//! favorites and histories.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod persist;
pub mod provider;
pub mod rank;
pub mod session;
pub mod vvo;
pub mod web;
