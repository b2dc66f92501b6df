//! FuelTrack web application: configuration and HTTP surface.
//!
//! Domain logic lives in `fueltrack_core`; this crate wires it to axum.

pub mod config;
pub mod server;
