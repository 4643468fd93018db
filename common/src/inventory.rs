//! # Inventory Domain Model
//!
//! Types describing what the inventory backend knows about the fleet:
//! * Concrete host records and their lookup keys.
//! * Cloud areas (network/location segments).
//! * Abstract target descriptors: topology nodes and dynamic groups.
//! * The outbound port traits the backend is reached through.

pub mod client;
pub mod cloud;
pub mod group;
pub mod host;
pub mod topology;
