//! Resolution of abstract target descriptors into concrete host lists.
//!
//! Two strategies live here:
//! * [`topology::TopologyResolver`] — expands topology nodes, fanning out
//!   onto a bounded worker pool for large batches.
//! * [`group::DynamicGroupResolver`] — expands named dynamic groups, one
//!   backend call per group.

pub mod group;
pub mod topology;
