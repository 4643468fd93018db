use thiserror::Error;

/// Validation failures for individual records returned by the inventory
/// backend.
///
/// A malformed record is dropped with a warning by its consumer; it never
/// aborts the surrounding batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record carries neither an IPv4 nor an IPv6 address.
    #[error("host {host_id:?} has no usable address")]
    MissingAddress { host_id: Option<i64> },

    /// The record's cloud area reference list is missing or empty.
    #[error("host {host_id} has no cloud area reference")]
    MissingCloudArea { host_id: i64 },
}
