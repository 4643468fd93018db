use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::RecordError;

/// A concrete, addressable managed host.
///
/// Records are immutable snapshots once handed to a caller. At least one
/// of `ipv4`/`ipv6` is present; [`HostRecord::from_parts`] refuses to
/// build an addressless record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    /// Backend primary key. Absent while a host is only known by address.
    pub host_id: Option<i64>,
    pub cloud_area_id: i64,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    /// Absent when the host has no reachable agent.
    pub agent_id: Option<String>,
}

impl HostRecord {
    pub fn from_parts(
        host_id: Option<i64>,
        cloud_area_id: i64,
        ipv4: Option<Ipv4Addr>,
        ipv6: Option<Ipv6Addr>,
        agent_id: Option<String>,
    ) -> Result<Self, RecordError> {
        if ipv4.is_none() && ipv6.is_none() {
            return Err(RecordError::MissingAddress { host_id });
        }
        Ok(Self {
            host_id,
            cloud_area_id,
            ipv4,
            ipv6,
            agent_id,
        })
    }

    /// The stable `(cloud area, IPv4)` key, when the record can provide one.
    pub fn host_ref(&self) -> Option<HostRef> {
        self.ipv4.map(|ipv4| HostRef::new(self.cloud_area_id, ipv4))
    }
}

/// Secondary host key: `(cloud area id, IPv4)`.
///
/// Identifies a host when no backend id is known yet, and keys the result
/// maps of batch lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostRef {
    pub cloud_area_id: i64,
    pub ipv4: Ipv4Addr,
}

impl HostRef {
    pub fn new(cloud_area_id: i64, ipv4: Ipv4Addr) -> Self {
        Self {
            cloud_area_id,
            ipv4,
        }
    }
}
