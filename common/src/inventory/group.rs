use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::RecordError;
use crate::inventory::host::HostRecord;

/// A named, criteria-defined host grouping maintained by the backend.
///
/// Pure map key: identity is the group id, never the resolved membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicGroup {
    pub group_id: String,
}

impl DynamicGroup {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }
}

/// Raw membership record as the backend reports it.
///
/// The cloud area arrives as a reference list of which only the first
/// entry is meaningful; records without one are malformed upstream data.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub host_id: i64,
    pub cloud_ids: Vec<i64>,
    pub first_ip: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
    pub agent_id: Option<String>,
}

impl GroupMember {
    /// Converts the raw record into a [`HostRecord`], rejecting records
    /// with no cloud area reference or no usable address.
    pub fn into_record(self) -> Result<HostRecord, RecordError> {
        let Some(cloud_area_id) = self.cloud_ids.first().copied() else {
            return Err(RecordError::MissingCloudArea {
                host_id: self.host_id,
            });
        };
        HostRecord::from_parts(
            Some(self.host_id),
            cloud_area_id,
            self.first_ip,
            self.ipv6,
            self.agent_id,
        )
    }
}
