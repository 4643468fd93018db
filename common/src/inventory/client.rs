//! Outbound ports towards the inventory backend.
//!
//! Transport, authentication, and wire formats live behind these traits.
//! The resolution layer only sees the contract: empty/`None` on no-match,
//! `Err` strictly on transport or protocol failure.

use std::net::Ipv6Addr;

use async_trait::async_trait;

use crate::inventory::cloud::CloudArea;
use crate::inventory::group::GroupMember;
use crate::inventory::host::{HostRecord, HostRef};
use crate::inventory::topology::TopologyNode;

#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Looks up a single cloud area. `None` when the id is unknown.
    async fn cloud_area_by_id(&self, cloud_area_id: i64) -> anyhow::Result<Option<CloudArea>>;

    /// Fetches the entire cloud area list.
    ///
    /// The backend's cloud area set is small and enumerable; one call is
    /// cheaper than fanning out per id.
    async fn cloud_area_list(&self) -> anyhow::Result<Vec<CloudArea>>;

    /// Expands topology nodes to their member hosts within a business.
    async fn hosts_by_topology(
        &self,
        biz_id: i64,
        nodes: &[TopologyNode],
    ) -> anyhow::Result<Vec<HostRecord>>;

    /// Raw membership of a dynamic group within a business.
    async fn dynamic_group_members(
        &self,
        biz_id: i64,
        group_id: &str,
    ) -> anyhow::Result<Vec<GroupMember>>;

    /// Resolves `(cloud area, IPv4)` keys to full host records.
    async fn batch_get_hosts(&self, refs: &[HostRef]) -> anyhow::Result<Vec<HostRecord>>;

    /// Hosts matching `(cloud area, IPv6)`.
    ///
    /// More than one match is an upstream data-quality anomaly the caller
    /// has to arbitrate.
    async fn hosts_by_cloud_ipv6(
        &self,
        cloud_area_id: i64,
        ipv6: &Ipv6Addr,
    ) -> anyhow::Result<Vec<HostRecord>>;
}

/// The backend-side business scope an application id maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceScope {
    pub biz_id: i64,
}

/// Translates an internal application id into the backend's business
/// scope. Treated as a pure, fast, non-failing lookup.
pub trait ScopeMapper: Send + Sync {
    fn scope_for_app(&self, app_id: i64) -> ResourceScope;
}
