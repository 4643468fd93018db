//! # Host Directory
//!
//! The public entry point for host resolution.
//!
//! Orchestrates the resolution process by:
//! 1. delegating descriptor expansion to the resolvers.
//! 2. answering direct host lookups straight from the inventory backend.
//! 3. decorating results with cloud area names through the loading cache.
//!
//! Identity-critical lookups (`batch_get_hosts` and friends) propagate
//! backend failures; decorative ones (cloud area names) degrade to the
//! "Unknown" placeholder instead.

use std::collections::{HashMap, HashSet};
use std::net::Ipv6Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use hostdir_common::config::DirectoryConfig;
use hostdir_common::inventory::client::{InventoryClient, ScopeMapper};
use hostdir_common::inventory::group::DynamicGroup;
use hostdir_common::inventory::host::{HostRecord, HostRef};
use hostdir_common::inventory::topology::TopologyNode;

use crate::cache::CacheStats;
use crate::cache::cloud_area::{self, CloudAreaNameCache, UNKNOWN_CLOUD_AREA_NAME};
use crate::resolver::group::DynamicGroupResolver;
use crate::resolver::topology::TopologyResolver;

pub struct HostDirectory {
    inventory: Arc<dyn InventoryClient>,
    cloud_area_names: CloudAreaNameCache,
    topology: TopologyResolver,
    groups: DynamicGroupResolver,
    slow_lookup_warn: Duration,
}

impl HostDirectory {
    pub fn new(
        inventory: Arc<dyn InventoryClient>,
        scope: Arc<dyn ScopeMapper>,
        config: DirectoryConfig,
    ) -> Self {
        let cloud_area_names = cloud_area::cloud_area_name_cache(Arc::clone(&inventory), &config);
        let topology = TopologyResolver::new(Arc::clone(&inventory), Arc::clone(&scope), &config);
        let groups = DynamicGroupResolver::new(Arc::clone(&inventory), scope);
        Self {
            inventory,
            cloud_area_names,
            topology,
            groups,
            slow_lookup_warn: config.slow_lookup_warn,
        }
    }

    /// Batch host lookup keyed by `(cloud area, IPv4)`.
    ///
    /// Propagates backend failure: host identity is correctness-critical
    /// and is never degraded. Records the backend returns without an IPv4
    /// cannot be keyed and are dropped with a warning.
    pub async fn batch_get_hosts(
        &self,
        refs: &[HostRef],
    ) -> anyhow::Result<HashMap<HostRef, HostRecord>> {
        let hosts = self.inventory.batch_get_hosts(refs).await?;
        let mut by_ref = HashMap::with_capacity(hosts.len());
        for host in hosts {
            match host.host_ref() {
                Some(key) => {
                    by_ref.insert(key, host);
                }
                None => warn!(
                    "Dropping host {:?} without IPv4 from batch lookup result",
                    host.host_id
                ),
            }
        }
        Ok(by_ref)
    }

    /// Single host lookup. `Ok(None)` when the backend has no match.
    pub async fn get_host(&self, host: &HostRef) -> anyhow::Result<Option<HostRecord>> {
        let hosts = self
            .inventory
            .batch_get_hosts(std::slice::from_ref(host))
            .await?;
        Ok(hosts.into_iter().next())
    }

    /// Host lookup by `(cloud area, IPv6)`.
    ///
    /// More than one match is an upstream data-quality anomaly: the first
    /// record wins and the ambiguity is logged, never raised.
    pub async fn get_host_by_cloud_ipv6(
        &self,
        cloud_area_id: i64,
        ipv6: &Ipv6Addr,
    ) -> anyhow::Result<Option<HostRecord>> {
        let hosts = self.inventory.hosts_by_cloud_ipv6(cloud_area_id, ipv6).await?;
        if hosts.is_empty() {
            warn!("No host found for (cloudAreaId={cloud_area_id}, ipv6={ipv6})");
            return Ok(None);
        }
        if hosts.len() > 1 {
            warn!(
                "Found {} hosts for (cloudAreaId={cloud_area_id}, ipv6={ipv6}), using the first",
                hosts.len()
            );
        }
        Ok(hosts.into_iter().next())
    }

    /// Display names for a set of cloud area ids.
    ///
    /// Never fails: on a backend error every requested id maps to the
    /// "Unknown" placeholder. Names are decorative metadata, not host
    /// identity.
    pub async fn batch_get_cloud_area_names(
        &self,
        cloud_area_ids: &HashSet<i64>,
    ) -> HashMap<i64, String> {
        if cloud_area_ids.is_empty() {
            return HashMap::new();
        }

        let started = Instant::now();
        match self.cloud_area_names.get_all(cloud_area_ids).await {
            Ok(names) => {
                let elapsed = started.elapsed();
                if elapsed > self.slow_lookup_warn {
                    warn!("Batch cloud area name lookup slow: {elapsed:?}");
                }
                names
            }
            Err(e) => {
                warn!("Failed to get cloud area names, degrading to placeholder: {e:#}");
                cloud_area_ids
                    .iter()
                    .map(|id| (*id, UNKNOWN_CLOUD_AREA_NAME.to_string()))
                    .collect()
            }
        }
    }

    /// Expands topology nodes to their member hosts.
    ///
    /// Every requested node is present in the result; see
    /// [`TopologyResolver::resolve`] for the degradation rules.
    pub async fn resolve_topology_nodes(
        &self,
        app_id: i64,
        nodes: &HashSet<TopologyNode>,
    ) -> HashMap<TopologyNode, Vec<HostRecord>> {
        self.topology.resolve(app_id, nodes).await
    }

    /// Expands dynamic groups to their member hosts.
    ///
    /// Every requested group is present in the result; memberless groups
    /// map to empty lists.
    pub async fn resolve_dynamic_groups(
        &self,
        app_id: i64,
        groups: &HashSet<DynamicGroup>,
    ) -> anyhow::Result<HashMap<DynamicGroup, Vec<HostRecord>>> {
        if groups.is_empty() {
            return Ok(HashMap::new());
        }
        self.groups.resolve(app_id, groups).await
    }

    /// Member hosts of a single dynamic group.
    pub async fn hosts_by_group(
        &self,
        app_id: i64,
        group_id: &str,
    ) -> anyhow::Result<Vec<HostRecord>> {
        self.groups.hosts_by_group(app_id, group_id).await
    }

    /// Cloud area name cache counters, for a monitoring collaborator.
    pub fn cloud_area_cache_stats(&self) -> CacheStats {
        self.cloud_area_names.stats()
    }
}
