//! Fan-out expansion of topology nodes.
//!
//! Each node is resolved with its own inventory call. Small batches stay
//! on the caller's task; large batches are dispatched one task per node
//! onto a bounded worker pool and reassembled by node identity, since
//! completion order is non-deterministic under concurrent execution.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use hostdir_common::config::DirectoryConfig;
use hostdir_common::inventory::client::{InventoryClient, ScopeMapper};
use hostdir_common::inventory::host::HostRecord;
use hostdir_common::inventory::topology::TopologyNode;

pub struct TopologyResolver {
    inventory: Arc<dyn InventoryClient>,
    scope: Arc<dyn ScopeMapper>,
    workers: Arc<Semaphore>,
    fan_out_threshold: usize,
    task_timeout: Duration,
}

impl TopologyResolver {
    pub fn new(
        inventory: Arc<dyn InventoryClient>,
        scope: Arc<dyn ScopeMapper>,
        config: &DirectoryConfig,
    ) -> Self {
        Self {
            inventory,
            scope,
            workers: Arc::new(Semaphore::new(config.worker_capacity)),
            fan_out_threshold: config.fan_out_threshold,
            task_timeout: config.task_timeout,
        }
    }

    /// Resolves every node to its member hosts, keyed by node identity.
    ///
    /// Infallible by contract: a node whose resolution fails or times out
    /// is logged and mapped to an empty list, so the result carries an
    /// entry for every requested node.
    pub async fn resolve(
        &self,
        app_id: i64,
        nodes: &HashSet<TopologyNode>,
    ) -> HashMap<TopologyNode, Vec<HostRecord>> {
        if nodes.is_empty() {
            return HashMap::new();
        }

        let biz_id = self.scope.scope_for_app(app_id).biz_id;
        if nodes.len() < self.fan_out_threshold {
            self.resolve_sequential(biz_id, nodes).await
        } else {
            self.resolve_concurrent(biz_id, nodes).await
        }
    }

    async fn resolve_sequential(
        &self,
        biz_id: i64,
        nodes: &HashSet<TopologyNode>,
    ) -> HashMap<TopologyNode, Vec<HostRecord>> {
        let mut result = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let hosts =
                fetch_node_hosts(self.inventory.as_ref(), biz_id, node, self.task_timeout).await;
            result.insert(node.clone(), hosts);
        }
        result
    }

    async fn resolve_concurrent(
        &self,
        biz_id: i64,
        nodes: &HashSet<TopologyNode>,
    ) -> HashMap<TopologyNode, Vec<HostRecord>> {
        let mut tasks: JoinSet<(TopologyNode, Vec<HostRecord>)> = JoinSet::new();
        for node in nodes {
            let inventory = Arc::clone(&self.inventory);
            let workers = Arc::clone(&self.workers);
            let node = node.clone();
            let task_timeout = self.task_timeout;
            tasks.spawn(async move {
                let Ok(_permit) = workers.acquire_owned().await else {
                    return (node, Vec::new());
                };
                let hosts =
                    fetch_node_hosts(inventory.as_ref(), biz_id, &node, task_timeout).await;
                (node, hosts)
            });
        }

        let mut result = HashMap::with_capacity(nodes.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((node, hosts)) => {
                    result.insert(node, hosts);
                }
                Err(e) => warn!("Topology resolution task lost: {e}"),
            }
        }

        // A lost task leaves its node unresolved; back-fill so every
        // requested node still gets an entry.
        for node in nodes {
            if !result.contains_key(node) {
                warn!(
                    "No result for topology node {}#{}, returning empty host list",
                    node.node_type, node.node_id
                );
                result.insert(node.clone(), Vec::new());
            }
        }
        result
    }
}

/// Resolves a single node, degrading every failure mode to an empty list.
async fn fetch_node_hosts(
    inventory: &dyn InventoryClient,
    biz_id: i64,
    node: &TopologyNode,
    task_timeout: Duration,
) -> Vec<HostRecord> {
    let request = std::slice::from_ref(node);
    match timeout(task_timeout, inventory.hosts_by_topology(biz_id, request)).await {
        Ok(Ok(hosts)) => {
            debug!(
                "Resolved topology node {}#{} to {} hosts",
                node.node_type,
                node.node_id,
                hosts.len()
            );
            hosts
        }
        Ok(Err(e)) => {
            warn!(
                "Failed to resolve topology node {}#{}: {e:#}",
                node.node_type, node.node_id
            );
            Vec::new()
        }
        Err(_) => {
            warn!(
                "Resolution of topology node {}#{} timed out after {:?}",
                node.node_type, node.node_id, task_timeout
            );
            Vec::new()
        }
    }
}
