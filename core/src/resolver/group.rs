//! Expansion of named dynamic groups.
//!
//! Group counts per request are small, so resolution is one sequential
//! backend call per group with no fan-out.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use hostdir_common::inventory::client::{InventoryClient, ScopeMapper};
use hostdir_common::inventory::group::DynamicGroup;
use hostdir_common::inventory::host::HostRecord;

pub struct DynamicGroupResolver {
    inventory: Arc<dyn InventoryClient>,
    scope: Arc<dyn ScopeMapper>,
}

impl DynamicGroupResolver {
    pub fn new(inventory: Arc<dyn InventoryClient>, scope: Arc<dyn ScopeMapper>) -> Self {
        Self { inventory, scope }
    }

    /// Resolves each group to its member hosts, keyed by group identity.
    ///
    /// A group without members maps to an empty list, never to a missing
    /// entry. Backend failure aborts the whole call: group membership is
    /// host identity, not decoration.
    pub async fn resolve(
        &self,
        app_id: i64,
        groups: &HashSet<DynamicGroup>,
    ) -> anyhow::Result<HashMap<DynamicGroup, Vec<HostRecord>>> {
        let mut result = HashMap::with_capacity(groups.len());
        for group in groups {
            let hosts = self.hosts_by_group(app_id, &group.group_id).await?;
            result.insert(group.clone(), hosts);
        }
        Ok(result)
    }

    /// Member hosts of a single group.
    ///
    /// Members with a missing or empty cloud area reference are dropped
    /// with a warning; malformed upstream data must not abort the group.
    pub async fn hosts_by_group(
        &self,
        app_id: i64,
        group_id: &str,
    ) -> anyhow::Result<Vec<HostRecord>> {
        let biz_id = self.scope.scope_for_app(app_id).biz_id;
        let members = self.inventory.dynamic_group_members(biz_id, group_id).await?;

        let mut hosts: Vec<HostRecord> = Vec::with_capacity(members.len());
        for member in members {
            match member.into_record() {
                Ok(host) => hosts.push(host),
                Err(e) => {
                    warn!(
                        "Dropping malformed member of dynamic group {group_id} (appId={app_id}): {e}"
                    );
                }
            }
        }
        debug!(
            "Resolved dynamic group {group_id} (appId={app_id}) to {} hosts",
            hosts.len()
        );
        Ok(hosts)
    }
}
