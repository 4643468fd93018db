#![cfg(test)]
//! End-to-end resolution through [`HostDirectory`] against the stub
//! backend: fan-out behavior, dynamic groups, and direct host lookups.

use std::collections::{HashMap, HashSet};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use hostdir_common::config::DirectoryConfig;
use hostdir_common::inventory::group::{DynamicGroup, GroupMember};
use hostdir_common::inventory::host::{HostRecord, HostRef};
use hostdir_common::inventory::topology::TopologyNode;
use hostdir_core::directory::HostDirectory;

use crate::stub::{OffsetScope, StubInventory, host, init_test_logging};

fn directory_over(stub: Arc<StubInventory>) -> HostDirectory {
    HostDirectory::new(stub, Arc::new(OffsetScope), DirectoryConfig::default())
}

fn module_nodes(count: i64) -> HashSet<TopologyNode> {
    (1..=count)
        .map(|id| TopologyNode::new("module", id))
        .collect()
}

#[tokio::test]
async fn twelve_nodes_with_one_failing_node_still_yield_twelve_entries() {
    init_test_logging();
    let mut stub = StubInventory::with_module_nodes(1..=12);
    stub.failing_nodes.insert(7);
    let stub = Arc::new(stub);
    let directory = directory_over(Arc::clone(&stub));

    let requested = module_nodes(12);
    let resolved = directory.resolve_topology_nodes(1, &requested).await;

    assert_eq!(resolved.len(), 12);
    for node in &requested {
        let hosts = resolved
            .get(node)
            .unwrap_or_else(|| panic!("node {} missing from result", node.node_id));
        if node.node_id == 7 {
            assert!(hosts.is_empty(), "failing node must degrade to empty");
        } else {
            assert_eq!(hosts.len(), 1, "node {} should resolve", node.node_id);
        }
    }
    assert_eq!(stub.topology_calls.load(Ordering::SeqCst), 12);
}

#[tokio::test]
async fn fan_out_result_is_keyed_by_node_not_completion_order() {
    let mut stub = StubInventory::with_module_nodes(1..=10);
    // Early nodes finish last.
    for node_id in 1..=10 {
        stub.node_delays.insert(
            node_id,
            Duration::from_millis((11 - node_id) as u64 * 10),
        );
    }
    let stub = Arc::new(stub);
    let directory = directory_over(stub);

    let requested = module_nodes(10);
    let resolved = directory.resolve_topology_nodes(1, &requested).await;

    let resolved_keys: HashSet<TopologyNode> = resolved.keys().cloned().collect();
    assert_eq!(resolved_keys, requested);
    for (node, hosts) in &resolved {
        assert_eq!(
            hosts[0].host_id,
            Some(node.node_id * 10),
            "hosts must stay attached to their own node"
        );
    }
}

#[tokio::test]
async fn small_batches_resolve_without_fan_out() {
    let stub = Arc::new(StubInventory::with_module_nodes(1..=3));
    let directory = directory_over(Arc::clone(&stub));

    let resolved = directory.resolve_topology_nodes(1, &module_nodes(3)).await;

    assert_eq!(resolved.len(), 3);
    assert_eq!(stub.topology_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn slow_node_times_out_to_an_empty_entry() {
    init_test_logging();
    let mut stub = StubInventory::with_module_nodes(1..=2);
    stub.node_delays.insert(2, Duration::from_millis(200));
    let config = DirectoryConfig {
        task_timeout: Duration::from_millis(50),
        ..DirectoryConfig::default()
    };
    let directory = HostDirectory::new(Arc::new(stub), Arc::new(OffsetScope), config);

    let resolved = directory.resolve_topology_nodes(1, &module_nodes(2)).await;

    assert_eq!(resolved[&TopologyNode::new("module", 1)].len(), 1);
    assert!(
        resolved[&TopologyNode::new("module", 2)].is_empty(),
        "timed-out node must degrade to an empty list"
    );
}

#[tokio::test]
async fn empty_dynamic_group_maps_to_empty_list_not_absence() {
    let stub = Arc::new(StubInventory::default());
    let directory = directory_over(stub);

    let groups: HashSet<DynamicGroup> = [DynamicGroup::new("canary")].into_iter().collect();
    let resolved = directory.resolve_dynamic_groups(4, &groups).await.unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[&DynamicGroup::new("canary")], Vec::<HostRecord>::new());
}

#[tokio::test]
async fn malformed_group_members_are_skipped() {
    init_test_logging();
    let mut stub = StubInventory::default();
    stub.group_members.insert(
        "web".to_string(),
        vec![
            GroupMember {
                host_id: 1,
                cloud_ids: vec![2],
                first_ip: Some(Ipv4Addr::new(10, 0, 0, 1)),
                ipv6: None,
                agent_id: None,
            },
            GroupMember {
                host_id: 2,
                cloud_ids: vec![],
                first_ip: Some(Ipv4Addr::new(10, 0, 0, 2)),
                ipv6: None,
                agent_id: None,
            },
        ],
    );
    let directory = directory_over(Arc::new(stub));

    let hosts = directory.hosts_by_group(4, "web").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].host_id, Some(1));
    assert_eq!(hosts[0].cloud_area_id, 2);
}

#[tokio::test]
async fn batch_get_hosts_is_keyed_by_cloud_and_ipv4() {
    let mut stub = StubInventory::default();
    stub.hosts = vec![host(1, 3, [10, 1, 0, 1]), host(2, 3, [10, 1, 0, 2])];
    let directory = directory_over(Arc::new(stub));

    let wanted = [
        HostRef::new(3, Ipv4Addr::new(10, 1, 0, 1)),
        HostRef::new(3, Ipv4Addr::new(10, 1, 0, 2)),
    ];
    let found: HashMap<HostRef, HostRecord> = directory.batch_get_hosts(&wanted).await.unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[&wanted[0]].host_id, Some(1));
    assert_eq!(found[&wanted[1]].host_id, Some(2));
}

#[tokio::test]
async fn batch_get_hosts_propagates_backend_failure() {
    let mut stub = StubInventory::default();
    stub.fail_batch_hosts = true;
    let directory = directory_over(Arc::new(stub));

    let wanted = [HostRef::new(3, Ipv4Addr::new(10, 1, 0, 1))];
    assert!(directory.batch_get_hosts(&wanted).await.is_err());
}

#[tokio::test]
async fn get_host_returns_none_when_backend_has_no_match() {
    let directory = directory_over(Arc::new(StubInventory::default()));

    let missing = HostRef::new(3, Ipv4Addr::new(10, 9, 9, 9));
    let found = directory.get_host(&missing).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn ambiguous_ipv6_lookup_returns_the_first_match() {
    init_test_logging();
    let ipv6: Ipv6Addr = "fd00::15".parse().unwrap();
    let mut first = host(1, 5, [10, 5, 0, 1]);
    first.ipv6 = Some(ipv6);
    let mut second = host(2, 5, [10, 5, 0, 2]);
    second.ipv6 = Some(ipv6);

    let mut stub = StubInventory::default();
    stub.hosts = vec![first, second];
    let directory = directory_over(Arc::new(stub));

    let found = directory.get_host_by_cloud_ipv6(5, &ipv6).await.unwrap();

    assert_eq!(found.map(|h| h.host_id), Some(Some(1)));
}
