#![cfg(test)]
//! Cloud area name decoration: caching, bulk loading, and the
//! degrade-to-placeholder policy.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use hostdir_common::config::DirectoryConfig;
use hostdir_common::inventory::cloud::CloudArea;
use hostdir_core::directory::HostDirectory;

use crate::stub::{OffsetScope, StubInventory, init_test_logging};

fn directory_over(stub: Arc<StubInventory>) -> HostDirectory {
    HostDirectory::new(stub, Arc::new(OffsetScope), DirectoryConfig::default())
}

fn two_zones() -> Vec<CloudArea> {
    vec![CloudArea::new(1, "zoneA"), CloudArea::new(2, "zoneB")]
}

#[tokio::test]
async fn unmatched_ids_degrade_to_unknown() {
    let mut stub = StubInventory::default();
    stub.cloud_areas = two_zones();
    let stub = Arc::new(stub);
    let directory = directory_over(Arc::clone(&stub));

    let requested: HashSet<i64> = [1, 2, 3].into_iter().collect();
    let names = directory.batch_get_cloud_area_names(&requested).await;

    let expected: HashMap<i64, String> = HashMap::from([
        (1, "zoneA".to_string()),
        (2, "zoneB".to_string()),
        (3, "Unknown".to_string()),
    ]);
    assert_eq!(names, expected);
    // One whole-list call covers all three ids.
    assert_eq!(stub.cloud_list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.cloud_by_id_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_lookup_within_ttl_stays_in_the_cache() {
    let mut stub = StubInventory::default();
    stub.cloud_areas = two_zones();
    let stub = Arc::new(stub);
    let directory = directory_over(Arc::clone(&stub));

    let requested: HashSet<i64> = [1, 2].into_iter().collect();
    let first = directory.batch_get_cloud_area_names(&requested).await;
    let second = directory.batch_get_cloud_area_names(&requested).await;

    assert_eq!(first, second);
    assert_eq!(stub.cloud_list_calls.load(Ordering::SeqCst), 1);

    let stats = directory.cloud_area_cache_stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.loads, 1);
}

#[tokio::test]
async fn backend_failure_degrades_every_id_to_unknown() {
    init_test_logging();
    let mut stub = StubInventory::default();
    stub.fail_cloud_list = true;
    let stub = Arc::new(stub);
    let directory = directory_over(Arc::clone(&stub));

    let requested: HashSet<i64> = [4, 5].into_iter().collect();
    let names = directory.batch_get_cloud_area_names(&requested).await;

    assert_eq!(names.len(), 2);
    assert_eq!(names[&4], "Unknown");
    assert_eq!(names[&5], "Unknown");
    assert_eq!(directory.cloud_area_cache_stats().load_failures, 1);
}

#[tokio::test]
async fn empty_request_never_reaches_the_backend() {
    let stub = Arc::new(StubInventory::default());
    let directory = directory_over(Arc::clone(&stub));

    let names = directory.batch_get_cloud_area_names(&HashSet::new()).await;

    assert!(names.is_empty());
    assert_eq!(stub.cloud_list_calls.load(Ordering::SeqCst), 0);
}
