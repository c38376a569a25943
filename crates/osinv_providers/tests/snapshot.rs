use osinv_engine::{InventoryProvider, ProviderError, QueryEngine};
use osinv_model::{ComputeService, EndpointQuery, FilterSpec, RecordKind, ResultSet, Service};
use osinv_providers::{DeadlineProvider, SnapshotProvider};
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
services:
  - id: s1
    name: nova
    type: compute
    description: Compute
    enabled: true
  - id: s2
    name: neutron
    type: network
    enabled: true
endpoints:
  - id: e1
    interface: admin
    enabled: true
    region_id: RegionOne
    service_id: s1
    url: http://controller:8774/v2.1
  - id: e2
    interface: public
    enabled: true
    region_id: RegionOne
    service_id: s2
    url: http://controller:9696
"#;

#[tokio::test]
async fn yaml_snapshot_serves_joined_endpoints() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("inventory.yaml");
    fs::write(&path, SNAPSHOT).expect("write snapshot");

    let provider = SnapshotProvider::load(&path).expect("load snapshot");
    assert_eq!(provider.source(), path.as_path());

    let engine = QueryEngine::new(DeadlineProvider::new(provider));
    let envelope = engine
        .endpoints(&EndpointQuery {
            id: None,
            filters: Some(FilterSpec::new().with("service", "network")),
            include_services: true,
        })
        .await;

    match envelope.result() {
        Some(ResultSet::Many(endpoints)) => {
            assert_eq!(endpoints.len(), 1);
            assert_eq!(endpoints[0].id, "e2");
            assert_eq!(
                endpoints[0].enrichment.service_name.as_deref(),
                Some("neutron")
            );
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn json_snapshots_load_and_missing_sections_are_empty() {
    let provider = SnapshotProvider::parse(
        r#"{"services": [{"id": "s1", "name": "nova", "type": "compute"}]}"#,
    )
    .expect("parse json snapshot");

    let services: Vec<Service> = provider.list_records().await.expect("services");
    assert_eq!(services.len(), 1);
    let compute: Vec<ComputeService> = provider.list_records().await.expect("compute");
    assert!(compute.is_empty());
}

#[tokio::test]
async fn invalid_records_fail_on_read() {
    let provider = SnapshotProvider::parse(
        r#"
compute_services:
  - id: 1
    binary: nova-compute
    host: compute-01
    status: sideways
    state: up
"#,
    )
    .expect("parse snapshot");

    let err = provider
        .list_records::<ComputeService>()
        .await
        .expect_err("invalid status");
    assert!(matches!(
        err,
        ProviderError::Malformed {
            kind: RecordKind::ComputeService,
            ..
        }
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.yaml");
    let err = SnapshotProvider::load(&path).err().expect("load must fail");
    assert!(format!("{err:#}").contains("absent.yaml"));
}
