use crate::error::ProviderError;
use crate::provider::{InMemoryProvider, InventoryProvider};
use async_trait::async_trait;
use osinv_model::{FilterSpec, Record, RecordId, RecordKind};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    Get,
    Search,
    NameOrId,
    List,
}

/// Wraps a provider and counts requests per kind.
pub struct CountingProvider<P = InMemoryProvider> {
    inner: P,
    calls: Mutex<HashMap<(Request, RecordKind), usize>>,
}

impl<P: InventoryProvider> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn calls(&self, request: Request, kind: RecordKind) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.get(&(request, kind)).copied().unwrap_or(0)
    }

    fn record(&self, request: Request, kind: RecordKind) {
        *self.calls.lock().unwrap().entry((request, kind)).or_default() += 1;
    }
}

#[async_trait]
impl<P: InventoryProvider> InventoryProvider for CountingProvider<P> {
    async fn get_record<R: Record>(&self, id: &RecordId) -> Result<R, ProviderError> {
        self.record(Request::Get, R::KIND);
        self.inner.get_record(id).await
    }

    async fn search_records<R: Record>(
        &self,
        filters: &FilterSpec,
    ) -> Result<Vec<R>, ProviderError> {
        self.record(Request::Search, R::KIND);
        self.inner.search_records(filters).await
    }

    async fn search_by_name_or_id<R: Record>(
        &self,
        name_or_id: &str,
    ) -> Result<Vec<R>, ProviderError> {
        self.record(Request::NameOrId, R::KIND);
        self.inner.search_by_name_or_id(name_or_id).await
    }

    async fn list_records<R: Record>(&self) -> Result<Vec<R>, ProviderError> {
        self.record(Request::List, R::KIND);
        self.inner.list_records().await
    }
}

/// Fails every request of `kind`, delegating the rest.
pub struct FailingProvider {
    pub inner: InMemoryProvider,
    pub kind: RecordKind,
}

impl FailingProvider {
    fn check(&self, kind: RecordKind) -> Result<(), ProviderError> {
        if kind == self.kind {
            return Err(ProviderError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryProvider for FailingProvider {
    async fn get_record<R: Record>(&self, id: &RecordId) -> Result<R, ProviderError> {
        self.check(R::KIND)?;
        self.inner.get_record(id).await
    }

    async fn search_records<R: Record>(
        &self,
        filters: &FilterSpec,
    ) -> Result<Vec<R>, ProviderError> {
        self.check(R::KIND)?;
        self.inner.search_records(filters).await
    }

    async fn search_by_name_or_id<R: Record>(
        &self,
        name_or_id: &str,
    ) -> Result<Vec<R>, ProviderError> {
        self.check(R::KIND)?;
        self.inner.search_by_name_or_id(name_or_id).await
    }

    async fn list_records<R: Record>(&self) -> Result<Vec<R>, ProviderError> {
        self.check(R::KIND)?;
        self.inner.list_records().await
    }
}

pub fn service(id: &str, name: &str, service_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": service_type,
        "enabled": true,
        "description": format!("{name} service")
    })
}

pub fn endpoint(id: &str, interface: &str, service_id: &str) -> Value {
    json!({
        "id": id,
        "interface": interface,
        "enabled": true,
        "region_id": "RegionOne",
        "service_id": service_id,
        "url": format!("http://controller/{service_id}/{interface}")
    })
}

pub fn compute_services() -> InMemoryProvider {
    InMemoryProvider::new().with_raw(
        RecordKind::ComputeService,
        vec![
            json!({"id": 1, "binary": "nova-compute", "host": "compute-01", "zone": "nova",
                   "status": "enabled", "state": "up"}),
            json!({"id": 2, "binary": "nova-compute", "host": "compute-02", "zone": "nova",
                   "status": "enabled", "state": "down"}),
            json!({"id": 3, "binary": "nova-compute", "host": "compute-03", "zone": "nova",
                   "status": "disabled", "state": "down", "disabled_reason": "maintenance"}),
        ],
    )
}
