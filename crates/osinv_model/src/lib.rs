mod filter;
mod output;

pub use filter::{FilterSpec, FilterValue, Scalar};
pub use output::{Envelope, Outcome, ResultSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Provider-defined attributes outside the fixed schema of a record.
pub type Extra = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// `""` and `0` are treated as "no id given".
    pub fn is_empty(&self) -> bool {
        match self {
            RecordId::Int(id) => *id == 0,
            RecordId::Text(text) => text.is_empty(),
        }
    }

    pub fn matches_str(&self, value: &str) -> bool {
        match self {
            RecordId::Int(id) => value.parse::<i64>().map_or(false, |v| v == *id),
            RecordId::Text(id) => id == value,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        matches!(self, RecordId::Text(id) if id == other)
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Endpoint,
    Service,
    ComputeService,
}

impl RecordKind {
    /// Key under which a result set of this kind is published in the envelope.
    pub fn facts_key(&self) -> &'static str {
        match self {
            RecordKind::Endpoint => "openstack_endpoints",
            RecordKind::Service => "openstack_services",
            RecordKind::ComputeService => "openstack_nova_services",
        }
    }

    /// Section name used by inventory snapshots.
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Endpoint => "endpoints",
            RecordKind::Service => "services",
            RecordKind::ComputeService => "compute_services",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Endpoint => "endpoint",
            RecordKind::Service => "service",
            RecordKind::ComputeService => "compute service",
        };
        f.write_str(label)
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "endpoint" | "endpoints" => Ok(RecordKind::Endpoint),
            "service" | "services" => Ok(RecordKind::Service),
            "compute_service" | "compute-service" | "compute_services" | "nova" => {
                Ok(RecordKind::ComputeService)
            }
            other => Err(format!("unknown record kind '{}'", other)),
        }
    }
}

/// One inventory item as produced by a provider.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> RecordId;

    /// Human name, for kinds that can be looked up by name.
    fn name(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    Admin,
    Public,
    Internal,
}

/// Denormalized service attributes attached to an endpoint after a join.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEnrichment {
    pub service_name: Option<String>,
    pub service_type: Option<String>,
    pub service_description: Option<String>,
    pub service_enabled: Option<bool>,
}

impl ServiceEnrichment {
    pub fn is_empty(&self) -> bool {
        self == &ServiceEnrichment::default()
    }
}

impl From<&Service> for ServiceEnrichment {
    fn from(service: &Service) -> Self {
        Self {
            service_name: service.name.clone(),
            service_type: Some(service.service_type.clone()),
            service_description: service.description.clone(),
            service_enabled: service.enabled,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    pub id: RecordId,
    pub interface: Interface,
    pub enabled: bool,
    pub region: Option<String>,
    pub region_id: Option<String>,
    pub service_id: RecordId,
    pub url: String,
    #[serde(flatten)]
    pub enrichment: ServiceEnrichment,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Endpoint {
    /// Copies the owning service's attributes onto this endpoint, replacing
    /// whatever an earlier join attached.
    pub fn enrich_from(&mut self, service: &Service) {
        self.enrichment = ServiceEnrichment::from(service);
    }
}

impl Record for Endpoint {
    const KIND: RecordKind = RecordKind::Endpoint;

    fn id(&self) -> RecordId {
        self.id.clone()
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: RecordId,
    /// Keystone only requires `type`; unnamed services are valid.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub service_type: String,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for Service {
    const KIND: RecordKind = RecordKind::Service;

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComputeServiceStatus {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComputeServiceState {
    Up,
    Down,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputeService {
    pub id: RecordId,
    pub binary: String,
    pub host: String,
    pub zone: Option<String>,
    pub status: ComputeServiceStatus,
    pub state: ComputeServiceState,
    pub disabled_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for ComputeService {
    const KIND: RecordKind = RecordKind::ComputeService;

    fn id(&self) -> RecordId {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointQuery {
    pub id: Option<RecordId>,
    pub filters: Option<FilterSpec>,
    pub include_services: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceQuery {
    /// Name or id of the service.
    pub service: Option<String>,
    pub filters: Option<FilterSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeServiceQuery {
    pub id: Option<RecordId>,
    pub filters: Option<FilterSpec>,
}
