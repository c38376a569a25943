use anyhow::Result;
use clap::{Args, ValueEnum};
use osinv_engine::{InventoryProvider, QueryEngine};
use osinv_model::{
    ComputeServiceQuery, EndpointQuery, Envelope, FilterSpec, RecordId, ServiceQuery,
};
use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Args)]
pub struct EndpointsCmd {
    /// Endpoint id
    #[arg(long)]
    pub id: Option<String>,
    /// Filter map as inline YAML or JSON, e.g. '{interface: admin, enabled: true}'
    #[arg(long, value_parser = parse_filters)]
    pub filters: Option<FilterSpec>,
    /// Attach service name, type, description and state to each endpoint
    #[arg(long, default_value_t = false)]
    pub include_services: bool,
}

#[derive(Args)]
pub struct ServicesCmd {
    /// Name or id of the service
    #[arg(long)]
    pub service: Option<String>,
    #[arg(long, value_parser = parse_filters)]
    pub filters: Option<FilterSpec>,
}

#[derive(Args)]
pub struct ComputeServicesCmd {
    /// Id of the compute service
    #[arg(long)]
    pub id: Option<i64>,
    #[arg(long, value_parser = parse_filters)]
    pub filters: Option<FilterSpec>,
}

impl From<EndpointsCmd> for EndpointQuery {
    fn from(cmd: EndpointsCmd) -> Self {
        EndpointQuery {
            id: cmd.id.map(RecordId::from),
            filters: cmd.filters,
            include_services: cmd.include_services,
        }
    }
}

impl From<ServicesCmd> for ServiceQuery {
    fn from(cmd: ServicesCmd) -> Self {
        ServiceQuery {
            service: cmd.service,
            filters: cmd.filters,
        }
    }
}

impl From<ComputeServicesCmd> for ComputeServiceQuery {
    fn from(cmd: ComputeServicesCmd) -> Self {
        ComputeServiceQuery {
            id: cmd.id.map(RecordId::from),
            filters: cmd.filters,
        }
    }
}

pub fn parse_filters(raw: &str) -> Result<FilterSpec, String> {
    serde_yaml::from_str(raw).map_err(|err| format!("invalid filter map: {err}"))
}

pub async fn endpoints<P: InventoryProvider>(
    engine: &QueryEngine<P>,
    cmd: EndpointsCmd,
    format: OutputFormat,
) -> Result<bool> {
    let envelope = engine.endpoints(&cmd.into()).await;
    emit(&envelope, format)
}

pub async fn services<P: InventoryProvider>(
    engine: &QueryEngine<P>,
    cmd: ServicesCmd,
    format: OutputFormat,
) -> Result<bool> {
    let envelope = engine.services(&cmd.into()).await;
    emit(&envelope, format)
}

pub async fn compute_services<P: InventoryProvider>(
    engine: &QueryEngine<P>,
    cmd: ComputeServicesCmd,
    format: OutputFormat,
) -> Result<bool> {
    let envelope = engine.compute_services(&cmd.into()).await;
    emit(&envelope, format)
}

/// Prints the envelope and reports whether the query succeeded.
pub fn emit<R: Serialize>(envelope: &Envelope<R>, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(envelope)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(envelope)?),
    }
    Ok(!envelope.is_failure())
}
