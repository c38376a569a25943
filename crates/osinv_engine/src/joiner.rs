use crate::error::QueryError;
use crate::provider::InventoryProvider;
use crate::selector::{select, Selection};
use osinv_model::{Endpoint, EndpointQuery, FilterSpec, FilterValue, ResultSet, Service};
use tracing::{debug, instrument, warn};

pub const SERVICE_FILTER_KEY: &str = "service";
pub const SERVICE_ID_FILTER_KEY: &str = "service_id";

/// Endpoint filters after resolving a `service` key to a concrete id.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResolution {
    pub filters: FilterSpec,
    pub service: Option<Service>,
}

impl ServiceResolution {
    fn unresolved(filters: &FilterSpec) -> Self {
        Self {
            filters: filters.clone(),
            service: None,
        }
    }
}

/// Replaces `service` (a name, id or type) with `service_id`. When nothing
/// resolves, the filters come back untouched, `service` key included.
#[instrument(skip(provider))]
pub async fn resolve_service_filter<P: InventoryProvider>(
    provider: &P,
    filters: &FilterSpec,
) -> Result<ServiceResolution, QueryError> {
    let requested = match filters.get(SERVICE_FILTER_KEY) {
        None => return Ok(ServiceResolution::unresolved(filters)),
        Some(FilterValue::Scalar(value)) => value.to_string(),
        Some(FilterValue::Nested(_)) => {
            warn!(target: "engine::joiner", "nested 'service' filter cannot name a service");
            return Ok(ServiceResolution::unresolved(filters));
        }
    };

    let mut candidates = provider.search_by_name_or_id::<Service>(&requested).await?;
    if candidates.is_empty() {
        debug!(
            target: "engine::joiner",
            "no service named '{}', retrying as a service type", requested
        );
        let by_type = FilterSpec::new().with("type", requested.as_str());
        candidates = select::<Service, _>(provider, &Selection::Filtered(by_type))
            .await?
            .into_vec();
    }

    if candidates.len() > 1 {
        debug!(
            target: "engine::joiner",
            "'{}' matched {} services, using the first", requested, candidates.len()
        );
    }

    match candidates.into_iter().next() {
        Some(service) => Ok(ServiceResolution {
            filters: filters
                .without(SERVICE_FILTER_KEY)
                .with(SERVICE_ID_FILTER_KEY, service.id.clone()),
            service: Some(service),
        }),
        None => {
            warn!(
                target: "engine::joiner",
                "service '{}' matched no name, id or type; filtering on it as given", requested
            );
            Ok(ServiceResolution::unresolved(filters))
        }
    }
}

/// Copies the owning service's attributes onto `endpoint`. Endpoints whose
/// service is not in `services` are left as they are.
pub fn enrich_endpoint(endpoint: &mut Endpoint, services: &[Service]) {
    match services.iter().find(|service| service.id == endpoint.service_id) {
        Some(service) => endpoint.enrich_from(service),
        None => warn!(
            target: "engine::joiner",
            "endpoint={} references unknown service {}", endpoint.id, endpoint.service_id
        ),
    }
}

pub fn enrich(mut endpoints: Vec<Endpoint>, services: &[Service]) -> Vec<Endpoint> {
    for endpoint in &mut endpoints {
        enrich_endpoint(endpoint, services);
    }
    endpoints
}

/// Selects endpoints and, when asked, joins each one to its service. The
/// service inventory is listed at most once per call.
#[instrument(skip(provider))]
pub async fn query_endpoints<P: InventoryProvider>(
    provider: &P,
    query: &EndpointQuery,
) -> Result<ResultSet<Endpoint>, QueryError> {
    let selection = Selection::from_params(query.id.clone(), query.filters.clone())?;
    if !query.include_services {
        return select(provider, &selection).await;
    }

    let (selection, resolved) = match selection {
        Selection::Filtered(filters) => {
            let resolution = resolve_service_filter(provider, &filters).await?;
            (Selection::Filtered(resolution.filters), resolution.service)
        }
        other => (other, None),
    };

    let endpoints = select::<Endpoint, _>(provider, &selection).await?;
    if endpoints.is_empty() {
        return Ok(endpoints);
    }

    let services = match resolved {
        Some(service) => vec![service],
        None => provider.list_records::<Service>().await?,
    };

    Ok(match endpoints {
        ResultSet::Single(mut endpoint) => {
            enrich_endpoint(&mut endpoint, &services);
            ResultSet::Single(endpoint)
        }
        ResultSet::Many(endpoints) => ResultSet::Many(enrich(endpoints, &services)),
    })
}
