use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_INVENTORY_PATH: &str = "inventory.yaml";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

static INVENTORY_PATH: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var_os("OSINV_INVENTORY")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY_PATH))
});

static PROVIDER_TIMEOUT: Lazy<Duration> = Lazy::new(|| {
    env_duration(
        "OSINV_PROVIDER_TIMEOUT_SECS",
        Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
    )
});

pub fn default_inventory_path() -> PathBuf {
    INVENTORY_PATH.clone()
}

/// Deadline applied to each individual provider request.
pub fn provider_timeout() -> Duration {
    *PROVIDER_TIMEOUT
}

fn env_duration(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|value| value.parse().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}
