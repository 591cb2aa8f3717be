use anyhow::{anyhow, Result};

pub const CLUSTER_PLACEHOLDER: &str = "{cluster}";

pub fn validate_api_key(value: Option<&str>) -> Result<()> {
    let Some(key) = value else {
        return Err(anyhow!("riot_api_key is not configured (set REWIND_RIOT_API_KEY)"));
    };
    if key.trim().is_empty() {
        return Err(anyhow!("riot_api_key is empty"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(anyhow!("riot_api_key must not contain whitespace"));
    }
    Ok(())
}

pub fn validate_base_url(value: &str) -> Result<()> {
    if !value.contains(CLUSTER_PLACEHOLDER) {
        return Err(anyhow!("riot_base_url must contain {}", CLUSTER_PLACEHOLDER));
    }
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(anyhow!("riot_base_url must be an http(s) url"));
    }
    Ok(())
}
