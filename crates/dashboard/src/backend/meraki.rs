//! Meraki Dashboard API v1 backend.
//!
//! Authenticates with a bearer API key and uses the appliance firewall
//! endpoints:
//!
//! - `GET /organizations`
//! - `GET /organizations/{organizationId}/networks`
//! - `GET|PUT /networks/{networkId}/appliance/firewall/inboundFirewallRules`
//! - `GET|PUT /networks/{networkId}/appliance/firewall/l3FirewallRules`
//!
//! Calls are blocking and never retried.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{Direction, Network, Organization};
use serde_json::{Value, json};
use ureq::Body;
use ureq::http::Response;

/// Default Dashboard API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.meraki.com/api/v1";

/// Largest page size the networks endpoint accepts.
const NETWORKS_PER_PAGE: u32 = 100_000;

const USER_AGENT: &str = concat!("fwguard-dashboard/", env!("CARGO_PKG_VERSION"));

/// Meraki Dashboard backend.
pub struct MerakiBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, without trailing slash.
    api_base: String,
    /// Dashboard API key.
    api_key: String,
}

impl MerakiBackend {
    /// Create a backend against the public Dashboard API.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE)
    }

    /// Create a backend with a custom API base (regional clouds, testing).
    #[must_use]
    pub fn with_api_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            agent: ureq::Agent::new_with_config(
                ureq::Agent::config_builder()
                    .http_status_as_error(false)
                    .build(),
            ),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn organizations_url(&self) -> String {
        format!("{}/organizations", self.api_base)
    }

    fn networks_url(&self, org_id: &str) -> String {
        format!(
            "{}/organizations/{}/networks?perPage={}",
            self.api_base, org_id, NETWORKS_PER_PAGE
        )
    }

    fn rules_url(&self, network_id: &str, direction: Direction) -> String {
        format!(
            "{}/networks/{}/appliance/firewall/{}",
            self.api_base,
            network_id,
            direction.resource()
        )
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl Backend for MerakiBackend {
    fn organizations(&self) -> Result<Vec<Organization>> {
        let url = self.organizations_url();
        log::debug!("GET {}", url);

        let orgs: Vec<Organization> = self
            .agent
            .get(&url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(Error::from)
            .and_then(ensure_success)?
            .body_mut()
            .read_json()?;

        Ok(orgs)
    }

    fn networks(&self, org_id: &str) -> Result<Vec<Network>> {
        let url = self.networks_url(org_id);
        log::debug!("GET {}", url);

        let networks: Vec<Network> = self
            .agent
            .get(&url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(Error::from)
            .and_then(ensure_success)?
            .body_mut()
            .read_json()?;

        Ok(networks)
    }

    fn firewall_rules(&self, network_id: &str, direction: Direction) -> Result<Value> {
        let url = self.rules_url(network_id, direction);
        log::debug!("GET {}", url);

        let doc: Value = self
            .agent
            .get(&url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(Error::from)
            .and_then(ensure_success)?
            .body_mut()
            .read_json()?;

        Ok(doc)
    }

    fn replace_firewall_rules(
        &self,
        network_id: &str,
        direction: Direction,
        rules: &[Value],
    ) -> Result<()> {
        let url = self.rules_url(network_id, direction);
        log::debug!("PUT {} ({} rules)", url, rules.len());

        self.agent
            .put(&url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send_json(replace_body(rules))
            .map_err(Error::from)
            .and_then(ensure_success)?;

        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying the Dashboard's reason.
fn ensure_success(mut response: Response<Body>) -> Result<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.body_mut().read_to_string().unwrap_or_default();
    log::debug!("HTTP {} body: {}", status.as_u16(), body);
    Err(Error::from_response(status.as_u16(), &body))
}

/// Request body for a full rule-set replacement.
fn replace_body(rules: &[Value]) -> Value {
    json!({ "rules": rules })
}
