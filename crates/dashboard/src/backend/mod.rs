//! Backend traits and implementations for the Dashboard API.
//!
//! The [`Backend`] trait covers exactly the calls a firewall rollout needs:
//! listing organizations and networks, and reading or replacing one
//! direction's firewall rule set. [`meraki::MerakiBackend`] talks HTTP;
//! [`MockBackend`] keeps everything in memory.
//!
//! # Testing
//!
//! ```
//! use dashboard::backend::{Backend, Call, MockBackend};
//! use dashboard::{Direction, Network};
//!
//! let mock = MockBackend::new();
//! mock.add_network("o1", Network::new("N1", "Branch 1", ["branch"]));
//! mock.fail_fetch("N1", "simulated transport error");
//!
//! assert!(mock.firewall_rules("N1", Direction::Outbound).is_err());
//! assert_eq!(
//!     mock.calls(),
//!     vec![Call::FetchRules { network_id: "N1".into(), direction: Direction::Outbound }]
//! );
//! ```

pub mod meraki;

use crate::error::{Error, Result};
use crate::types::{Direction, Network, Organization};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Backend trait for Dashboard operations.
pub trait Backend: Send + Sync {
    /// List organizations visible to the credential, in API order.
    fn organizations(&self) -> Result<Vec<Organization>>;

    /// List every network of an organization, in API order.
    fn networks(&self, org_id: &str) -> Result<Vec<Network>>;

    /// Fetch the live rule set for one direction as the API returns it.
    fn firewall_rules(&self, network_id: &str, direction: Direction) -> Result<Value>;

    /// Replace the whole rule set for one direction.
    ///
    /// Rules not included in `rules` are discarded remotely.
    fn replace_firewall_rules(
        &self,
        network_id: &str,
        direction: Direction,
        rules: &[Value],
    ) -> Result<()>;
}

/// A call observed by [`MockBackend`], in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListOrganizations,
    ListNetworks {
        org_id: String,
    },
    FetchRules {
        network_id: String,
        direction: Direction,
    },
    ReplaceRules {
        network_id: String,
        direction: Direction,
        rules: Vec<Value>,
    },
}

impl Call {
    /// Network this call touched, if any.
    #[must_use]
    pub fn network_id(&self) -> Option<&str> {
        match self {
            Self::FetchRules { network_id, .. } | Self::ReplaceRules { network_id, .. } => {
                Some(network_id)
            }
            _ => None,
        }
    }

    /// Whether this call mutates remote state.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::ReplaceRules { .. })
    }
}

#[derive(Debug, Default)]
struct MockState {
    organizations: Vec<Organization>,
    networks: HashMap<String, Vec<Network>>,
    rules: HashMap<(String, Direction), Value>,
    fetch_failures: HashMap<String, String>,
    replace_failures: HashMap<String, String>,
    listing_failure: Option<String>,
    calls: Vec<Call>,
}

/// Mock backend for testing without network access.
///
/// Stores organizations, networks and rule sets in memory, records every
/// call, and fails on demand per network.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Add an organization.
    pub fn add_organization(&self, id: impl Into<String>, name: impl Into<String>) {
        self.state().organizations.push(Organization {
            id: id.into(),
            name: name.into(),
        });
    }

    /// Add a network to an organization.
    pub fn add_network(&self, org_id: impl Into<String>, network: Network) {
        self.state()
            .networks
            .entry(org_id.into())
            .or_default()
            .push(network);
    }

    /// Set the live rule document for a network and direction.
    pub fn set_rules(&self, network_id: impl Into<String>, direction: Direction, doc: Value) {
        self.state().rules.insert((network_id.into(), direction), doc);
    }

    /// Current rule document for a network and direction.
    #[must_use]
    pub fn rules(&self, network_id: &str, direction: Direction) -> Option<Value> {
        self.state()
            .rules
            .get(&(network_id.to_string(), direction))
            .cloned()
    }

    /// Make rule fetches for a network fail with `message`.
    pub fn fail_fetch(&self, network_id: impl Into<String>, message: impl Into<String>) {
        self.state()
            .fetch_failures
            .insert(network_id.into(), message.into());
    }

    /// Make rule replacement for a network fail with HTTP 400 and `body`,
    /// as the Dashboard does when it rejects a rule set.
    pub fn fail_replace(&self, network_id: impl Into<String>, body: impl Into<String>) {
        self.state()
            .replace_failures
            .insert(network_id.into(), body.into());
    }

    /// Make organization and network listing fail with `message`.
    pub fn fail_listing(&self, message: impl Into<String>) {
        self.state().listing_failure = Some(message.into());
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Calls that touched one network, in order.
    #[must_use]
    pub fn calls_for(&self, network_id: &str) -> Vec<Call> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.network_id() == Some(network_id))
            .cloned()
            .collect()
    }

    /// Networks that received a write call, successful or not.
    #[must_use]
    pub fn write_attempts(&self) -> HashSet<String> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_write())
            .filter_map(|c| c.network_id().map(str::to_string))
            .collect()
    }
}

impl Backend for MockBackend {
    fn organizations(&self) -> Result<Vec<Organization>> {
        let mut state = self.state();
        state.calls.push(Call::ListOrganizations);
        if let Some(message) = &state.listing_failure {
            return Err(Error::http(message.clone(), None));
        }
        Ok(state.organizations.clone())
    }

    fn networks(&self, org_id: &str) -> Result<Vec<Network>> {
        let mut state = self.state();
        state.calls.push(Call::ListNetworks {
            org_id: org_id.to_string(),
        });
        if let Some(message) = &state.listing_failure {
            return Err(Error::http(message.clone(), None));
        }
        state
            .networks
            .get(org_id)
            .cloned()
            .ok_or_else(|| Error::http(format!("organization {} not found", org_id), Some(404)))
    }

    fn firewall_rules(&self, network_id: &str, direction: Direction) -> Result<Value> {
        let mut state = self.state();
        state.calls.push(Call::FetchRules {
            network_id: network_id.to_string(),
            direction,
        });
        if let Some(message) = state.fetch_failures.get(network_id) {
            return Err(Error::http(message.clone(), None));
        }
        Ok(state
            .rules
            .get(&(network_id.to_string(), direction))
            .cloned()
            .unwrap_or_else(|| serde_json::json!({ "rules": [] })))
    }

    fn replace_firewall_rules(
        &self,
        network_id: &str,
        direction: Direction,
        rules: &[Value],
    ) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::ReplaceRules {
            network_id: network_id.to_string(),
            direction,
            rules: rules.to_vec(),
        });
        if let Some(body) = state.replace_failures.get(network_id) {
            return Err(Error::from_response(400, body));
        }
        state.rules.insert(
            (network_id.to_string(), direction),
            serde_json::json!({ "rules": rules }),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_backend_empty() {
        let mock = MockBackend::new();
        assert!(mock.organizations().unwrap().is_empty());
        assert!(mock.networks("missing").is_err());
    }

    #[test]
    fn test_mock_backend_lists_in_insertion_order() {
        let mock = MockBackend::new();
        mock.add_organization("o1", "Acme");
        mock.add_network("o1", Network::new("N2", "Second", ["branch"]));
        mock.add_network("o1", Network::new("N1", "First", Vec::<String>::new()));

        let ids: Vec<_> = mock
            .networks("o1")
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["N2", "N1"]);
    }

    #[test]
    fn test_mock_backend_replace_is_wholesale() {
        let mock = MockBackend::new();
        mock.set_rules(
            "N1",
            Direction::Outbound,
            json!({ "rules": [{ "comment": "old" }, { "comment": "older" }] }),
        );

        let new_rules = vec![json!({ "comment": "deny-all", "policy": "deny" })];
        mock.replace_firewall_rules("N1", Direction::Outbound, &new_rules)
            .unwrap();

        assert_eq!(
            mock.rules("N1", Direction::Outbound).unwrap(),
            json!({ "rules": [{ "comment": "deny-all", "policy": "deny" }] })
        );
        assert!(mock.write_attempts().contains("N1"));
    }

    #[test]
    fn test_mock_backend_directions_are_separate() {
        let mock = MockBackend::new();
        mock.set_rules("N1", Direction::Inbound, json!({ "rules": [{ "comment": "in" }] }));

        let outbound = mock.firewall_rules("N1", Direction::Outbound).unwrap();
        assert_eq!(outbound, json!({ "rules": [] }));
    }

    #[test]
    fn test_mock_backend_injected_failures() {
        let mock = MockBackend::new();
        mock.fail_fetch("N1", "timeout");
        mock.fail_replace("N2", "bad rule");

        let err = mock.firewall_rules("N1", Direction::Inbound).unwrap_err();
        assert!(err.to_string().contains("timeout"));

        let err = mock
            .replace_firewall_rules("N2", Direction::Inbound, &[])
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(mock.write_attempts().contains("N2"));
    }

    #[test]
    fn test_mock_backend_listing_failure() {
        let mock = MockBackend::new();
        mock.add_organization("o1", "Acme");
        mock.fail_listing("401 unauthorized");
        assert!(mock.organizations().is_err());
    }

    #[test]
    fn test_calls_for_filters_by_network() {
        let mock = MockBackend::new();
        mock.firewall_rules("N1", Direction::Inbound).unwrap();
        mock.firewall_rules("N2", Direction::Inbound).unwrap();
        mock.replace_firewall_rules("N1", Direction::Inbound, &[])
            .unwrap();

        let calls = mock.calls_for("N1");
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].is_write());
        assert!(calls[1].is_write());
    }
}
