//! Core types for Dashboard inventory and firewall operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which appliance firewall rule set an operation targets.
///
/// The two directions are distinct remote resources, not variants of one:
/// `Inbound` is the appliance inbound firewall, `Outbound` is the Layer-3
/// (outbound) firewall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Inbound firewall rules.
    Inbound,
    /// Layer-3 outbound firewall rules.
    Outbound,
}

impl Direction {
    /// All directions, in prompt order.
    pub const ALL: [Direction; 2] = [Direction::Inbound, Direction::Outbound];

    /// Lowercase name used in file names and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Capitalized name for headings.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Inbound => "Inbound",
            Self::Outbound => "Outbound",
        }
    }

    /// Path segment of the appliance firewall resource for this direction.
    #[must_use]
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Inbound => "inboundFirewallRules",
            Self::Outbound => "l3FirewallRules",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction string is neither `inbound` nor `outbound`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction '{0}': must be 'inbound' or 'outbound'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            _ => Err(ParseDirectionError(s.trim().to_string())),
        }
    }
}

/// An organization visible to the API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A network inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    /// Tags attached to the network. Missing or null tags mean "no tags".
    #[serde(default, deserialize_with = "nullable_tags")]
    pub tags: BTreeSet<String>,
    /// Product types (appliance, switch, wireless, ...), display only.
    #[serde(default)]
    pub product_types: Vec<String>,
}

impl Network {
    /// Create a network with the given tags and no product types.
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            product_types: Vec::new(),
        }
    }

    /// Whether the network carries exactly this tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

fn nullable_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_case_insensitive() {
        assert_eq!("inbound".parse::<Direction>().unwrap(), Direction::Inbound);
        assert_eq!("OUTBOUND".parse::<Direction>().unwrap(), Direction::Outbound);
        assert_eq!(" Outbound ".parse::<Direction>().unwrap(), Direction::Outbound);
    }

    #[test]
    fn test_direction_parse_rejects_others() {
        let err = "both".parse::<Direction>().unwrap_err();
        assert_eq!(err, ParseDirectionError("both".to_string()));
        assert!("".parse::<Direction>().is_err());
        assert!("l3".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_resources_are_distinct() {
        assert_eq!(Direction::Inbound.resource(), "inboundFirewallRules");
        assert_eq!(Direction::Outbound.resource(), "l3FirewallRules");
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Outbound.to_string(), "outbound");
        assert_eq!(Direction::Inbound.title(), "Inbound");
    }

    #[test]
    fn test_network_deserialize_api_shape() {
        let json = r#"{
            "id": "L_1",
            "organizationId": "o1",
            "name": "Branch 1",
            "productTypes": ["appliance", "switch"],
            "tags": ["branch", "east"],
            "timeZone": "America/New_York"
        }"#;
        let net: Network = serde_json::from_str(json).unwrap();
        assert_eq!(net.id, "L_1");
        assert!(net.has_tag("branch"));
        assert!(!net.has_tag("bran"));
        assert_eq!(net.product_types, vec!["appliance", "switch"]);
    }

    #[test]
    fn test_network_deserialize_null_tags() {
        let net: Network = serde_json::from_str(r#"{"id":"N","name":"n","tags":null}"#).unwrap();
        assert!(net.tags.is_empty());

        let net: Network = serde_json::from_str(r#"{"id":"N","name":"n"}"#).unwrap();
        assert!(net.tags.is_empty());
    }
}
