//! # Network File
//!
//! YAML description of the nodes `pactum simulate` starts:
//!
//! ```yaml
//! nodes:
//!   - organisation: Alice Corp
//!     locality: London
//!     country: GB
//!     seed: 0101...01        # optional, 64 hex; a fresh key otherwise
//!     opening_balance: 0
//!   - organisation: Bob Ltd
//!     locality: New York
//!     country: US
//!     opening_balance: 10000
//! flow:                      # optional
//!   counterparty_timeout_ms: 5000
//!   notify_timeout_ms: 1000
//! ```
//!
//! Flow timeouts start from the environment (`PACTUM_*_TIMEOUT_MS`) and the
//! `flow` section overrides them.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use pactum_core::PartyName;
use pactum_crypto::Ed25519KeyPair;
use pactum_flow::{FlowConfig, NodeSpec};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub flow: Option<FlowSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub organisation: String,
    pub locality: String,
    pub country: String,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub opening_balance: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowSection {
    #[serde(default)]
    pub counterparty_timeout_ms: Option<u64>,
    #[serde(default)]
    pub notify_timeout_ms: Option<u64>,
}

impl NetworkConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid network file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        if config.nodes.len() < 2 {
            bail!("a network needs at least two nodes, found {}", config.nodes.len());
        }
        Ok(config)
    }

    pub fn flow_config(&self) -> anyhow::Result<FlowConfig> {
        let mut config = FlowConfig::from_env()?;
        let section = self.flow.clone().unwrap_or_default();
        if let Some(ms) = section.counterparty_timeout_ms {
            config.counterparty_timeout = positive_millis("counterparty_timeout_ms", ms)?;
        }
        if let Some(ms) = section.notify_timeout_ms {
            config.notify_timeout = positive_millis("notify_timeout_ms", ms)?;
        }
        Ok(config)
    }

    pub fn node_specs(&self) -> anyhow::Result<Vec<NodeSpec>> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .to_spec()
                    .with_context(|| format!("node {i} ({})", entry.organisation))
            })
            .collect()
    }
}

impl NodeEntry {
    fn to_spec(&self) -> anyhow::Result<NodeSpec> {
        let name = PartyName::new(&self.organisation, &self.locality, &self.country)?;
        let key = match &self.seed {
            Some(hex) => Ed25519KeyPair::from_seed_hex(hex.trim()).context("invalid seed")?,
            None => Ed25519KeyPair::generate(),
        };
        Ok(NodeSpec {
            name,
            key,
            opening_balance: self.opening_balance,
        })
    }
}

fn positive_millis(field: &str, ms: u64) -> anyhow::Result<Duration> {
    if ms == 0 {
        bail!("flow.{field} must be greater than 0");
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_NODES: &str = r#"
nodes:
  - organisation: Alice Corp
    locality: London
    country: GB
    seed: "0101010101010101010101010101010101010101010101010101010101010101"
  - organisation: Bob Ltd
    locality: New York
    country: US
    opening_balance: 10000
flow:
  counterparty_timeout_ms: 750
"#;

    #[test]
    fn test_parse_two_nodes() {
        let config = NetworkConfig::from_yaml(TWO_NODES).unwrap();
        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.nodes[0].opening_balance, 0);
        assert_eq!(config.nodes[1].opening_balance, 10_000);

        let specs = config.node_specs().unwrap();
        assert_eq!(specs[0].name.organisation(), "Alice Corp");
        assert_eq!(
            specs[0].key.public_key(),
            Ed25519KeyPair::from_seed(&[1; 32]).public_key()
        );
    }

    #[test]
    fn test_flow_section_overrides_timeout() {
        let config = NetworkConfig::from_yaml(TWO_NODES).unwrap();
        let flow = config.flow_config().unwrap();
        assert_eq!(flow.counterparty_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_single_node_rejected() {
        let raw = "nodes:\n  - {organisation: Solo, locality: Paris, country: FR}\n";
        assert!(NetworkConfig::from_yaml(raw).is_err());
    }

    #[test]
    fn test_bad_country_reported_per_node() {
        let raw = TWO_NODES.replace("country: US", "country: USA");
        let config = NetworkConfig::from_yaml(&raw).unwrap();
        let err = config.node_specs().unwrap_err();
        assert!(format!("{err:#}").contains("Bob Ltd"), "{err:#}");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let raw = TWO_NODES.replace("opening_balance: 10000", "balance: 10000");
        assert!(NetworkConfig::from_yaml(&raw).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let raw = TWO_NODES.replace("750", "0");
        let config = NetworkConfig::from_yaml(&raw).unwrap();
        assert!(config.flow_config().is_err());
    }
}
