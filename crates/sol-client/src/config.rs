use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::error::ClientError;

/// Public clusters with a well-known RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    MainnetBeta,
    Devnet,
    Testnet,
}

impl Cluster {
    pub const ALL: [Cluster; 3] = [Cluster::MainnetBeta, Cluster::Devnet, Cluster::Testnet];

    pub fn endpoint(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
        }
    }

    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        Cluster::ALL.into_iter().find(|c| c.endpoint() == endpoint)
    }
}

/// Where and how the client talks to a node.
///
/// Unless `local` is set, `endpoint` must be one of the public cluster
/// endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    #[serde(default)]
    pub commitment: Option<Commitment>,
    #[serde(default)]
    pub local: bool,
}

impl ClientConfig {
    pub fn cluster(cluster: Cluster) -> Self {
        Self {
            endpoint: cluster.endpoint().to_string(),
            commitment: None,
            local: false,
        }
    }

    /// A development node, e.g. `http://localhost:8899`.
    pub fn local(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            commitment: None,
            local: true,
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.endpoint.is_empty() {
            return Err(ClientError::InvalidEndpoint("endpoint is empty".into()));
        }
        if !self.local && Cluster::from_endpoint(&self.endpoint).is_none() {
            return Err(ClientError::InvalidEndpoint(format!(
                "{} is not a known cluster endpoint; set local for a development node",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(s: &str) -> Result<Self, ClientError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::cluster(Cluster::MainnetBeta)
    }
}
