use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// How settled a block must be before a query reads from it.
///
/// `recent`, `single`, `singleGossip`, `root` and `max` are older aliases
/// still accepted by nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Commitment {
    Processed,
    Confirmed,
    #[default]
    Finalized,
    Recent,
    Single,
    SingleGossip,
    Root,
    Max,
}

impl Commitment {
    pub const ALL: [Commitment; 8] = [
        Commitment::Processed,
        Commitment::Confirmed,
        Commitment::Finalized,
        Commitment::Recent,
        Commitment::Single,
        Commitment::SingleGossip,
        Commitment::Root,
        Commitment::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
            Commitment::Recent => "recent",
            Commitment::Single => "single",
            Commitment::SingleGossip => "singleGossip",
            Commitment::Root => "root",
            Commitment::Max => "max",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Commitment::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ClientError::InvalidCommitment(s.to_string()))
    }
}
