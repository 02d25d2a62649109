//! Token metadata, fixed when the Store is deployed.

use serde::{Deserialize, Serialize};

/// Name, symbol and display precision of the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    /// Creates metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new("Stable Token", "STBL", 18)
    }
}
