//! # Contract Registry
//!
//! The address space of deployed components. Implementations, partner
//! contracts and foreign assets are registered under a deterministic address
//! and resolved by address on every use, which is what lets the Proxy follow
//! an upgrade without caching anything.
//!
//! ## Address derivation
//!
//! `keccak256(deployer ‖ nonce_be)[12..]`, with one nonce per deployer.
//!
//! ## Locking
//!
//! Resolvers clone the handle out and release the lock before returning, so a
//! collaborator may call back into the registry (re-entrant partners do).

use crate::contracts::{ForeignToken, TokenLogic, TokenRecipient};
use crate::entities::Address;
use crate::errors::{TokenError, TokenResult};
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A handle registered at an address.
#[derive(Clone)]
pub enum DeployedContract {
    /// A token implementation the Proxy may forward to.
    Implementation(Arc<dyn TokenLogic>),
    /// A partner that accepts `transfer_and_call` notifications.
    Recipient(Arc<dyn TokenRecipient>),
    /// A third-party asset.
    ForeignToken(Arc<dyn ForeignToken>),
}

impl DeployedContract {
    fn kind(&self) -> &'static str {
        match self {
            Self::Implementation(_) => "implementation",
            Self::Recipient(_) => "recipient",
            Self::ForeignToken(_) => "foreign-token",
        }
    }
}

impl std::fmt::Debug for DeployedContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// Address → deployed handle.
///
/// Registered handles live as long as the registry. Implementations hold a
/// handle back to the registry to reach partners and foreign assets, so in
/// practice a registry lives for the whole process.
#[derive(Default)]
pub struct ContractRegistry {
    contracts: RwLock<HashMap<Address, DeployedContract>>,
    nonces: RwLock<HashMap<Address, u64>>,
}

impl ContractRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the address of `deployer`'s next deployment and consumes the
    /// nonce.
    pub fn next_address(&self, deployer: Address) -> Address {
        let nonce = {
            let mut nonces = self.nonces.write();
            let entry = nonces.entry(deployer).or_insert(0);
            let nonce = *entry;
            *entry += 1;
            nonce
        };
        derive_address(deployer, nonce)
    }

    /// Registers `contract` at `address`, replacing whatever was there.
    pub fn register(&self, address: Address, contract: DeployedContract) {
        debug!("[Registry] Registering {} at {}", contract.kind(), address);
        if let Some(previous) = self.contracts.write().insert(address, contract) {
            warn!(
                "[Registry] Replaced {} previously deployed at {}",
                previous.kind(),
                address
            );
        }
    }

    /// Reserves a fresh address for `deployer` and registers `contract` there.
    pub fn deploy(&self, deployer: Address, contract: DeployedContract) -> Address {
        let address = self.next_address(deployer);
        self.register(address, contract);
        address
    }

    /// Returns true if anything is deployed at `address`.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.contracts.read().contains_key(address)
    }

    /// Number of deployed contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.read().len()
    }

    /// Returns true if nothing has been deployed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.read().is_empty()
    }

    /// Resolves a token implementation.
    pub fn implementation(&self, address: Address) -> TokenResult<Arc<dyn TokenLogic>> {
        match self.contracts.read().get(&address) {
            Some(DeployedContract::Implementation(logic)) => Ok(Arc::clone(logic)),
            _ => Err(TokenError::UnknownContract(address)),
        }
    }

    /// Resolves a partner contract.
    pub fn recipient(&self, address: Address) -> TokenResult<Arc<dyn TokenRecipient>> {
        match self.contracts.read().get(&address) {
            Some(DeployedContract::Recipient(recipient)) => Ok(Arc::clone(recipient)),
            _ => Err(TokenError::UnknownContract(address)),
        }
    }

    /// Resolves a foreign asset.
    pub fn foreign_token(&self, address: Address) -> TokenResult<Arc<dyn ForeignToken>> {
        match self.contracts.read().get(&address) {
            Some(DeployedContract::ForeignToken(token)) => Ok(Arc::clone(token)),
            _ => Err(TokenError::UnknownContract(address)),
        }
    }
}

/// `keccak256(deployer ‖ nonce_be)[12..]`
#[must_use]
pub fn derive_address(deployer: Address, nonce: u64) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(deployer.as_bytes());
    hasher.update(nonce.to_be_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..]);
    Address::new(bytes)
}

// =============================================================================
// TESTS
// =============================================================================
