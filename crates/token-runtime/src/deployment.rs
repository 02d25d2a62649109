//! # Deployment
//!
//! Wires the three components together the same way every time:
//!
//! 1. deploy the first implementation,
//! 2. deploy the Store bound to it,
//! 3. deploy the Proxy over the Store,
//! 4. `init(proxy, store)` from the deployer, who becomes master,
//! 5. grant any configured bootstrap roles.
//!
//! [`Deployment::upgrade`] deploys and initializes the next generation and
//! switches to it through the Proxy.

use crate::config::{ConfigError, TokenConfig};
use shared_types::{
    Address, ContractRegistry, DeployedContract, ForeignToken, TokenError, TokenLogic,
    TokenRecipient,
};
use st_01_token_store::{TokenMetadata, TokenStore};
use st_02_token_logic::StableToken;
use st_03_token_proxy::StableProxy;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Deployment errors.
#[derive(Debug, Error)]
pub enum DeploymentError {
    /// Configuration rejected before anything was deployed.
    #[error("Invalid deployment configuration: {0}")]
    Config(#[from] ConfigError),

    /// A contract call failed.
    #[error("Contract call failed: {0}")]
    Token(#[from] TokenError),
}

/// A live token: registry, Store, Proxy and every implementation generation.
pub struct Deployment {
    registry: Arc<ContractRegistry>,
    store: Arc<TokenStore>,
    proxy: Arc<StableProxy>,
    generations: Vec<Arc<StableToken>>,
    latest: Arc<StableToken>,
    deployer: Address,
}

impl Deployment {
    /// Deploys a token from configuration.
    pub fn deploy(config: &TokenConfig) -> Result<Self, DeploymentError> {
        config.validate()?;
        let deployment = Self::deploy_with(
            Arc::new(ContractRegistry::new()),
            config.deployer,
            config.metadata(),
        )?;

        let current = deployment.current();
        for (role, account) in &config.bootstrap_roles {
            current.add_role(config.deployer, *role, *account)?;
        }
        Ok(deployment)
    }

    /// Deploys a token into an existing registry.
    pub fn deploy_with(
        registry: Arc<ContractRegistry>,
        deployer: Address,
        metadata: TokenMetadata,
    ) -> Result<Self, DeploymentError> {
        let token = StableToken::deploy(&registry, deployer);
        let store = Arc::new(TokenStore::new(
            registry.next_address(deployer),
            metadata,
            token.address(),
        )?);
        let proxy = StableProxy::deploy(&registry, deployer, Arc::clone(&store));
        token.init(deployer, proxy.address(), Arc::clone(&store))?;

        info!(
            "Token {} deployed: proxy {}, store {}, implementation {}",
            store.metadata().symbol,
            proxy.address(),
            store.address(),
            token.address()
        );

        Ok(Self {
            registry,
            store,
            proxy,
            generations: vec![Arc::clone(&token)],
            latest: token,
            deployer,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ContractRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    #[must_use]
    pub fn proxy(&self) -> &Arc<StableProxy> {
        &self.proxy
    }

    #[must_use]
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Every implementation deployed so far, oldest first.
    #[must_use]
    pub fn generations(&self) -> &[Arc<StableToken>] {
        &self.generations
    }

    /// The implementation the Store currently accepts writes from.
    ///
    /// Falls back to the newest generation if the Store was repointed at an
    /// implementation this deployment did not create.
    #[must_use]
    pub fn current(&self) -> Arc<StableToken> {
        let active = self.store.implementation();
        self.generations
            .iter()
            .rev()
            .find(|token| token.address() == active)
            .map_or_else(|| Arc::clone(&self.latest), Arc::clone)
    }

    /// Deploys the next implementation and switches to it via the Proxy.
    pub fn upgrade(&mut self, admin: Address) -> Result<Arc<StableToken>, DeploymentError> {
        let next = StableToken::deploy(&self.registry, self.deployer);
        next.init(self.deployer, self.proxy.address(), Arc::clone(&self.store))?;
        self.proxy.upgrade_token(admin, next.address())?;

        info!(
            "Token upgraded to generation {} at {}",
            self.generations.len() + 1,
            next.address()
        );
        self.generations.push(Arc::clone(&next));
        self.latest = Arc::clone(&next);
        Ok(next)
    }

    /// Registers a partner contract and returns its address.
    pub fn deploy_partner(&self, partner: Arc<dyn TokenRecipient>) -> Address {
        self.registry
            .deploy(self.deployer, DeployedContract::Recipient(partner))
    }

    /// Registers a foreign asset and returns its address.
    pub fn deploy_foreign_token(&self, token: Arc<dyn ForeignToken>) -> Address {
        self.registry
            .deploy(self.deployer, DeployedContract::ForeignToken(token))
    }
}

impl std::fmt::Debug for Deployment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployment")
            .field("proxy", &self.proxy.address())
            .field("store", &self.store.address())
            .field("generations", &self.generations.len())
            .finish()
    }
}
