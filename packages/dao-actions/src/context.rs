use crate::amount::validate_decimals;
use crate::config::validate_chain_config;
use common::cw::QueryContext;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw20::{Cw20QueryMsg, TokenInfoResponse};
use cw_asset::{AssetInfoUnchecked, AssetUnchecked};
use dao_actions_api::api::{ChainConfig, Token, TokenKey, TokenType};
use dao_actions_api::error::ActionError::{
    InvalidConfig, TokenNotResolved, TokenResolutionFailed, UnknownDenom,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{DaoCoreQueryMsg, GetItemResponse, VESTING_FACTORY_ITEM_KEY};
use log::{debug, warn};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenState {
    Loading,
    Resolved(Token),
    Failed(String),
}

/// What an encoder or decoder can currently know about a token.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenLookup<'a> {
    Resolved(&'a Token),
    /// Not looked up yet, or the lookup is still in flight.
    Pending,
    Failed(&'a str),
}

/// Token metadata cache, keyed by (type, denom or address).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenCache {
    entries: BTreeMap<TokenKey, TokenState>,
}

impl TokenCache {
    pub fn insert(&mut self, token: Token) {
        self.entries.insert(token.key(), TokenState::Resolved(token));
    }

    /// Marks a lookup as started, clearing an earlier failure. Resolved entries are kept.
    pub fn mark_loading(&mut self, key: TokenKey) {
        if !self.is_resolved(&key) {
            self.entries.insert(key, TokenState::Loading);
        }
    }

    pub fn mark_failed(&mut self, key: TokenKey, reason: impl Into<String>) {
        self.entries.insert(key, TokenState::Failed(reason.into()));
    }

    pub fn state(&self, key: &TokenKey) -> Option<&TokenState> {
        self.entries.get(key)
    }

    pub fn lookup(&self, key: &TokenKey) -> TokenLookup {
        match self.entries.get(key) {
            Some(TokenState::Resolved(token)) => TokenLookup::Resolved(token),
            Some(TokenState::Failed(reason)) => TokenLookup::Failed(reason),
            Some(TokenState::Loading) | None => TokenLookup::Pending,
        }
    }

    pub fn is_resolved(&self, key: &TokenKey) -> bool {
        matches!(self.entries.get(key), Some(TokenState::Resolved(_)))
    }
}

/// Read access to chain state, used to fill an `ActionContext` before encoding or decoding.
pub trait ChainStateQuerier {
    fn query_token(&self, key: &TokenKey) -> ActionResult<Token>;

    /// Address of the vesting factory the DAO uses, if it has one.
    fn query_vesting_factory(&self, dao_address: &Addr) -> ActionResult<Option<Addr>>;
}

/// Chain state read through a CosmWasm querier. Native tokens come from the chain config,
/// CW20 tokens from their `token_info` query.
pub struct CwChainStateQuerier<'a> {
    qctx: QueryContext<'a>,
    config: &'a ChainConfig,
}

impl<'a> CwChainStateQuerier<'a> {
    pub fn new(qctx: QueryContext<'a>, config: &'a ChainConfig) -> ActionResult<Self> {
        if qctx.chain_id() != config.chain_id {
            return Err(InvalidConfig {
                msg: format!(
                    "querier is connected to {}, but the config is for {}",
                    qctx.chain_id(),
                    config.chain_id
                ),
            });
        }

        Ok(CwChainStateQuerier { qctx, config })
    }
}

impl ChainStateQuerier for CwChainStateQuerier<'_> {
    fn query_token(&self, key: &TokenKey) -> ActionResult<Token> {
        match key.token_type {
            TokenType::Native => {
                let native = self
                    .config
                    .native_token(&key.denom_or_address)
                    .ok_or_else(|| UnknownDenom {
                        denom: key.denom_or_address.clone(),
                    })?;

                Ok(Token {
                    token_type: TokenType::Native,
                    denom_or_address: native.denom.clone(),
                    decimals: native.decimals,
                    symbol: native.symbol.clone(),
                })
            }
            TokenType::Cw20 => {
                let token_info: TokenInfoResponse = self
                    .qctx
                    .querier()
                    .query_wasm_smart(&key.denom_or_address, &Cw20QueryMsg::TokenInfo {})?;

                validate_decimals(token_info.decimals)?;

                Ok(Token {
                    token_type: TokenType::Cw20,
                    denom_or_address: key.denom_or_address.clone(),
                    decimals: token_info.decimals,
                    symbol: token_info.symbol,
                })
            }
        }
    }

    fn query_vesting_factory(&self, dao_address: &Addr) -> ActionResult<Option<Addr>> {
        let response: GetItemResponse = self.qctx.querier().query_wasm_smart(
            dao_address,
            &DaoCoreQueryMsg::GetItem {
                key: VESTING_FACTORY_ITEM_KEY.to_string(),
            },
        )?;

        Ok(response.item.map(Addr::unchecked))
    }
}

/// Everything an encoder or decoder needs besides the action itself.
///
/// Built and fully resolved by the caller before encoding or decoding; the transforms never
/// query the chain themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionContext {
    pub config: ChainConfig,
    /// The DAO core contract, which proposals execute from.
    pub dao_address: Addr,
    pub now: Timestamp,
    pub vesting_factory: Option<Addr>,
    pub tokens: TokenCache,
    /// Treasury balances in base units, if known. Without them amounts are not checked against
    /// the balance.
    pub balances: Option<BTreeMap<TokenKey, Uint128>>,
}

impl ActionContext {
    /// Creates a context with the chain's native tokens already resolved from the config.
    pub fn new(config: ChainConfig, dao_address: Addr, now: Timestamp) -> ActionResult<Self> {
        validate_chain_config(&config)?;

        let mut tokens = TokenCache::default();
        for native in &config.native_tokens {
            tokens.insert(Token {
                token_type: TokenType::Native,
                denom_or_address: native.denom.clone(),
                decimals: native.decimals,
                symbol: native.symbol.clone(),
            });
        }

        Ok(ActionContext {
            config,
            dao_address,
            now,
            vesting_factory: None,
            tokens,
            balances: None,
        })
    }

    pub fn with_vesting_factory(mut self, vesting_factory: Addr) -> Self {
        self.vesting_factory = Some(vesting_factory);
        self
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.tokens.insert(token);
        self
    }

    /// Sets the treasury balances. Asset types other than native and CW20 are ignored.
    pub fn with_balances(mut self, assets: Vec<AssetUnchecked>) -> Self {
        let mut balances: BTreeMap<TokenKey, Uint128> = BTreeMap::new();

        for asset in assets {
            let key = match &asset.info {
                AssetInfoUnchecked::Native(denom) => TokenKey::native(denom.clone()),
                AssetInfoUnchecked::Cw20(addr) => TokenKey::cw20(addr.clone()),
                _ => {
                    debug!("Ignoring balance of unsupported asset {:?}", asset.info);
                    continue;
                }
            };

            let balance = balances.entry(key).or_default();
            *balance = balance.saturating_add(asset.amount);
        }

        self.balances = Some(balances);
        self
    }

    /// The token new actions start out with: the chain's first configured native token.
    pub fn default_token(&self) -> TokenKey {
        self.config
            .native_tokens
            .first()
            .map(|native| TokenKey::native(native.denom.clone()))
            .unwrap_or_else(|| TokenKey::native(String::new()))
    }

    pub fn token_lookup(&self, key: &TokenKey) -> TokenLookup {
        self.tokens.lookup(key)
    }

    /// Resolved metadata of a token. Encoding refuses tokens that are not resolved.
    pub fn token(&self, key: &TokenKey) -> ActionResult<&Token> {
        match self.tokens.lookup(key) {
            TokenLookup::Resolved(token) => Ok(token),
            TokenLookup::Pending => Err(TokenNotResolved { token: key.clone() }),
            TokenLookup::Failed(reason) => Err(TokenResolutionFailed {
                token: key.clone(),
                reason: reason.to_string(),
            }),
        }
    }

    pub fn balance(&self, key: &TokenKey) -> Option<Uint128> {
        self.balances
            .as_ref()
            .map(|balances| balances.get(key).copied().unwrap_or_default())
    }

    /// Looks up every given token that is not resolved yet. Failures are recorded in the
    /// cache rather than returned, so that one bad token does not block the others.
    pub fn resolve_tokens(
        &mut self,
        querier: &dyn ChainStateQuerier,
        keys: impl IntoIterator<Item = TokenKey>,
    ) {
        for key in keys {
            if self.tokens.is_resolved(&key) {
                continue;
            }

            self.tokens.mark_loading(key.clone());

            match querier.query_token(&key) {
                Ok(token) => {
                    debug!("Resolved token {} ({} decimals)", key, token.decimals);
                    self.tokens.insert(token);
                }
                Err(e) => {
                    warn!("Failed to resolve token {}: {}", key, e);
                    self.tokens.mark_failed(key, e.to_string());
                }
            }
        }
    }

    pub fn resolve_vesting_factory(&mut self, querier: &dyn ChainStateQuerier) -> ActionResult<()> {
        self.vesting_factory = querier.query_vesting_factory(&self.dao_address)?;

        if self.vesting_factory.is_none() {
            debug!("DAO {} has no vesting factory", self.dao_address);
        }

        Ok(())
    }
}
