use cosmwasm_std::{Deps, Env, QuerierWrapper};

/// Read-only view of the chain: a querier plus the block the queries are made at.
pub struct QueryContext<'a> {
    pub deps: Deps<'a>,
    pub env: Env,
}

impl<'a> QueryContext<'a> {
    pub fn from(deps: Deps<'a>, env: Env) -> QueryContext<'a> {
        QueryContext { deps, env }
    }

    pub fn querier(&self) -> QuerierWrapper<'a> {
        self.deps.querier
    }

    pub fn chain_id(&self) -> &str {
        &self.env.block.chain_id
    }
}

pub mod testing {
    use cosmwasm_std::{Addr, BlockInfo, ContractInfo, Deps, Env, Timestamp, TransactionInfo};

    use crate::cw::QueryContext;

    pub const MOCK_CONTRACT_ADDR: &str = "cosmos2contract";
    pub const MOCK_CHAIN_ID: &str = "cosmos-testnet-14002";

    /// Returns a mocked QueryContext over the given deps.
    pub fn mock_query_ctx(deps: Deps) -> QueryContext {
        QueryContext {
            deps,
            env: mock_env(),
        }
    }

    /// Returns a default environment with height, time, chain_id, and contract address.
    ///
    /// This is intended for use in test code only.
    pub fn mock_env() -> Env {
        Env {
            block: BlockInfo {
                height: 12_345,
                time: Timestamp::from_nanos(1_571_797_419_879_305_533),
                chain_id: MOCK_CHAIN_ID.to_string(),
            },
            transaction: Some(TransactionInfo { index: 3 }),
            contract: ContractInfo {
                address: Addr::unchecked(MOCK_CONTRACT_ADDR),
            },
        }
    }
}
