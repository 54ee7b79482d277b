use crate::actions::execute::ExecuteAction;
use crate::actions::stake::StakeAction;
use crate::actions::ActionTransform;
use crate::context::ActionContext;
use crate::registry::ActionRegistry;
use crate::tests::helpers::{
    cw20, dec, native, stub_ctx, CW20_TOKEN, DENOM, OTHER_DENOM, RECIPIENT, STAKING_CONTRACT,
};
use cosmwasm_std::{coin, coins, StdError};
use dao_actions_api::api::ActionKey::{
    BeginVesting, CancelVesting, Execute, RegisterSlash, RemoveItem, SetItem, Spend, Stake,
};
use dao_actions_api::api::{
    ActionData, ActionKey, DecodedAction, ExecuteData, FieldError, MatchResult, SpendData,
    StakeData,
};
use dao_actions_api::error::ActionError::{ActionNotRegistered, DuplicateAction};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::{StargateMessage, UnifiedMessage};
use serde_json::json;

/// Claims every message, then fails to decode it.
struct BrokenStakeAction;

impl ActionTransform for BrokenStakeAction {
    fn key(&self) -> ActionKey {
        Stake
    }

    fn defaults(&self, ctx: &ActionContext) -> ActionData {
        StakeAction.defaults(ctx)
    }

    fn validate(&self, _data: &ActionData, _ctx: &ActionContext) -> ActionResult<Vec<FieldError>> {
        Ok(vec![])
    }

    fn encode(&self, _data: &ActionData, _ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        Err(StdError::generic_err("broken stake action").into())
    }

    fn matches(&self, _msg: &UnifiedMessage) -> bool {
        true
    }

    fn decode(&self, _msg: &UnifiedMessage, _ctx: &ActionContext) -> ActionResult<MatchResult> {
        Err(StdError::generic_err("broken stake action").into())
    }
}

fn cw20_stake_msg() -> UnifiedMessage {
    UnifiedMessage::wasm_execute(
        CW20_TOKEN,
        json!({
            "send": {
                "contract": STAKING_CONTRACT,
                "amount": "100000000",
                "msg": "eyJzdGFrZSI6e319",
            }
        }),
        vec![],
    )
}

#[test]
pub fn default_actions_are_matched_most_specific_first() {
    let registry = ActionRegistry::with_default_actions();

    assert_eq!(
        registry.match_order(),
        vec![
            BeginVesting,
            Stake,
            RegisterSlash,
            CancelVesting,
            SetItem,
            RemoveItem,
            Spend,
            Execute
        ]
    );
}

#[test]
pub fn cw20_stake_decodes_as_stake() -> ActionResult<()> {
    let ctx = stub_ctx()?;
    let registry = ActionRegistry::with_default_actions();

    let decoded = registry.decode(&cw20_stake_msg(), &ctx);

    assert_eq!(
        decoded,
        DecodedAction::Matched {
            key: Stake,
            data: ActionData::Stake(StakeData {
                staking_contract: STAKING_CONTRACT.to_string(),
                token: cw20(CW20_TOKEN),
                amount: dec("1"),
            }),
        }
    );

    Ok(())
}

#[test]
pub fn match_order_does_not_depend_on_registration_order() -> ActionResult<()> {
    let ctx = stub_ctx()?;

    let mut registry = ActionRegistry::new();
    registry.register(Box::new(ExecuteAction))?;
    registry.register(Box::new(StakeAction))?;

    assert_eq!(registry.match_order(), vec![Stake, Execute]);
    assert!(matches!(
        registry.decode(&cw20_stake_msg(), &ctx),
        DecodedAction::Matched { key: Stake, .. }
    ));

    Ok(())
}

#[test]
pub fn cw20_stake_is_generic_execute_without_stake_action() -> ActionResult<()> {
    let ctx = stub_ctx()?;

    let mut registry = ActionRegistry::new();
    registry.register(Box::new(ExecuteAction))?;

    assert_eq!(
        registry.decode(&cw20_stake_msg(), &ctx),
        DecodedAction::Matched {
            key: Execute,
            data: ActionData::Execute(ExecuteData {
                contract_address: CW20_TOKEN.to_string(),
                message: json!({
                    "send": {
                        "contract": STAKING_CONTRACT,
                        "amount": "100000000",
                        "msg": "eyJzdGFrZSI6e319",
                    }
                }),
                funds: vec![],
            }),
        }
    );

    Ok(())
}

#[test]
pub fn registering_action_twice_fails() -> ActionResult<()> {
    let mut registry = ActionRegistry::with_default_actions();

    let result = registry.register(Box::new(StakeAction));

    assert_eq!(result, Err(DuplicateAction { action: Stake }));
    assert_eq!(registry.match_order().len(), 8);

    Ok(())
}

#[test]
pub fn unregistered_action_cannot_be_encoded() -> ActionResult<()> {
    let ctx = stub_ctx()?;

    let mut registry = ActionRegistry::new();
    registry.register(Box::new(ExecuteAction))?;

    let spend = ActionData::Spend(SpendData {
        recipient: RECIPIENT.to_string(),
        token: native(DENOM),
        amount: dec("1"),
    });

    assert_eq!(
        registry.encode(&spend, &ctx),
        Err(ActionNotRegistered { action: Spend })
    );
    assert!(registry.defaults(Spend, &ctx).is_err());

    Ok(())
}

#[test]
pub fn unknown_messages_are_returned_raw() -> ActionResult<()> {
    let ctx = stub_ctx()?;
    let registry = ActionRegistry::with_default_actions();

    let stargate = UnifiedMessage::Stargate(StargateMessage {
        type_url: "/cosmos.staking.v1beta1.MsgDelegate".to_string(),
        value: json!({
            "delegator_address": "dao_core",
            "validator_address": "validator1",
            "amount": {"denom": DENOM, "amount": "1000"},
        }),
    });
    let multi_coin_send =
        UnifiedMessage::bank_send(RECIPIENT, vec![coin(1, DENOM), coin(2, OTHER_DENOM)]);
    let non_object_execute = UnifiedMessage::wasm_execute("some_contract", json!([1, 2]), vec![]);

    for msg in [stargate, multi_coin_send, non_object_execute] {
        assert_eq!(registry.decode(&msg, &ctx), DecodedAction::Raw(msg.clone()));
    }

    Ok(())
}

#[test]
pub fn unresolved_token_leaves_decoding_pending() -> ActionResult<()> {
    let ctx = stub_ctx()?;
    let registry = ActionRegistry::with_default_actions();

    let msg = UnifiedMessage::wasm_execute(
        "new_token",
        json!({"transfer": {"recipient": RECIPIENT, "amount": "1"}}),
        vec![],
    );

    assert_eq!(
        registry.decode(&msg, &ctx),
        DecodedAction::Pending {
            key: Spend,
            token: cw20("new_token"),
        }
    );

    Ok(())
}

#[test]
pub fn failed_token_is_reported_as_unresolved() -> ActionResult<()> {
    let mut ctx = stub_ctx()?;
    ctx.tokens.mark_failed(cw20("new_token"), "contract does not exist");
    let registry = ActionRegistry::with_default_actions();

    let msg = UnifiedMessage::wasm_execute(
        "new_token",
        json!({"transfer": {"recipient": RECIPIENT, "amount": "1"}}),
        vec![],
    );

    assert_eq!(
        registry.decode(&msg, &ctx),
        DecodedAction::Unresolved {
            key: Spend,
            token: cw20("new_token"),
            reason: "contract does not exist".to_string(),
        }
    );

    Ok(())
}

#[test]
pub fn decoding_error_falls_through_to_next_action() -> ActionResult<()> {
    let ctx = stub_ctx()?;

    let mut registry = ActionRegistry::new();
    registry.register(Box::new(ExecuteAction))?;
    registry.register(Box::new(BrokenStakeAction))?;

    let msg = UnifiedMessage::wasm_execute(STAKING_CONTRACT, json!({"stake": {}}), vec![]);

    assert!(matches!(
        registry.decode(&msg, &ctx),
        DecodedAction::Matched { key: Execute, .. }
    ));

    Ok(())
}

#[test]
pub fn required_tokens_are_collected_once() -> ActionResult<()> {
    let registry = ActionRegistry::with_default_actions();

    let msgs = vec![
        UnifiedMessage::wasm_execute(
            "new_token",
            json!({"transfer": {"recipient": RECIPIENT, "amount": "1"}}),
            vec![],
        ),
        UnifiedMessage::bank_send(RECIPIENT, coins(1, DENOM)),
        UnifiedMessage::wasm_execute(
            STAKING_CONTRACT,
            json!({"stake": {}}),
            coins(1, OTHER_DENOM),
        ),
        UnifiedMessage::wasm_execute(
            "new_token",
            json!({"transfer": {"recipient": "someone_else", "amount": "2"}}),
            vec![],
        ),
    ];

    assert_eq!(
        registry.required_tokens(&msgs),
        vec![cw20("new_token"), native(DENOM), native(OTHER_DENOM)]
    );

    Ok(())
}

#[test]
pub fn proposal_round_trips_through_registry() -> ActionResult<()> {
    let ctx = stub_ctx()?;
    let registry = ActionRegistry::with_default_actions();

    let actions = vec![
        ActionData::Spend(SpendData {
            recipient: RECIPIENT.to_string(),
            token: native(DENOM),
            amount: dec("3"),
        }),
        ActionData::Stake(StakeData {
            staking_contract: STAKING_CONTRACT.to_string(),
            token: cw20(CW20_TOKEN),
            amount: dec("0.5"),
        }),
    ];

    let msgs = registry.encode_all(&actions, &ctx)?;
    let decoded = registry.decode_all(&msgs, &ctx);

    assert_eq!(
        decoded,
        vec![
            DecodedAction::Matched {
                key: Spend,
                data: actions[0].clone(),
            },
            DecodedAction::Matched {
                key: Stake,
                data: actions[1].clone(),
            },
        ]
    );

    Ok(())
}

#[test]
pub fn invalid_action_fails_whole_proposal_encoding() -> ActionResult<()> {
    let ctx = stub_ctx()?;
    let registry = ActionRegistry::with_default_actions();

    let actions = vec![
        registry.defaults(SetItem, &ctx)?,
        ActionData::Spend(SpendData {
            recipient: RECIPIENT.to_string(),
            token: native(DENOM),
            amount: dec("1"),
        }),
    ];

    assert!(registry.encode_all(&actions, &ctx).is_err());
    assert_eq!(
        registry.validate(&actions[0], &ctx)?,
        vec![FieldError::new("key", "value is required")]
    );

    Ok(())
}

#[test]
pub fn registry_decodes_from_several_threads() -> ActionResult<()> {
    let registry = ActionRegistry::with_default_actions();
    let msgs = vec![
        cw20_stake_msg(),
        UnifiedMessage::bank_send(RECIPIENT, coins(1_000_000, DENOM)),
    ];

    let decoded = std::thread::scope(|scope| {
        let handles = msgs
            .iter()
            .map(|msg| {
                let registry = &registry;
                scope.spawn(move || -> ActionResult<DecodedAction> {
                    Ok(registry.decode(msg, &stub_ctx()?))
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<ActionResult<Vec<_>>>()
    })?;

    assert_eq!(decoded, registry.decode_all(&msgs, &stub_ctx()?));
    assert!(matches!(decoded[0], DecodedAction::Matched { key: Stake, .. }));
    assert!(matches!(decoded[1], DecodedAction::Matched { key: Spend, .. }));

    Ok(())
}
