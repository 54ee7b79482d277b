use crate::actions::begin_vesting::BeginVestingAction;
use crate::actions::cancel_vesting::CancelVestingAction;
use crate::actions::execute::ExecuteAction;
use crate::actions::items::{RemoveItemAction, SetItemAction};
use crate::actions::register_slash::RegisterSlashAction;
use crate::actions::spend::SpendAction;
use crate::actions::stake::StakeAction;
use crate::actions::ActionTransform;
use crate::context::ActionContext;
use dao_actions_api::api::{
    ActionData, ActionKey, DecodedAction, FieldError, MatchResult, TokenKey,
};
use dao_actions_api::error::ActionError::{
    ActionNotRegistered, DuplicateAction, TokenResolutionFailed,
};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::UnifiedMessage;
use itertools::Itertools;
use log::{debug, warn};

/// The set of actions a DAO can propose, and the order in which messages are matched against
/// them.
///
/// Matchers are always tried by [`ActionKey::match_priority`], most specific first, no matter
/// the order the actions were registered in. A CW20-wrapped stake is also a valid generic
/// execute, and only loses that ambiguity because `Stake` is tried before `Execute`.
#[derive(Default)]
pub struct ActionRegistry {
    transforms: Vec<Box<dyn ActionTransform>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        ActionRegistry::default()
    }

    pub fn with_default_actions() -> Self {
        let mut transforms: Vec<Box<dyn ActionTransform>> = vec![
            Box::new(SpendAction),
            Box::new(StakeAction),
            Box::new(BeginVestingAction),
            Box::new(CancelVestingAction),
            Box::new(RegisterSlashAction),
            Box::new(SetItemAction),
            Box::new(RemoveItemAction),
            Box::new(ExecuteAction),
        ];
        transforms.sort_by_key(|transform| transform.key().match_priority());

        ActionRegistry { transforms }
    }

    pub fn register(&mut self, transform: Box<dyn ActionTransform>) -> ActionResult<()> {
        let action = transform.key();

        if self.transforms.iter().any(|it| it.key() == action) {
            return Err(DuplicateAction { action });
        }

        self.transforms.push(transform);
        self.transforms
            .sort_by_key(|transform| transform.key().match_priority());

        Ok(())
    }

    /// Registered actions in the order their matchers are tried.
    pub fn match_order(&self) -> Vec<ActionKey> {
        self.transforms.iter().map(|it| it.key()).collect()
    }

    pub fn get(&self, action: ActionKey) -> ActionResult<&dyn ActionTransform> {
        self.transforms
            .iter()
            .find(|it| it.key() == action)
            .map(|it| it.as_ref())
            .ok_or(ActionNotRegistered { action })
    }

    pub fn defaults(&self, action: ActionKey, ctx: &ActionContext) -> ActionResult<ActionData> {
        Ok(self.get(action)?.defaults(ctx))
    }

    pub fn validate(
        &self,
        data: &ActionData,
        ctx: &ActionContext,
    ) -> ActionResult<Vec<FieldError>> {
        self.get(data.key())?.validate(data, ctx)
    }

    pub fn encode(&self, data: &ActionData, ctx: &ActionContext) -> ActionResult<UnifiedMessage> {
        self.get(data.key())?.encode(data, ctx)
    }

    /// Encodes a whole action list, in order. Fails on the first action that cannot be encoded.
    pub fn encode_all(
        &self,
        actions: &[ActionData],
        ctx: &ActionContext,
    ) -> ActionResult<Vec<UnifiedMessage>> {
        actions
            .iter()
            .map(|action| self.encode(action, ctx))
            .collect()
    }

    /// Finds the first action, in match order, that claims the message.
    ///
    /// A message no action claims is returned as raw, so that one unknown message never stops
    /// the rest of a proposal from rendering.
    pub fn decode(&self, msg: &UnifiedMessage, ctx: &ActionContext) -> DecodedAction {
        for transform in &self.transforms {
            let key = transform.key();

            if !transform.matches(msg) {
                continue;
            }

            match transform.decode(msg, ctx) {
                Ok(MatchResult::Matched(data)) => {
                    debug!("Message decoded as {}", key);
                    return DecodedAction::Matched { key, data };
                }
                Ok(MatchResult::Pending { token }) => {
                    debug!("Message has the shape of {}, waiting for token {}", key, token);
                    return DecodedAction::Pending { key, token };
                }
                Ok(MatchResult::NotMatched) => {
                    debug!("Message has the shape of {}, but not its content", key);
                }
                Err(TokenResolutionFailed { token, reason }) => {
                    warn!(
                        "Cannot decode {} message, token {} is unresolved: {}",
                        key, token, reason
                    );
                    return DecodedAction::Unresolved { key, token, reason };
                }
                Err(e) => {
                    warn!("Failed to decode message as {}: {}", key, e);
                }
            }
        }

        DecodedAction::Raw(msg.clone())
    }

    pub fn decode_all(&self, msgs: &[UnifiedMessage], ctx: &ActionContext) -> Vec<DecodedAction> {
        msgs.iter().map(|msg| self.decode(msg, ctx)).collect()
    }

    /// Tokens to resolve into the context before decoding the messages.
    pub fn required_tokens(&self, msgs: &[UnifiedMessage]) -> Vec<TokenKey> {
        msgs.iter()
            .flat_map(|msg| {
                self.transforms
                    .iter()
                    .filter(|transform| transform.matches(msg))
                    .flat_map(|transform| transform.required_tokens(msg))
                    .collect_vec()
            })
            .unique()
            .collect()
    }
}
