use crate::context::ActionContext;
use crate::registry::ActionRegistry;
use dao_actions_api::api::{ActionData, ActionKey, DecodedAction, FieldError, TokenKey};
use dao_actions_api::error::ActionError::{InvalidActionState, Validation};
use dao_actions_api::error::ActionResult;
use dao_actions_api::msg::UnifiedMessage;
use strum_macros::Display;

/// State of one action in a proposal being drafted or rendered.
///
/// A new action goes `Defaults -> Editing -> Encoded`, or to `EncodeFailed` until it is fixed.
/// An action loaded from an existing message starts in `Decoding`, where it stays while a token
/// it needs is pending, and ends up `Editing` or `NotMatched`.
#[derive(Clone, Debug, PartialEq, Display)]
pub enum ActionState {
    Defaults(ActionData),
    Editing(ActionData),
    Encoded {
        data: ActionData,
        msg: UnifiedMessage,
    },
    EncodeFailed {
        data: ActionData,
        error: String,
        field_errors: Vec<FieldError>,
    },
    Decoding {
        msg: UnifiedMessage,
        pending: Option<TokenKey>,
    },
    ResolutionFailed {
        msg: UnifiedMessage,
        token: TokenKey,
        reason: String,
    },
    /// No registered action claims the message. Rendered as raw JSON and submitted unchanged.
    NotMatched(UnifiedMessage),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionInstance {
    key: Option<ActionKey>,
    state: ActionState,
}

impl ActionInstance {
    pub fn new(
        registry: &ActionRegistry,
        key: ActionKey,
        ctx: &ActionContext,
    ) -> ActionResult<Self> {
        Ok(ActionInstance {
            key: Some(key),
            state: ActionState::Defaults(registry.defaults(key, ctx)?),
        })
    }

    pub fn from_message(
        registry: &ActionRegistry,
        msg: UnifiedMessage,
        ctx: &ActionContext,
    ) -> Self {
        let mut instance = ActionInstance {
            key: None,
            state: ActionState::Decoding { msg, pending: None },
        };
        instance.apply_decoded(registry, ctx);
        instance
    }

    /// Decodes the message again, typically once a pending token got resolved into the context.
    pub fn retry_decode(
        &mut self,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> ActionResult<()> {
        match self.state {
            ActionState::Decoding { .. } | ActionState::ResolutionFailed { .. } => {
                self.apply_decoded(registry, ctx);
                Ok(())
            }
            _ => Err(InvalidActionState {
                operation: "decoded".to_string(),
            }),
        }
    }

    fn apply_decoded(&mut self, registry: &ActionRegistry, ctx: &ActionContext) {
        let msg = match &self.state {
            ActionState::Decoding { msg, .. } | ActionState::ResolutionFailed { msg, .. } => {
                msg.clone()
            }
            _ => return,
        };

        self.state = match registry.decode(&msg, ctx) {
            DecodedAction::Matched { key, data } => {
                self.key = Some(key);
                ActionState::Editing(data)
            }
            DecodedAction::Pending { key, token } => {
                self.key = Some(key);
                ActionState::Decoding {
                    msg,
                    pending: Some(token),
                }
            }
            DecodedAction::Unresolved { key, token, reason } => {
                self.key = Some(key);
                ActionState::ResolutionFailed { msg, token, reason }
            }
            DecodedAction::Raw(msg) => {
                self.key = None;
                ActionState::NotMatched(msg)
            }
        };
    }

    pub fn key(&self) -> Option<ActionKey> {
        self.key
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    /// Current form data, if the action has any.
    pub fn data(&self) -> Option<&ActionData> {
        match &self.state {
            ActionState::Defaults(data)
            | ActionState::Editing(data)
            | ActionState::Encoded { data, .. }
            | ActionState::EncodeFailed { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The message to submit for this action, once there is one.
    pub fn message(&self) -> Option<&UnifiedMessage> {
        match &self.state {
            ActionState::Encoded { msg, .. } | ActionState::NotMatched(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match &self.state {
            ActionState::EncodeFailed { field_errors, .. } => field_errors,
            _ => &[],
        }
    }

    /// Whether the action is ready to be submitted as it is.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            ActionState::Encoded { .. } | ActionState::NotMatched(_)
        )
    }

    /// Applies a form edit. Any previously encoded message is discarded.
    pub fn edit<F>(&mut self, edit: F) -> ActionResult<()>
    where
        F: FnOnce(&mut ActionData),
    {
        let mut data = self.data().cloned().ok_or_else(|| InvalidActionState {
            operation: "edited".to_string(),
        })?;

        edit(&mut data);
        self.state = ActionState::Editing(data);

        Ok(())
    }

    pub fn validate(
        &self,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> ActionResult<Vec<FieldError>> {
        let data = self.data().ok_or_else(|| InvalidActionState {
            operation: "validated".to_string(),
        })?;

        registry.validate(data, ctx)
    }

    /// Encodes the current data. On failure the action moves to `EncodeFailed`, keeping its data
    /// so that it can be fixed and encoded again.
    pub fn encode(
        &mut self,
        registry: &ActionRegistry,
        ctx: &ActionContext,
    ) -> ActionResult<UnifiedMessage> {
        let data = self.data().cloned().ok_or_else(|| InvalidActionState {
            operation: "encoded".to_string(),
        })?;

        match registry.encode(&data, ctx) {
            Ok(msg) => {
                self.state = ActionState::Encoded {
                    data,
                    msg: msg.clone(),
                };
                Ok(msg)
            }
            Err(e) => {
                let field_errors = match &e {
                    Validation { errors } => errors.clone(),
                    _ => vec![],
                };
                self.state = ActionState::EncodeFailed {
                    data,
                    error: e.to_string(),
                    field_errors,
                };
                Err(e)
            }
        }
    }
}
