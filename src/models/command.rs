use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, sync::Arc};

use crate::error::CommandError;

/// Overlay types the control surface knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModule {
    LowerThird,
    NowPlaying,
    SocialWidget,
    StreamScene,
    Reaction,
}

impl KnownModule {
    pub const ALL: [KnownModule; 5] = [
        KnownModule::LowerThird,
        KnownModule::NowPlaying,
        KnownModule::SocialWidget,
        KnownModule::StreamScene,
        KnownModule::Reaction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KnownModule::LowerThird => "LOWER_THIRD",
            KnownModule::NowPlaying => "NOW_PLAYING",
            KnownModule::SocialWidget => "SOCIAL_WIDGET",
            KnownModule::StreamScene => "STREAM_SCENE",
            KnownModule::Reaction => "REACTION",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == id)
    }
}

/// Identifier of an overlay module, e.g. `LOWER_THIRD`.
///
/// Unknown identifiers are carried through untouched; only the empty string
/// is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Arc<str>);

impl ModuleId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, CommandError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(CommandError::MissingModule);
        }
        Ok(Self(Arc::from(id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<KnownModule> {
        KnownModule::from_id(&self.0)
    }
}

impl From<KnownModule> for ModuleId {
    fn from(module: KnownModule) -> Self {
        Self(Arc::from(module.as_str()))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Show,
    Hide,
    Update,
}

impl Action {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "SHOW" => Some(Action::Show),
            "HIDE" => Some(Action::Hide),
            // Per-tick scene countdowns from older control surfaces.
            "UPDATE" | "UPDATE_COUNTDOWN" => Some(Action::Update),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Show => "SHOW",
            Action::Hide => "HIDE",
            Action::Update => "UPDATE",
        }
    }
}

/// A control command as relayed to every overlay client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub module: ModuleId,
    pub action: Action,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

impl Command {
    pub fn new(module: impl Into<ModuleId>, action: Action, payload: Value) -> Self {
        Self {
            module: module.into(),
            action,
            payload,
        }
    }

    /// Parses a command as sent by the control surface.
    ///
    /// The stream-scene controls put `action` inside the payload instead of at
    /// the top level, so the payload is consulted when the top level has none.
    pub fn from_value(raw: Value) -> Result<Self, CommandError> {
        let Value::Object(mut map) = raw else {
            return Err(CommandError::NotAnObject);
        };

        let module = match map.get("module") {
            Some(Value::String(id)) => ModuleId::new(id)?,
            _ => return Err(CommandError::MissingModule),
        };

        let payload = map.remove("payload").unwrap_or_else(empty_payload);

        let raw_action = match map.get("action") {
            Some(Value::String(action)) => Some(action.as_str()),
            Some(_) => return Err(CommandError::InvalidAction(map["action"].to_string())),
            None => payload.get("action").and_then(Value::as_str),
        };
        let action = match raw_action {
            Some(raw) => Action::parse(raw).ok_or_else(|| CommandError::InvalidAction(raw.into()))?,
            None => return Err(CommandError::MissingAction),
        };

        Ok(Self {
            module,
            action,
            payload,
        })
    }
}

/// Last known state of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleState {
    pub action: Action,
    pub payload: Value,
}

impl ModuleState {
    pub fn into_command(self, module: ModuleId) -> Command {
        Command {
            module,
            action: self.action,
            payload: self.payload,
        }
    }
}
