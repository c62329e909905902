//! Session identity and agent profile types.
//!
//! A session binds a user to a stakeholder role. Its key renders as
//! `userId:stakeholderType` on the wire and in storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::SessionKeyError;

/// Separator between the user id and the stakeholder type in a rendered key.
pub const SESSION_KEY_SEPARATOR: char = ':';

/// Structured composite key identifying a session.
///
/// Both components are non-empty and separator-free, so the rendered form
/// parses back unambiguously by splitting on the first separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    user_id: String,
    stakeholder_type: String,
}

impl SessionKey {
    /// Build a key from its two components, trimming surrounding whitespace.
    pub fn new(user_id: &str, stakeholder_type: &str) -> Result<Self, SessionKeyError> {
        let user_id = validate_component("userId", user_id)?;
        let stakeholder_type = validate_component("stakeholderType", stakeholder_type)?;
        Ok(Self {
            user_id,
            stakeholder_type,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn stakeholder_type(&self) -> &str {
        &self.stakeholder_type
    }
}

fn validate_component(field: &'static str, value: &str) -> Result<String, SessionKeyError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SessionKeyError::Empty(field));
    }
    if value.contains(SESSION_KEY_SEPARATOR) {
        return Err(SessionKeyError::ContainsSeparator {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SESSION_KEY_SEPARATOR}{}",
            self.user_id, self.stakeholder_type
        )
    }
}

impl FromStr for SessionKey {
    type Err = SessionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user_id, stakeholder_type) = s
            .split_once(SESSION_KEY_SEPARATOR)
            .ok_or_else(|| SessionKeyError::Malformed(s.to_string()))?;
        SessionKey::new(user_id, stakeholder_type)
    }
}

impl Serialize for SessionKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The personalized agent bound to a session.
///
/// Immutable after creation: the system prompt is fixed the first time the
/// profile is stored, even if the prompt template changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub session_id: SessionKey,
    pub user_id: String,
    pub stakeholder_type: String,
    pub system_prompt: String,
    pub created_at: DateTime<Utc>,
}

impl AgentProfile {
    /// Create a fresh profile for `key`, stamped with the current time.
    pub fn new(key: SessionKey, system_prompt: String) -> Self {
        Self {
            user_id: key.user_id().to_string(),
            stakeholder_type: key.stakeholder_type().to_string(),
            session_id: key,
            system_prompt,
            created_at: Utc::now(),
        }
    }
}
