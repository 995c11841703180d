//! Chat message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    /// Older documents call the assistant "baymax"
    #[serde(alias = "baymax")]
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => f.write_str("user"),
            Sender::Assistant => f.write_str("assistant"),
        }
    }
}

/// Display lifecycle of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    /// Reply received, no renderer has taken it yet
    Pending,
    /// A renderer is revealing it
    Revealing,
    /// Fully shown
    #[default]
    Settled,
}

/// A single chat message. Text never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: String,
    sender: Sender,
    text: String,
    render_state: RenderState,
    created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(sender: Sender, text: String, render_state: RenderState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text,
            render_state,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn restore(
        id: String,
        sender: Sender,
        text: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            text,
            render_state: RenderState::Settled,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub(crate) fn set_render_state(&mut self, state: RenderState) {
        self.render_state = state;
    }
}
