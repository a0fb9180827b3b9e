//! One fill operation against a page: locate the username field, read or
//! write it, write the password, show or hide it.
//!
//! The who/where of the operation lives in a [`FillContext`] created per
//! user request and dropped with it. Requests arrive as action-tagged
//! [`FillMessage`]s, the same shape a page-side agent would receive over a
//! frame or process boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;
use unique_passwords_core::normalize_domain;
use unique_passwords_discovery::{
    Document, DocumentError, ElementTree, NodeId, UsernameHeuristic,
};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Where a fill operation was triggered. Lives for one operation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillContext {
    /// URL of the page holding the password field.
    pub page_url: String,
    /// `id` attribute of the password field that was targeted.
    pub password_field_id: String,
}

impl FillContext {
    /// Context for the password field `password_field_id` on `page_url`.
    #[must_use]
    pub fn new(page_url: &str, password_field_id: &str) -> Self {
        Self {
            page_url: page_url.to_string(),
            password_field_id: password_field_id.to_string(),
        }
    }

    /// Account domain for this page.
    #[must_use]
    pub fn domain(&self, keep_subdomain: bool) -> String {
        normalize_domain(&self.page_url, keep_subdomain)
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Request sent to the page side.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FillMessage {
    /// Read the discovered username field.
    GetUsername,
    /// Write the discovered username field.
    SetUsername {
        /// New value.
        username: String,
    },
    /// Write the password field.
    SetPassword {
        /// New value, wiped when the message is dropped.
        password: Zeroizing<String>,
    },
    /// Switch the password field between plain text and masked.
    ShowPassword {
        /// `true` shows the password.
        visible: bool,
    },
}

impl fmt::Debug for FillMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetUsername => f.write_str("GetUsername"),
            Self::SetUsername { username } => f
                .debug_struct("SetUsername")
                .field("username", username)
                .finish(),
            Self::SetPassword { .. } => f
                .debug_struct("SetPassword")
                .field("password", &"***")
                .finish(),
            Self::ShowPassword { visible } => f
                .debug_struct("ShowPassword")
                .field("visible", visible)
                .finish(),
        }
    }
}

/// Reply from the page side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FillReply {
    /// Current username field value (empty when there is no field).
    SetUsername {
        /// Field value.
        username: String,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Page-side handler for one fill operation.
pub struct FillSession<'a> {
    document: &'a mut Document,
    context: FillContext,
    password_field: NodeId,
    username_field: Option<NodeId>,
    revealed: bool,
}

impl<'a> FillSession<'a> {
    /// Bind to the password field named in `context` and locate its
    /// username field.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ElementNotFound`] if the password field is
    /// not in the document.
    pub fn new(
        document: &'a mut Document,
        context: FillContext,
        heuristic: &UsernameHeuristic,
    ) -> Result<Self, DocumentError> {
        let password_field = document.require_element(&context.password_field_id)?;
        let username_field = heuristic.find_username_field(&*document, password_field);
        tracing::debug!(
            password_field = %context.password_field_id,
            username_field_found = username_field.is_some(),
            "fill session started"
        );
        Ok(Self {
            document,
            context,
            password_field,
            username_field,
            revealed: false,
        })
    }

    /// The context this session was opened with.
    #[must_use]
    pub const fn context(&self) -> &FillContext {
        &self.context
    }

    /// The discovered username field, if any.
    #[must_use]
    pub const fn username_field(&self) -> Option<NodeId> {
        self.username_field
    }

    /// `id` of the discovered username field, if it has one.
    #[must_use]
    pub fn username_field_id(&self) -> Option<&str> {
        self.username_field
            .and_then(|field| self.document.attribute(field, "id"))
    }

    /// Whether the password is currently shown.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Apply one message. Only `getUsername` produces a reply.
    ///
    /// `setUsername` without a discovered username field is ignored.
    pub fn handle(&mut self, message: FillMessage) -> Option<FillReply> {
        tracing::trace!(?message, "fill message");
        match message {
            FillMessage::GetUsername => {
                let username = self
                    .username_field
                    .map(|field| self.document.value(field).to_string())
                    .unwrap_or_default();
                Some(FillReply::SetUsername { username })
            }
            FillMessage::SetUsername { username } => {
                if let Some(field) = self.username_field {
                    self.document.set_value(field, &username);
                }
                None
            }
            FillMessage::SetPassword { password } => {
                self.document.set_value(self.password_field, &password);
                None
            }
            FillMessage::ShowPassword { visible } => {
                let kind = if visible { "text" } else { "password" };
                self.document.set_attribute(self.password_field, "type", kind);
                None
            }
        }
    }

    /// Show the password. Emits `showPassword` only on a hidden → shown edge.
    pub fn reveal(&mut self) -> Option<FillMessage> {
        self.toggle(true)
    }

    /// Hide the password. Emits `showPassword` only on a shown → hidden edge.
    pub fn conceal(&mut self) -> Option<FillMessage> {
        self.toggle(false)
    }

    fn toggle(&mut self, visible: bool) -> Option<FillMessage> {
        if self.revealed == visible {
            return None;
        }
        self.revealed = visible;
        let message = FillMessage::ShowPassword { visible };
        self.handle(message.clone());
        Some(message)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
