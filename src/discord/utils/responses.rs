// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use std::error::Error;
use std::fmt;

pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry, something went wrong while running that command.";

/// A failure returned by a command handler.
///
/// Only [`CommandError::UserSafe`] messages are ever shown to the user. Everything else is logged and replaced with
/// [`GENERIC_FAILURE_MESSAGE`].
#[derive(Debug, Diagnostic)]
pub enum CommandError {
	UserSafe(String),
	Internal(Box<dyn Error + Send + Sync>),
}

impl CommandError {
	pub fn user_safe(message: impl Into<String>) -> Self {
		Self::UserSafe(message.into())
	}

	pub fn internal(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
		Self::Internal(error.into())
	}

	pub fn is_user_safe(&self) -> bool {
		matches!(self, Self::UserSafe(_))
	}
}

impl Error for CommandError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::UserSafe(_) => None,
			Self::Internal(error) => Some(error.as_ref()),
		}
	}
}

impl fmt::Display for CommandError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UserSafe(message) => write!(f, "{}", message),
			Self::Internal(error) => write!(f, "internal command error: {}", error),
		}
	}
}

/// A message to send back for an interaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reply {
	pub content: String,
	pub ephemeral: bool,
}

impl Reply {
	pub fn success(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			ephemeral: false,
		}
	}

	pub fn error(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			ephemeral: true,
		}
	}

	pub fn generic_failure() -> Self {
		Self::error(GENERIC_FAILURE_MESSAGE)
	}
}

/// Turns a handler failure into the reply the user sees.
pub fn error_reply(error: &CommandError) -> Reply {
	match error {
		CommandError::UserSafe(message) => Reply::error(message.as_str()),
		CommandError::Internal(_) => Reply::generic_failure(),
	}
}
