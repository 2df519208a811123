// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::event::InteractionEvent;
use miette::Diagnostic;
use std::fmt;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

/// The user that invoked a command. Discord IDs are non-zero, so a resolved actor can never be empty.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ActorId(Id<UserMarker>);

impl ActorId {
	pub fn new(user_id: Id<UserMarker>) -> Self {
		Self(user_id)
	}

	pub fn user_id(&self) -> Id<UserMarker> {
		self.0
	}
}

impl fmt::Display for ActorId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

/// Where the invoking user was found on the interaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActorSource {
	/// Direct messages carry the user at the top level of the interaction.
	Direct(Id<UserMarker>),
	/// Guild interactions carry the user inside the member data.
	GuildMember {
		guild_id: Option<Id<GuildMarker>>,
		user_id: Id<UserMarker>,
	},
}

impl ActorSource {
	pub fn actor_id(&self) -> ActorId {
		match self {
			Self::Direct(user_id) => ActorId::new(*user_id),
			Self::GuildMember { user_id, .. } => ActorId::new(*user_id),
		}
	}
}

#[derive(Debug, Diagnostic, Eq, PartialEq)]
pub enum IdentityError {
	MissingActor,
	MemberWithoutUser,
}

impl std::error::Error for IdentityError {}

impl fmt::Display for IdentityError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingActor => write!(f, "interaction carried neither a user nor a guild member"),
			Self::MemberWithoutUser => write!(f, "interaction carried a guild member without user data"),
		}
	}
}

/// Finds the invoking user, preferring the top-level user over the guild member.
pub fn resolve_actor(event: &InteractionEvent) -> Result<ActorSource, IdentityError> {
	if let Some(user_id) = event.user_id {
		return Ok(ActorSource::Direct(user_id));
	}
	let Some(member) = event.member.as_ref() else {
		return Err(IdentityError::MissingActor);
	};
	let Some(user_id) = member.user_id else {
		return Err(IdentityError::MemberWithoutUser);
	};
	Ok(ActorSource::GuildMember {
		guild_id: event.guild_id,
		user_id,
	})
}
