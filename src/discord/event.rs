// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_model::application::interaction::Interaction;
use twilight_model::application::interaction::application_command::{CommandData, CommandDataOption};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, InteractionMarker, UserMarker};

/// A single slash command invocation, detached from the gateway payload it arrived in.
#[derive(Clone, Debug)]
pub struct InteractionEvent {
	pub id: Id<InteractionMarker>,
	pub token: String,
	pub command_name: String,
	pub guild_id: Option<Id<GuildMarker>>,
	pub user_id: Option<Id<UserMarker>>,
	pub member: Option<MemberRef>,
	pub options: Vec<CommandDataOption>,
}

/// The parts of guild member data needed to identify who invoked a command.
#[derive(Clone, Debug)]
pub struct MemberRef {
	pub user_id: Option<Id<UserMarker>>,
}

impl InteractionEvent {
	pub fn new(id: Id<InteractionMarker>, token: impl Into<String>, command_name: impl Into<String>) -> Self {
		Self {
			id,
			token: token.into(),
			command_name: command_name.into(),
			guild_id: None,
			user_id: None,
			member: None,
			options: Vec::new(),
		}
	}

	pub fn from_application_command(interaction: &Interaction, command_data: &CommandData) -> Self {
		Self {
			id: interaction.id,
			token: interaction.token.clone(),
			command_name: command_data.name.clone(),
			guild_id: interaction.guild_id,
			user_id: interaction.user.as_ref().map(|user| user.id),
			member: interaction.member.as_ref().map(|member| MemberRef {
				user_id: member.user.as_ref().map(|user| user.id),
			}),
			options: command_data.options.clone(),
		}
	}
}
