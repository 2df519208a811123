// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Plugin, register_each};
use crate::discord::commands::{CommandDescriptor, CommandHandler, CommandInvocation, CommandRegistry, RegistryError};
use crate::discord::utils::responses::CommandError;
use async_trait::async_trait;
use std::sync::Arc;

/// Commands about the bot itself.
pub struct BotPlugin;

impl Plugin for BotPlugin {
	fn name(&self) -> &str {
		"bot"
	}

	fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), RegistryError> {
		let ping = CommandDescriptor::new("ping", "Check that the bot is responding.", Arc::new(Ping)).dm_permitted(true);
		register_each(registry, [ping])
	}
}

struct Ping;

#[async_trait]
impl CommandHandler for Ping {
	async fn handle(&self, _invocation: CommandInvocation) -> Result<String, CommandError> {
		Ok(String::from("Pong!"))
	}
}
