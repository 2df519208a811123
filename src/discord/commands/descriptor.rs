// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::arguments::CommandArguments;
use crate::discord::identity::ActorId;
use crate::discord::utils::responses::CommandError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use twilight_model::application::command::{Command, CommandOption, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_util::builder::command::{
	BooleanBuilder, CommandBuilder, IntegerBuilder, NumberBuilder, StringBuilder, UserBuilder,
};

/// Everything a handler gets to work with for one invocation.
#[derive(Debug)]
pub struct CommandInvocation {
	pub actor: ActorId,
	pub arguments: CommandArguments,
}

/// Runs a command and produces the text to reply with.
#[async_trait]
pub trait CommandHandler: Send + Sync {
	async fn handle(&self, invocation: CommandInvocation) -> Result<String, CommandError>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterKind {
	String,
	Integer,
	Number,
	Boolean,
	User,
}

#[derive(Clone, Debug)]
pub struct CommandParameter {
	pub name: String,
	pub description: String,
	pub kind: ParameterKind,
	pub required: bool,
}

impl CommandParameter {
	pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ParameterKind) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			kind,
			required: false,
		}
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	fn definition(&self) -> CommandOption {
		let name = self.name.clone();
		let description = self.description.clone();
		match self.kind {
			ParameterKind::String => StringBuilder::new(name, description).required(self.required).build(),
			ParameterKind::Integer => IntegerBuilder::new(name, description).required(self.required).build(),
			ParameterKind::Number => NumberBuilder::new(name, description).required(self.required).build(),
			ParameterKind::Boolean => BooleanBuilder::new(name, description).required(self.required).build(),
			ParameterKind::User => UserBuilder::new(name, description).required(self.required).build(),
		}
	}
}

/// A command's declaration together with the handler bound to it.
#[derive(Clone)]
pub struct CommandDescriptor {
	name: String,
	description: String,
	parameters: Vec<CommandParameter>,
	dm_permitted: bool,
	handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
	pub fn new(name: impl Into<String>, description: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			parameters: Vec::new(),
			dm_permitted: false,
			handler,
		}
	}

	pub fn parameter(mut self, parameter: CommandParameter) -> Self {
		self.parameters.push(parameter);
		self
	}

	pub fn dm_permitted(mut self, dm_permitted: bool) -> Self {
		self.dm_permitted = dm_permitted;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn parameters(&self) -> &[CommandParameter] {
		&self.parameters
	}

	pub fn is_dm_permitted(&self) -> bool {
		self.dm_permitted
	}

	pub fn handler(&self) -> &Arc<dyn CommandHandler> {
		&self.handler
	}

	/// Builds the declaration Discord needs to show the command to users.
	pub fn definition(&self) -> Command {
		let contexts = if self.dm_permitted {
			vec![
				InteractionContextType::Guild,
				InteractionContextType::BotDm,
				InteractionContextType::PrivateChannel,
			]
		} else {
			vec![InteractionContextType::Guild]
		};
		let mut builder = CommandBuilder::new(self.name.clone(), self.description.clone(), CommandType::ChatInput)
			.contexts(contexts);
		for parameter in self.parameters.iter() {
			builder = builder.option(parameter.definition());
		}
		builder.build()
	}
}

impl fmt::Debug for CommandDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandDescriptor")
			.field("name", &self.name)
			.field("description", &self.description)
			.field("parameters", &self.parameters)
			.field("dm_permitted", &self.dm_permitted)
			.finish_non_exhaustive()
	}
}
