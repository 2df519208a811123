// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use twilight_model::application::command::Command;
use twilight_validate::command::CommandValidationError;

mod arguments;
mod descriptor;

pub use arguments::{ArgumentError, CommandArguments};
pub use descriptor::{CommandDescriptor, CommandHandler, CommandInvocation, CommandParameter, ParameterKind};

#[derive(Debug, Diagnostic)]
pub enum RegistryError {
	DuplicateCommand(String),
	UnknownCommand(String),
	InvalidDefinition(String, CommandValidationError),
}

impl std::error::Error for RegistryError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::InvalidDefinition(_, error) => Some(error),
			_ => None,
		}
	}
}

impl fmt::Display for RegistryError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DuplicateCommand(name) => write!(f, "a command named {} is already registered", name),
			Self::UnknownCommand(name) => write!(f, "no command named {} is registered", name),
			Self::InvalidDefinition(name, error) => write!(f, "command {} is not a valid declaration: {}", name, error),
		}
	}
}

/// All commands the bot handles, keyed by name.
///
/// The registry is filled once at startup and then shared read-only between dispatch tasks.
#[derive(Default)]
pub struct CommandRegistry {
	commands: BTreeMap<String, CommandDescriptor>,
}

impl CommandRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
		let entry = match self.commands.entry(descriptor.name().to_string()) {
			Entry::Occupied(_) => return Err(RegistryError::DuplicateCommand(descriptor.name().to_string())),
			Entry::Vacant(entry) => entry,
		};
		if let Err(error) = twilight_validate::command::command(&descriptor.definition()) {
			return Err(RegistryError::InvalidDefinition(descriptor.name().to_string(), error));
		}
		tracing::debug!(command = descriptor.name(), "Registered command");
		entry.insert(descriptor);
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, RegistryError> {
		self.commands
			.get(name)
			.ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))
	}

	/// Iterates over every registered command, ordered by name.
	pub fn list(&self) -> impl Iterator<Item = &CommandDescriptor> {
		self.commands.values()
	}

	/// Command declarations to send to Discord.
	pub fn definitions(&self) -> Vec<Command> {
		self.list().map(CommandDescriptor::definition).collect()
	}

	pub fn len(&self) -> usize {
		self.commands.len()
	}

	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}
}
