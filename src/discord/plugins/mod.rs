// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::commands::{CommandDescriptor, CommandRegistry, RegistryError};

mod bot;
mod promo;

pub use bot::BotPlugin;
pub use promo::PromoPlugin;

/// A group of related commands that registers itself with the bot.
///
/// Registering the same plugin twice fails with [`RegistryError::DuplicateCommand`].
pub trait Plugin: Send + Sync {
	fn name(&self) -> &str;

	fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), RegistryError>;
}

/// Registers several independent plugins against one registry, in the order they were added.
#[derive(Default)]
pub struct PluginAggregator {
	plugins: Vec<Box<dyn Plugin>>,
}

impl PluginAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
		self.plugins.push(Box::new(plugin));
		self
	}

	/// Returns the number of plugins that registered without error. A failing plugin doesn't stop the ones after it.
	pub fn register_all(&self, registry: &mut CommandRegistry) -> usize {
		let mut registered = 0;
		for plugin in self.plugins.iter() {
			match plugin.register_commands(registry) {
				Ok(()) => registered += 1,
				Err(error) => {
					tracing::error!(plugin = plugin.name(), source = ?error, "Failed to register plugin commands");
				}
			}
		}
		registered
	}
}

/// Registers each descriptor in turn, logging failures and carrying on. The first failure is returned.
fn register_each(
	registry: &mut CommandRegistry,
	descriptors: impl IntoIterator<Item = CommandDescriptor>,
) -> Result<(), RegistryError> {
	let mut first_error = None;
	for descriptor in descriptors {
		let name = descriptor.name().to_string();
		if let Err(error) = registry.register(descriptor) {
			tracing::error!(command = %name, source = ?error, "Failed to register command");
			if first_error.is_none() {
				first_error = Some(error);
			}
		}
	}
	match first_error {
		Some(error) => Err(error),
		None => Ok(()),
	}
}
