// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{Plugin, register_each};
use crate::discord::commands::{
	CommandDescriptor, CommandHandler, CommandInvocation, CommandParameter, CommandRegistry, ParameterKind,
	RegistryError,
};
use crate::discord::utils::responses::CommandError;
use crate::promo::PromoService;
use async_trait::async_trait;
use std::sync::Arc;

const PROMO_PARAMETER: &str = "promo";

/// The `create` and `use` promo code commands.
pub struct PromoPlugin {
	service: Arc<dyn PromoService>,
}

impl PromoPlugin {
	pub fn new(service: Arc<dyn PromoService>) -> Self {
		Self { service }
	}
}

impl Plugin for PromoPlugin {
	fn name(&self) -> &str {
		"promo"
	}

	fn register_commands(&self, registry: &mut CommandRegistry) -> Result<(), RegistryError> {
		let create = CommandDescriptor::new(
			"create",
			"The command creating a new user promo code.",
			Arc::new(CreatePromo {
				service: Arc::clone(&self.service),
			}),
		)
		.parameter(promo_parameter())
		.dm_permitted(true);
		let use_promo = CommandDescriptor::new(
			"use",
			"The command use a user promo code.",
			Arc::new(UsePromo {
				service: Arc::clone(&self.service),
			}),
		)
		.parameter(promo_parameter())
		.dm_permitted(true);

		register_each(registry, [create, use_promo])
	}
}

fn promo_parameter() -> CommandParameter {
	CommandParameter::new(PROMO_PARAMETER, "Promo code.", ParameterKind::String).required(true)
}

struct CreatePromo {
	service: Arc<dyn PromoService>,
}

#[async_trait]
impl CommandHandler for CreatePromo {
	async fn handle(&self, invocation: CommandInvocation) -> Result<String, CommandError> {
		let code = invocation.arguments.required_string(PROMO_PARAMETER)?;
		let code = self.service.create(invocation.actor, code).await?;
		Ok(format!("You created promo code: {}", code))
	}
}

struct UsePromo {
	service: Arc<dyn PromoService>,
}

#[async_trait]
impl CommandHandler for UsePromo {
	async fn handle(&self, invocation: CommandInvocation) -> Result<String, CommandError> {
		let code = invocation.arguments.required_string(PROMO_PARAMETER)?;
		let code = self.service.redeem(invocation.actor, code).await?;
		Ok(format!("You used promo code: {}", code))
	}
}
