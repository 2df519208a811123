// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::bail;
use promo_bot::config::parse_config;
use promo_bot::discord::commands::CommandRegistry;
use promo_bot::discord::plugins::{BotPlugin, PluginAggregator, PromoPlugin};
use promo_bot::discord::{run_bot, set_up_client};
use promo_bot::promo::InMemoryPromoService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> miette::Result<()> {
	let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from("config.kdl"));
	let config = Arc::new(parse_config(&config_path).await?);

	tracing_subscriber::fmt().with_max_level(config.log_level).init();

	let promo_service = Arc::new(InMemoryPromoService::new());
	let plugins = PluginAggregator::new()
		.with(PromoPlugin::new(promo_service))
		.with(BotPlugin);
	let mut registry = CommandRegistry::new();
	plugins.register_all(&mut registry);
	if registry.is_empty() {
		bail!("No commands were registered");
	}

	let http_client = set_up_client(&config);
	run_bot(config, http_client, registry).await
}
