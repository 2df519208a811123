// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kdl::{KdlDocument, KdlNode};
use miette::{IntoDiagnostic, Result, bail};
use std::time::Duration;
use tokio::fs::read_to_string;
use tracing::Level;

const DEFAULT_RESPONSE_WINDOW: Duration = Duration::from_millis(3000);

pub async fn parse_config(config_path: &str) -> Result<ConfigData> {
	let config_file_contents = read_to_string(config_path).await.into_diagnostic()?;
	parse_config_str(&config_file_contents)
}

pub fn parse_config_str(config_file_contents: &str) -> Result<ConfigData> {
	let document: KdlDocument = config_file_contents.parse()?;

	let Some(discord_node) = document.get("discord") else {
		bail!("Config is missing the discord block");
	};
	let discord = DiscordConfig::from_node(discord_node)?;

	let dispatch = match document.get("dispatch") {
		Some(dispatch_node) => DispatchConfig::from_node(dispatch_node)?,
		None => DispatchConfig::default(),
	};

	let log_level = match document.get_arg("log-level") {
		Some(value) => {
			let Some(level) = value.as_string() else {
				bail!("log-level must be a string");
			};
			level.parse::<Level>().into_diagnostic()?
		}
		None => Level::INFO,
	};

	Ok(ConfigData {
		discord,
		dispatch,
		log_level,
	})
}

#[derive(Debug)]
pub struct ConfigData {
	pub discord: DiscordConfig,
	pub dispatch: DispatchConfig,
	pub log_level: Level,
}

#[derive(Debug)]
pub struct DiscordConfig {
	pub bot_token: String,
}

impl DiscordConfig {
	fn from_node(node: &KdlNode) -> Result<Self> {
		let Some(bot_token) = node.children().and_then(|children| children.get_arg("bot-token")) else {
			bail!("Config is missing discord.bot-token");
		};
		let Some(bot_token) = bot_token.as_string() else {
			bail!("discord.bot-token must be a string");
		};
		if bot_token.is_empty() {
			bail!("discord.bot-token must not be empty");
		}
		Ok(Self {
			bot_token: bot_token.to_string(),
		})
	}
}

/// Dispatch tuning. The response window is Discord's deadline for the initial interaction reply; exceeding it only
/// produces a warning.
#[derive(Debug)]
pub struct DispatchConfig {
	pub response_window: Duration,
}

impl DispatchConfig {
	fn from_node(node: &KdlNode) -> Result<Self> {
		let Some(window) = node
			.children()
			.and_then(|children| children.get_arg("response-window-ms"))
		else {
			return Ok(Self::default());
		};
		let Some(window) = window.as_integer() else {
			bail!("dispatch.response-window-ms must be an integer");
		};
		let Ok(window) = u64::try_from(window) else {
			bail!("dispatch.response-window-ms must be a non-negative number of milliseconds");
		};
		Ok(Self {
			response_window: Duration::from_millis(window),
		})
	}
}

impl Default for DispatchConfig {
	fn default() -> Self {
		Self {
			response_window: DEFAULT_RESPONSE_WINDOW,
		}
	}
}
