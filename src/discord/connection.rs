// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::commands::CommandRegistry;
use super::dispatch::{Dispatcher, InteractionResponder, ReplyError};
use super::event::InteractionEvent;
use super::utils::responses::Reply;
use crate::config::ConfigData;
use async_trait::async_trait;
use miette::IntoDiagnostic;
use std::sync::Arc;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt};
use twilight_http::client::Client;
use twilight_model::application::interaction::InteractionData;
use twilight_model::channel::message::MessageFlags;
use twilight_model::gateway::event::Event;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::InteractionResponseDataBuilder;

pub fn set_up_client(config: &ConfigData) -> Arc<Client> {
	Arc::new(Client::new(config.discord.bot_token.clone()))
}

/// Replies to interactions through Discord's HTTP API.
pub struct HttpResponder {
	http_client: Arc<Client>,
	application_id: Id<ApplicationMarker>,
}

impl HttpResponder {
	pub fn new(http_client: Arc<Client>, application_id: Id<ApplicationMarker>) -> Self {
		Self {
			http_client,
			application_id,
		}
	}
}

#[async_trait]
impl InteractionResponder for HttpResponder {
	async fn respond(&self, event: &InteractionEvent, reply: &Reply) -> Result<(), ReplyError> {
		let mut response = InteractionResponseDataBuilder::new().content(reply.content.clone());
		if reply.ephemeral {
			response = response.flags(MessageFlags::EPHEMERAL);
		}
		let response = InteractionResponse {
			kind: InteractionResponseType::ChannelMessageWithSource,
			data: Some(response.build()),
		};
		self.http_client
			.interaction(self.application_id)
			.create_response(event.id, &event.token, &response)
			.await
			.map_err(|error| ReplyError(Box::new(error)))?;
		Ok(())
	}
}

pub async fn run_bot(config: Arc<ConfigData>, http_client: Arc<Client>, registry: CommandRegistry) -> miette::Result<()> {
	let mut shard = Shard::new(ShardId::ONE, config.discord.bot_token.clone(), Intents::empty());

	let application_id = {
		let application_response = http_client.current_user_application().await.into_diagnostic()?;
		application_response.model().await.into_diagnostic()?.id
	};

	{
		let interaction_client = http_client.interaction(application_id);
		let commands = registry.definitions();
		interaction_client
			.set_global_commands(&commands)
			.await
			.into_diagnostic()?;
		tracing::info!(count = commands.len(), "Declared commands to Discord");
	}

	let responder = HttpResponder::new(Arc::clone(&http_client), application_id);
	let dispatcher = Arc::new(Dispatcher::new(
		Arc::new(registry),
		responder,
		config.dispatch.response_window,
	));

	let event_types = EventTypeFlags::INTERACTION_CREATE | EventTypeFlags::READY;
	while let Some(event) = shard.next_event(event_types).await {
		let event = match event {
			Ok(event) => event,
			Err(error) => {
				tracing::warn!(source = ?error, "error receiving event");
				continue;
			}
		};

		tokio::spawn(handle_event(event, Arc::clone(&dispatcher)));
	}

	Ok(())
}

async fn handle_event(event: Event, dispatcher: Arc<Dispatcher<HttpResponder>>) {
	tracing::debug!("Incoming gateway message: {:?}", event);
	match event {
		Event::InteractionCreate(interaction) => match &interaction.data {
			Some(InteractionData::ApplicationCommand(command_data)) => {
				let event = InteractionEvent::from_application_command(&interaction, command_data);
				dispatcher.dispatch(event).await;
			}
			_ => (),
		},
		Event::Ready(_) => {
			tracing::info!("Discord gateway is ready");
		}
		_ => (),
	}
}
