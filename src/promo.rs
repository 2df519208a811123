// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::identity::ActorId;
use crate::discord::utils::responses::CommandError;
use async_trait::async_trait;
use miette::Diagnostic;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use tokio::sync::RwLock;

/// Promo code operations the promo commands are backed by.
///
/// Both operations return the code as the service stored it, which may differ from what the user typed.
#[async_trait]
pub trait PromoService: Send + Sync {
	async fn create(&self, actor: ActorId, code: &str) -> Result<String, PromoError>;

	async fn redeem(&self, actor: ActorId, code: &str) -> Result<String, PromoError>;
}

#[derive(Debug, Diagnostic)]
pub enum PromoError {
	InvalidCode,
	AlreadyExists,
	AlreadyOwnsCode,
	NotFound,
	OwnCode,
	AlreadyRedeemed,
	Backend(Box<dyn Error + Send + Sync>),
}

impl Error for PromoError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Backend(error) => Some(error.as_ref()),
			_ => None,
		}
	}
}

impl fmt::Display for PromoError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::InvalidCode => write!(f, "Promo codes can't be empty."),
			Self::AlreadyExists => write!(f, "That promo code already exists."),
			Self::AlreadyOwnsCode => write!(f, "You already have a promo code."),
			Self::NotFound => write!(f, "That promo code doesn't exist."),
			Self::OwnCode => write!(f, "You can't use your own promo code."),
			Self::AlreadyRedeemed => write!(f, "You've already used a promo code."),
			Self::Backend(error) => write!(f, "promo backend error: {}", error),
		}
	}
}

impl From<PromoError> for CommandError {
	fn from(error: PromoError) -> Self {
		match error {
			PromoError::Backend(error) => CommandError::Internal(error),
			error => CommandError::user_safe(error.to_string()),
		}
	}
}

#[derive(Default)]
struct PromoState {
	owners: HashMap<String, ActorId>,
	codes_by_owner: HashMap<ActorId, String>,
	redeemed_by: HashMap<ActorId, String>,
}

/// Promo codes kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryPromoService {
	state: RwLock<PromoState>,
}

impl InMemoryPromoService {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl PromoService for InMemoryPromoService {
	async fn create(&self, actor: ActorId, code: &str) -> Result<String, PromoError> {
		let code = code.trim();
		if code.is_empty() {
			return Err(PromoError::InvalidCode);
		}

		let mut state = self.state.write().await;
		if state.owners.contains_key(code) {
			return Err(PromoError::AlreadyExists);
		}
		if state.codes_by_owner.contains_key(&actor) {
			return Err(PromoError::AlreadyOwnsCode);
		}
		state.owners.insert(code.to_string(), actor);
		state.codes_by_owner.insert(actor, code.to_string());
		tracing::info!(%actor, code, "Promo code created");
		Ok(code.to_string())
	}

	async fn redeem(&self, actor: ActorId, code: &str) -> Result<String, PromoError> {
		let code = code.trim();
		let mut state = self.state.write().await;
		let Some(owner) = state.owners.get(code).copied() else {
			return Err(PromoError::NotFound);
		};
		if owner == actor {
			return Err(PromoError::OwnCode);
		}
		if state.redeemed_by.contains_key(&actor) {
			return Err(PromoError::AlreadyRedeemed);
		}
		state.redeemed_by.insert(actor, code.to_string());
		tracing::info!(%actor, code, "Promo code used");
		Ok(code.to_string())
	}
}
