// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::descriptor::{CommandParameter, ParameterKind};
use crate::discord::utils::responses::CommandError;
use miette::Diagnostic;
use std::collections::HashMap;
use std::fmt;
use twilight_model::application::interaction::application_command::{CommandDataOption, CommandOptionValue};
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

#[derive(Debug, Diagnostic, Eq, PartialEq)]
pub enum ArgumentError {
	MissingRequired(String),
	WrongKind { name: String, expected: ParameterKind },
}

impl std::error::Error for ArgumentError {}

impl fmt::Display for ArgumentError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingRequired(name) => write!(f, "required parameter {} was not supplied", name),
			Self::WrongKind { name, expected } => {
				write!(f, "parameter {} was supplied with a value that isn't {:?}", name, expected)
			}
		}
	}
}

impl From<ArgumentError> for CommandError {
	fn from(error: ArgumentError) -> Self {
		CommandError::internal(error)
	}
}

/// Values supplied for a command's declared parameters.
#[derive(Debug, Default)]
pub struct CommandArguments {
	values: HashMap<String, CommandOptionValue>,
}

impl CommandArguments {
	/// Binds the supplied options to the declared parameters.
	///
	/// Discord validates options before sending the interaction, so this only checks that required parameters are
	/// present and that each value has the declared type. Options that weren't declared are ignored.
	pub fn bind(parameters: &[CommandParameter], options: &[CommandDataOption]) -> Result<Self, ArgumentError> {
		let mut values = HashMap::new();
		for parameter in parameters.iter() {
			let Some(option) = options.iter().find(|option| option.name == parameter.name) else {
				if parameter.required {
					return Err(ArgumentError::MissingRequired(parameter.name.clone()));
				}
				continue;
			};
			if !value_matches_kind(&option.value, parameter.kind) {
				return Err(ArgumentError::WrongKind {
					name: parameter.name.clone(),
					expected: parameter.kind,
				});
			}
			values.insert(parameter.name.clone(), option.value.clone());
		}
		Ok(Self { values })
	}

	pub fn string(&self, name: &str) -> Result<Option<&str>, ArgumentError> {
		match self.values.get(name) {
			Some(CommandOptionValue::String(value)) => Ok(Some(value.as_str())),
			Some(_) => Err(wrong_kind(name, ParameterKind::String)),
			None => Ok(None),
		}
	}

	pub fn integer(&self, name: &str) -> Result<Option<i64>, ArgumentError> {
		match self.values.get(name) {
			Some(CommandOptionValue::Integer(value)) => Ok(Some(*value)),
			Some(_) => Err(wrong_kind(name, ParameterKind::Integer)),
			None => Ok(None),
		}
	}

	pub fn number(&self, name: &str) -> Result<Option<f64>, ArgumentError> {
		match self.values.get(name) {
			Some(CommandOptionValue::Number(value)) => Ok(Some(*value)),
			Some(_) => Err(wrong_kind(name, ParameterKind::Number)),
			None => Ok(None),
		}
	}

	pub fn boolean(&self, name: &str) -> Result<Option<bool>, ArgumentError> {
		match self.values.get(name) {
			Some(CommandOptionValue::Boolean(value)) => Ok(Some(*value)),
			Some(_) => Err(wrong_kind(name, ParameterKind::Boolean)),
			None => Ok(None),
		}
	}

	pub fn user(&self, name: &str) -> Result<Option<Id<UserMarker>>, ArgumentError> {
		match self.values.get(name) {
			Some(CommandOptionValue::User(value)) => Ok(Some(*value)),
			Some(_) => Err(wrong_kind(name, ParameterKind::User)),
			None => Ok(None),
		}
	}

	/// Gets a string parameter the command declared as required.
	pub fn required_string(&self, name: &str) -> Result<&str, ArgumentError> {
		self.string(name)?
			.ok_or_else(|| ArgumentError::MissingRequired(name.to_string()))
	}
}

fn wrong_kind(name: &str, expected: ParameterKind) -> ArgumentError {
	ArgumentError::WrongKind {
		name: name.to_string(),
		expected,
	}
}

fn value_matches_kind(value: &CommandOptionValue, kind: ParameterKind) -> bool {
	matches!(
		(value, kind),
		(CommandOptionValue::String(_), ParameterKind::String)
			| (CommandOptionValue::Integer(_), ParameterKind::Integer)
			| (CommandOptionValue::Number(_), ParameterKind::Number)
			| (CommandOptionValue::Boolean(_), ParameterKind::Boolean)
			| (CommandOptionValue::User(_), ParameterKind::User)
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn option(name: &str, value: CommandOptionValue) -> CommandDataOption {
		CommandDataOption {
			name: name.to_string(),
			value,
		}
	}

	fn promo_parameter() -> Vec<CommandParameter> {
		vec![CommandParameter::new("promo", "Promo code", ParameterKind::String).required(true)]
	}

	#[test]
	fn binds_declared_values() {
		let arguments = CommandArguments::bind(
			&promo_parameter(),
			&[option("promo", CommandOptionValue::String(String::from("SUMMER22")))],
		)
		.expect("arguments should bind");
		assert_eq!(arguments.required_string("promo"), Ok("SUMMER22"));
	}

	#[test]
	fn missing_required_parameter_is_an_error() {
		let result = CommandArguments::bind(&promo_parameter(), &[]);
		assert_eq!(
			result.map(|_| ()),
			Err(ArgumentError::MissingRequired(String::from("promo")))
		);
	}

	#[test]
	fn missing_optional_parameter_is_absent() {
		let parameters = vec![CommandParameter::new("count", "How many", ParameterKind::Integer)];
		let arguments = CommandArguments::bind(&parameters, &[]).expect("arguments should bind");
		assert_eq!(arguments.integer("count"), Ok(None));
	}

	#[test]
	fn mismatched_kind_is_an_error() {
		let result = CommandArguments::bind(&promo_parameter(), &[option("promo", CommandOptionValue::Integer(5))]);
		assert!(matches!(result, Err(ArgumentError::WrongKind { name, .. }) if name == "promo"));
	}

	#[test]
	fn undeclared_options_are_ignored() {
		let arguments = CommandArguments::bind(
			&promo_parameter(),
			&[
				option("extra", CommandOptionValue::Boolean(true)),
				option("promo", CommandOptionValue::String(String::from("A"))),
			],
		)
		.expect("arguments should bind");
		assert_eq!(arguments.boolean("extra"), Ok(None));
	}

	#[test]
	fn required_string_without_a_value_reports_it_missing() {
		let parameters = vec![CommandParameter::new("note", "A note", ParameterKind::String)];
		let arguments = CommandArguments::bind(&parameters, &[]).expect("arguments should bind");
		assert_eq!(
			arguments.required_string("note"),
			Err(ArgumentError::MissingRequired(String::from("note")))
		);
	}

	#[test]
	fn typed_accessors_reject_other_kinds() {
		let parameters = vec![
			CommandParameter::new("who", "Who", ParameterKind::User),
			CommandParameter::new("ratio", "Ratio", ParameterKind::Number),
		];
		let arguments = CommandArguments::bind(
			&parameters,
			&[
				option("who", CommandOptionValue::User(Id::new(9))),
				option("ratio", CommandOptionValue::Number(0.5)),
			],
		)
		.expect("arguments should bind");
		assert_eq!(arguments.user("who"), Ok(Some(Id::new(9))));
		assert_eq!(arguments.number("ratio"), Ok(Some(0.5)));
		assert!(arguments.string("who").is_err());
	}
}
