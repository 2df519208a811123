// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod commands;
mod connection;
pub mod dispatch;
pub mod event;
pub mod identity;
pub mod plugins;
pub mod utils;

pub use connection::{HttpResponder, run_bot, set_up_client};
