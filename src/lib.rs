/*
 * lib.rs
 *
 * cautious-memory - Guild wiki storage, permissions and watch lists
 * Copyright (C) 2019-2020 Ammon Smith
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

#![deny(missing_debug_implementations)]

extern crate async_trait;
extern crate cautious_memory_core;
extern crate chrono;

#[macro_use]
extern crate diesel;
extern crate either;
extern crate futures;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde;
extern crate toml;

#[macro_use]
mod macros;

mod config;
mod permissions;
mod schema;
mod server;
mod utils;
mod watch_list;
mod wiki;

#[cfg(test)]
mod test;

mod service_prelude {
    pub use crate::schema::*;
    pub use crate::{Error, Result};
    pub use cautious_memory_core::prelude::*;
    pub use chrono::prelude::*;
    pub use diesel::prelude::*;
    pub use diesel::sql_types::{Array, BigInt, Integer, Text, Timestamptz};
    pub use diesel::PgConnection;
    pub use std::fmt::{self, Debug};
    pub use std::sync::Arc;
}

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::server::Server;
    pub use crate::watch_list::{Delivery, DeliveryReport, Directory, Notifier, PageEdit};
    pub use cautious_memory_core::prelude::*;
}

pub use self::prelude::*;
pub use cautious_memory_core::{Result, StdResult};
