/*
 * models/mod.rs
 *
 * cautious-memory-core - Core types for the cautious-memory wiki
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

mod member;
mod overwrite;
mod page;
mod revision;

mod prelude {
    pub use crate::permissions::Permissions;
    pub use crate::types::*;
    pub use chrono::prelude::*;
    pub use diesel::sql_types::{BigInt, Text, Timestamptz};
}

pub use self::member::Member;
pub use self::overwrite::PageOverwrite;
pub use self::page::Page;
pub use self::revision::{RecentRevision, Revision};
