/*
 * watch_list/models.rs
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

use cautious_memory_core::PageId;
use diesel::sql_types::{BigInt, Bool, Text};

#[derive(Debug, QueryableByName)]
pub struct WatchResult {
    #[sql_type = "Bool"]
    pub found: bool,

    #[sql_type = "Bool"]
    pub inserted: bool,
}

#[derive(Debug, QueryableByName)]
pub struct WatchedPage {
    #[sql_type = "BigInt"]
    pub page_id: PageId,

    #[sql_type = "Text"]
    pub title: String,
}
