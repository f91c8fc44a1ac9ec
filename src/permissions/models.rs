/*
 * permissions/models.rs
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

use crate::schema::role_permissions;
use cautious_memory_core::Permissions;
use diesel::sql_types::{BigInt, Bool, Integer, Nullable};

#[derive(Debug, Insertable)]
#[table_name = "role_permissions"]
pub struct NewRolePermissions {
    pub role_id: i64,
    pub permissions: i32,
}

/// Aggregate inputs to a page permission check.
#[derive(Debug, QueryableByName)]
pub struct PermissionInputs {
    #[sql_type = "Nullable<Integer>"]
    pub base: Option<i32>,

    #[sql_type = "Integer"]
    pub allow: i32,

    #[sql_type = "Integer"]
    pub deny: i32,
}

#[derive(Debug, QueryableByName)]
pub struct PermissionsRow {
    #[sql_type = "Nullable<Integer>"]
    pub permissions: Option<i32>,
}

/// A page joined to its overwrites, if it has any.
#[derive(Debug, QueryableByName)]
pub struct PageOverwriteRow {
    #[sql_type = "Nullable<BigInt>"]
    pub entity_id: Option<i64>,

    #[sql_type = "Nullable<Integer>"]
    pub allow: Option<i32>,

    #[sql_type = "Nullable<Integer>"]
    pub deny: Option<i32>,
}

#[derive(Debug, QueryableByName)]
pub struct OverwritePair {
    #[sql_type = "Integer"]
    pub allow: i32,

    #[sql_type = "Integer"]
    pub deny: i32,
}

impl OverwritePair {
    #[inline]
    pub fn into_permissions(self) -> (Permissions, Permissions) {
        (
            Permissions::from_raw(self.allow),
            Permissions::from_raw(self.deny),
        )
    }
}

#[derive(Debug, QueryableByName)]
pub struct UnsetResult {
    #[sql_type = "Bool"]
    pub found: bool,

    #[sql_type = "Nullable<Integer>"]
    pub allow: Option<i32>,

    #[sql_type = "Nullable<Integer>"]
    pub deny: Option<i32>,
}

impl UnsetResult {
    /// The remaining overwrites, if the entity had any on the page.
    pub fn into_permissions(self) -> Option<(Permissions, Permissions)> {
        match (self.allow, self.deny) {
            (Some(allow), Some(deny)) => Some((
                Permissions::from_raw(allow),
                Permissions::from_raw(deny),
            )),
            _ => None,
        }
    }
}
