/*
 * models/overwrite.rs
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

use super::prelude::*;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageOverwrite {
    entity_id: EntityId,
    allow: Permissions,
    deny: Permissions,
}

impl PageOverwrite {
    #[inline]
    pub fn new(entity_id: EntityId, allow: Permissions, deny: Permissions) -> Self {
        PageOverwrite {
            entity_id,
            allow,
            deny,
        }
    }

    #[inline]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    #[inline]
    pub fn allow(&self) -> Permissions {
        self.allow
    }

    #[inline]
    pub fn deny(&self) -> Permissions {
        self.deny
    }

    #[inline]
    pub fn pair(&self) -> (Permissions, Permissions) {
        (self.allow, self.deny)
    }
}
