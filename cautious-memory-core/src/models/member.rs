/*
 * models/member.rs
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

/// A guild member as reported by the chat platform.
///
/// Roles are ordered from lowest to highest in the guild's hierarchy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    guild_id: GuildId,
    user_id: UserId,
    roles: Vec<RoleId>,
}

impl Member {
    #[inline]
    pub fn new(guild_id: GuildId, user_id: UserId, roles: Vec<RoleId>) -> Self {
        Member {
            guild_id,
            user_id,
            roles,
        }
    }

    #[inline]
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[inline]
    pub fn roles(&self) -> &[RoleId] {
        &self.roles
    }

    /// Every id permissions may be attached to: each role, then the member.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.roles
            .iter()
            .copied()
            .map(EntityId::from)
            .chain(std::iter::once(EntityId::from(self.user_id)))
            .collect()
    }
}

#[test]
fn entity_ids() {
    let member = Member::new(
        GuildId::from_raw(1),
        UserId::from_raw(300),
        vec![RoleId::from_raw(10), RoleId::from_raw(20)],
    );

    let ids = member
        .entity_ids()
        .into_iter()
        .map(EntityId::to_i64)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![10, 20, 300]);
}
