/*
 * server/permissions.rs
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

use super::Server;
use crate::service_prelude::*;

impl Server {
    /// Resolves what a member may do on the given page.
    #[inline]
    pub async fn permissions_for(&self, member: &Member, title: &str) -> Result<Permissions> {
        self.permissions.permissions_for(member, title).await
    }

    /// Resolves what a member may do based on their roles alone.
    #[inline]
    pub async fn member_permissions(&self, member: &Member) -> Result<Permissions> {
        self.permissions.member_permissions(member).await
    }

    #[inline]
    pub async fn highest_manage_permissions_role(&self, member: &Member) -> Result<Option<RoleId>> {
        self.permissions.highest_manage_permissions_role(member).await
    }

    #[inline]
    pub async fn check_permissions(
        &self,
        member: &Member,
        required: Permissions,
        title: &str,
    ) -> Result<()> {
        self.permissions
            .check_permissions(member, required, title)
            .await
    }

    #[inline]
    pub async fn get_role_permissions(&self, role_id: RoleId) -> Result<Permissions> {
        self.permissions.get_role_permissions(role_id).await
    }

    #[inline]
    pub async fn set_role_permissions(&self, role_id: RoleId, perms: Permissions) -> Result<()> {
        self.permissions.set_role_permissions(role_id, perms).await
    }

    #[inline]
    pub async fn allow_role_permissions(
        &self,
        role_id: RoleId,
        perms: Permissions,
    ) -> Result<Permissions> {
        self.permissions.allow_role_permissions(role_id, perms).await
    }

    #[inline]
    pub async fn deny_role_permissions(
        &self,
        role_id: RoleId,
        perms: Permissions,
    ) -> Result<Permissions> {
        self.permissions.deny_role_permissions(role_id, perms).await
    }

    #[inline]
    pub async fn get_page_overwrites(
        &self,
        guild_id: GuildId,
        title: &str,
    ) -> Result<Vec<PageOverwrite>> {
        self.permissions.get_page_overwrites(guild_id, title).await
    }

    #[inline]
    pub async fn set_page_overwrites(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
        allow: Permissions,
        deny: Permissions,
    ) -> Result<()> {
        self.permissions
            .set_page_overwrites(guild_id, title, entity_id, allow, deny)
            .await
    }

    #[inline]
    pub async fn add_page_permissions(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
        allow: Permissions,
        deny: Permissions,
    ) -> Result<(Permissions, Permissions)> {
        self.permissions
            .add_page_permissions(guild_id, title, entity_id, allow, deny)
            .await
    }

    #[inline]
    pub async fn unset_page_overwrites(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
    ) -> Result<()> {
        self.permissions
            .unset_page_overwrites(guild_id, title, entity_id)
            .await
    }

    #[inline]
    pub async fn unset_page_permissions(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
        perms: Permissions,
    ) -> Result<Option<(Permissions, Permissions)>> {
        self.permissions
            .unset_page_permissions(guild_id, title, entity_id, perms)
            .await
    }
}
