/*
 * permissions/service.rs
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

use super::models::*;
use crate::service_prelude::*;
use diesel::pg::upsert::excluded;
use std::collections::HashSet;

// The page lookup lives inside each statement rather than in a separate
// query. If the title doesn't resolve, the page id is NULL, which either
// matches nothing or trips the NOT NULL constraint on `page_permissions`.
// Writes which can trip it run in a savepoint so the failure stays contained.

const PERMISSIONS_FOR_QUERY: &str = "
    WITH page AS (
        SELECT page_id
        FROM pages
        WHERE guild_id = $1 AND lower(title) = lower($2)
    )
    SELECT
        (
            SELECT bit_or(permissions)
            FROM role_permissions
            WHERE role_id = ANY ($3)
        ) AS base,
        coalesce(bit_or(allow), 0) AS allow,
        coalesce(bit_or(deny), 0) AS deny
    FROM page_permissions
    WHERE
        page_id = (SELECT page_id FROM page)
        AND entity_id = ANY ($3)
";

const MEMBER_PERMISSIONS_QUERY: &str = "
    SELECT bit_or(permissions) AS permissions
    FROM role_permissions
    WHERE role_id = ANY ($1)
";

const ALLOW_ROLE_QUERY: &str = "
    INSERT INTO role_permissions (role_id, permissions)
    VALUES ($1, $3)
    ON CONFLICT (role_id) DO UPDATE SET
        permissions = role_permissions.permissions | $2
    RETURNING permissions
";

const DENY_ROLE_QUERY: &str = "
    INSERT INTO role_permissions (role_id, permissions)
    VALUES ($1, $3)
    ON CONFLICT (role_id) DO UPDATE SET
        permissions = role_permissions.permissions & ~$2::INTEGER
    RETURNING permissions
";

const GET_OVERWRITES_QUERY: &str = "
    SELECT entity_id, allow, deny
    FROM pages
    LEFT JOIN page_permissions USING (page_id)
    WHERE guild_id = $1 AND lower(title) = lower($2)
    ORDER BY entity_id
";

const SET_OVERWRITES_QUERY: &str = "
    WITH page AS (
        SELECT page_id
        FROM pages
        WHERE guild_id = $1 AND lower(title) = lower($2)
    )
    INSERT INTO page_permissions (page_id, entity_id, allow, deny)
    VALUES ((SELECT page_id FROM page), $3, $4, $5)
    ON CONFLICT (page_id, entity_id) DO UPDATE SET
        allow = EXCLUDED.allow,
        deny = EXCLUDED.deny
";

const ADD_OVERWRITES_QUERY: &str = "
    WITH page AS (
        SELECT page_id
        FROM pages
        WHERE guild_id = $1 AND lower(title) = lower($2)
    )
    INSERT INTO page_permissions (page_id, entity_id, allow, deny)
    VALUES ((SELECT page_id FROM page), $3, $4, $5)
    ON CONFLICT (page_id, entity_id) DO UPDATE SET
        allow = (page_permissions.allow | EXCLUDED.allow) & ~EXCLUDED.deny,
        deny = (page_permissions.deny | EXCLUDED.deny) & ~EXCLUDED.allow
    RETURNING allow, deny
";

const UNSET_OVERWRITES_QUERY: &str = "
    WITH page AS (
        SELECT page_id
        FROM pages
        WHERE guild_id = $1 AND lower(title) = lower($2)
    )
    DELETE FROM page_permissions
    WHERE
        page_id = (SELECT page_id FROM page)
        AND entity_id = $3
";

const UNSET_PERMISSIONS_QUERY: &str = "
    WITH page AS (
        SELECT page_id
        FROM pages
        WHERE guild_id = $1 AND lower(title) = lower($2)
    ),
    updated AS (
        UPDATE page_permissions SET
            allow = allow & ~$4::INTEGER,
            deny = deny & ~$4::INTEGER
        WHERE
            page_id = (SELECT page_id FROM page)
            AND entity_id = $3
        RETURNING allow, deny
    )
    SELECT
        EXISTS (SELECT 1 FROM page) AS found,
        (SELECT allow FROM updated) AS allow,
        (SELECT deny FROM updated) AS deny
";

fn raw_ids<I, T>(ids: I) -> Vec<i64>
where
    I: IntoIterator<Item = T>,
    T: Into<i64>,
{
    ids.into_iter().map(Into::into).collect()
}

pub struct PermissionsService {
    conn: Arc<PgConnection>,
}

impl PermissionsService {
    #[inline]
    pub fn new(conn: &Arc<PgConnection>) -> Self {
        debug!("Creating permissions service");

        let conn = Arc::clone(conn);
        PermissionsService { conn }
    }

    /// Resolves what a member may do on a page.
    ///
    /// Role entries for every role the member has (and the member's own id)
    /// are merged into the base, falling back to the default set if none
    /// exist. Page overwrites for the same ids are then layered on top.
    pub async fn permissions_for(&self, member: &Member, title: &str) -> Result<Permissions> {
        debug!(
            "Resolving permissions for user ID {} on page '{}' in guild ID {}",
            member.user_id(),
            title,
            member.guild_id(),
        );

        let PermissionInputs { base, allow, deny } = diesel::sql_query(PERMISSIONS_FOR_QUERY)
            .bind::<BigInt, _>(member.guild_id())
            .bind::<Text, _>(title)
            .bind::<Array<BigInt>, _>(raw_ids(member.entity_ids()))
            .get_result::<PermissionInputs>(&*self.conn)?;

        let base = base.map(Permissions::from_raw).unwrap_or_default();
        let allow = Permissions::from_raw(allow);
        let deny = Permissions::from_raw(deny);

        trace!("Base {}, allow {}, deny {}", base, allow, deny);
        Ok(Permissions::resolve(base, allow, deny))
    }

    /// Resolves the member's permissions from their roles alone.
    pub async fn member_permissions(&self, member: &Member) -> Result<Permissions> {
        debug!(
            "Resolving role permissions for user ID {} in guild ID {}",
            member.user_id(),
            member.guild_id(),
        );

        let row = diesel::sql_query(MEMBER_PERMISSIONS_QUERY)
            .bind::<Array<BigInt>, _>(raw_ids(member.roles().iter().copied()))
            .get_result::<PermissionsRow>(&*self.conn)?;

        Ok(row
            .permissions
            .map(Permissions::from_raw)
            .unwrap_or_default())
    }

    /// Finds the highest of the member's roles which may manage permissions.
    pub async fn highest_manage_permissions_role(&self, member: &Member) -> Result<Option<RoleId>> {
        debug!(
            "Finding highest permission-managing role for user ID {}",
            member.user_id(),
        );

        let rows = role_permissions::table
            .filter(role_permissions::role_id.eq_any(raw_ids(member.roles().iter().copied())))
            .select((role_permissions::role_id, role_permissions::permissions))
            .load::<(RoleId, i32)>(&*self.conn)?;

        let managers = rows
            .into_iter()
            .filter(|&(_, perms)| {
                Permissions::from_raw(perms).contains(Permissions::MANAGE_PERMISSIONS)
            })
            .map(|(role_id, _)| role_id)
            .collect::<HashSet<_>>();

        let role_id = member
            .roles()
            .iter()
            .rev()
            .copied()
            .find(|role_id| managers.contains(role_id));

        Ok(role_id)
    }

    /// Fails with `MissingPermissions` unless every required permission is held.
    pub async fn check_permissions(
        &self,
        member: &Member,
        required: Permissions,
        title: &str,
    ) -> Result<()> {
        let held = self.permissions_for(member, title).await?;
        let missing = required - held;

        if missing.is_empty() {
            Ok(())
        } else {
            debug!(
                "User ID {} is missing {} on page '{}'",
                member.user_id(),
                missing,
                title,
            );

            Err(Error::MissingPermissions(missing))
        }
    }

    pub async fn get_role_permissions(&self, role_id: RoleId) -> Result<Permissions> {
        debug!("Getting permissions for role ID {}", role_id);

        let perms = role_permissions::table
            .find(role_id)
            .select(role_permissions::permissions)
            .first::<i32>(&*self.conn)
            .optional()?;

        Ok(perms.map(Permissions::from_raw).unwrap_or_default())
    }

    /// Replaces the permissions for a role.
    ///
    /// There's no way to unset them, since unset means the default set.
    /// Use `deny_role_permissions()` to take permissions away.
    pub async fn set_role_permissions(&self, role_id: RoleId, perms: Permissions) -> Result<()> {
        info!("Setting permissions for role ID {} to {}", role_id, perms);

        let model = NewRolePermissions {
            role_id: role_id.into(),
            permissions: perms.to_raw(),
        };

        diesel::insert_into(role_permissions::table)
            .values(&model)
            .on_conflict(role_permissions::role_id)
            .do_update()
            .set(role_permissions::permissions.eq(excluded(role_permissions::permissions)))
            .execute(&*self.conn)?;

        Ok(())
    }

    /// Grants additional permissions to a role, returning the new set.
    pub async fn allow_role_permissions(
        &self,
        role_id: RoleId,
        perms: Permissions,
    ) -> Result<Permissions> {
        info!("Allowing {} for role ID {}", perms, role_id);

        let row = diesel::sql_query(ALLOW_ROLE_QUERY)
            .bind::<BigInt, _>(role_id)
            .bind::<Integer, _>(perms.to_raw())
            .bind::<Integer, _>((perms | Permissions::DEFAULT).to_raw())
            .get_result::<PermissionsRow>(&*self.conn)?;

        Ok(row
            .permissions
            .map(Permissions::from_raw)
            .unwrap_or_default())
    }

    /// Revokes permissions from a role, returning the new set.
    pub async fn deny_role_permissions(
        &self,
        role_id: RoleId,
        perms: Permissions,
    ) -> Result<Permissions> {
        info!("Denying {} for role ID {}", perms, role_id);

        let row = diesel::sql_query(DENY_ROLE_QUERY)
            .bind::<BigInt, _>(role_id)
            .bind::<Integer, _>(perms.to_raw())
            .bind::<Integer, _>((Permissions::DEFAULT - perms).to_raw())
            .get_result::<PermissionsRow>(&*self.conn)?;

        Ok(row
            .permissions
            .map(Permissions::from_raw)
            .unwrap_or_default())
    }

    /// Gets every overwrite set on a page.
    pub async fn get_page_overwrites(
        &self,
        guild_id: GuildId,
        title: &str,
    ) -> Result<Vec<PageOverwrite>> {
        debug!(
            "Getting permission overwrites for page '{}' in guild ID {}",
            title, guild_id,
        );

        let rows = diesel::sql_query(GET_OVERWRITES_QUERY)
            .bind::<BigInt, _>(guild_id)
            .bind::<Text, _>(title)
            .load::<PageOverwriteRow>(&*self.conn)?;

        // No rows at all means no page; a page without overwrites
        // still yields one row from the outer join.
        if rows.is_empty() {
            return Err(Error::PageNotFound);
        }

        let overwrites = rows
            .into_iter()
            .filter_map(|row| match row {
                PageOverwriteRow {
                    entity_id: Some(entity_id),
                    allow: Some(allow),
                    deny: Some(deny),
                } => Some(PageOverwrite::new(
                    EntityId::from_raw(entity_id),
                    Permissions::from_raw(allow),
                    Permissions::from_raw(deny),
                )),
                _ => None,
            })
            .collect();

        Ok(overwrites)
    }

    /// Replaces the allowed and denied permissions of an entity on a page.
    pub async fn set_page_overwrites(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
        allow: Permissions,
        deny: Permissions,
    ) -> Result<()> {
        info!(
            "Setting overwrites for entity ID {} on page '{}' in guild ID {}: allow {}, deny {}",
            entity_id, title, guild_id, allow, deny,
        );

        Permissions::ensure_disjoint(allow, deny)?;

        self.transaction(async {
            diesel::sql_query(SET_OVERWRITES_QUERY)
                .bind::<BigInt, _>(guild_id)
                .bind::<Text, _>(title)
                .bind::<BigInt, _>(entity_id)
                .bind::<Integer, _>(allow.to_raw())
                .bind::<Integer, _>(deny.to_raw())
                .execute(&*self.conn)
                .map_err(Error::from_page_lookup)?;

            Ok(())
        })
        .await
    }

    /// Merges permissions into the overwrites of an entity on a page.
    ///
    /// Newly allowed permissions are removed from the denied set and vice versa.
    /// Returns the resulting `(allow, deny)` pair.
    pub async fn add_page_permissions(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
        allow: Permissions,
        deny: Permissions,
    ) -> Result<(Permissions, Permissions)> {
        info!(
            "Adding overwrites for entity ID {} on page '{}' in guild ID {}: allow {}, deny {}",
            entity_id, title, guild_id, allow, deny,
        );

        Permissions::ensure_disjoint(allow, deny)?;

        self.transaction(async {
            let pair = diesel::sql_query(ADD_OVERWRITES_QUERY)
                .bind::<BigInt, _>(guild_id)
                .bind::<Text, _>(title)
                .bind::<BigInt, _>(entity_id)
                .bind::<Integer, _>(allow.to_raw())
                .bind::<Integer, _>(deny.to_raw())
                .get_result::<OverwritePair>(&*self.conn)
                .map_err(Error::from_page_lookup)?;

            Ok(pair.into_permissions())
        })
        .await
    }

    /// Removes all overwrites of an entity on a page.
    pub async fn unset_page_overwrites(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
    ) -> Result<()> {
        info!(
            "Removing overwrites for entity ID {} on page '{}' in guild ID {}",
            entity_id, title, guild_id,
        );

        let rows = diesel::sql_query(UNSET_OVERWRITES_QUERY)
            .bind::<BigInt, _>(guild_id)
            .bind::<Text, _>(title)
            .bind::<BigInt, _>(entity_id)
            .execute(&*self.conn)?;

        if rows == 0 {
            return Err(Error::PageNotFound);
        }

        Ok(())
    }

    /// Clears permissions from both the allowed and denied overwrites,
    /// leaving them to be inherited from the entity's base permissions.
    ///
    /// Returns the new `(allow, deny)` pair, or `None` if the entity
    /// had no overwrites on the page. Fails with `PageNotFound` if
    /// there is no such page.
    pub async fn unset_page_permissions(
        &self,
        guild_id: GuildId,
        title: &str,
        entity_id: EntityId,
        perms: Permissions,
    ) -> Result<Option<(Permissions, Permissions)>> {
        info!(
            "Unsetting {} for entity ID {} on page '{}' in guild ID {}",
            perms, entity_id, title, guild_id,
        );

        let result = diesel::sql_query(UNSET_PERMISSIONS_QUERY)
            .bind::<BigInt, _>(guild_id)
            .bind::<Text, _>(title)
            .bind::<BigInt, _>(entity_id)
            .bind::<Integer, _>(perms.to_raw())
            .get_result::<UnsetResult>(&*self.conn)?;

        if result.found {
            Ok(result.into_permissions())
        } else {
            Err(Error::PageNotFound)
        }
    }
}

impl_async_transaction!(PermissionsService);

impl Debug for PermissionsService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PermissionsService")
            .field("conn", &"PgConnection { .. }")
            .finish()
    }
}
