/*
 * watch_list/service.rs
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

use super::models::{WatchResult, WatchedPage};
use super::{fan_out, DeliveryReport, Directory, Notifier, PageEdit};
use crate::permissions::PermissionsService;
use crate::service_prelude::*;
use crate::utils::paginate;
use crate::wiki::WikiService;
use futures::Stream;

const WATCH_PAGE_QUERY: &str = "
    WITH page AS (
        SELECT guild_id, page_id
        FROM pages
        WHERE guild_id = $1 AND lower(title) = lower($2)
    ),
    inserted AS (
        INSERT INTO watch_subscriptions (guild_id, user_id, page_id)
        SELECT guild_id, $3, page_id
        FROM page
        ON CONFLICT DO NOTHING
        RETURNING page_id
    )
    SELECT
        EXISTS (SELECT 1 FROM page) AS found,
        EXISTS (SELECT 1 FROM inserted) AS inserted
";

const UNWATCH_PAGE_QUERY: &str = "
    DELETE FROM watch_subscriptions
    WHERE
        user_id = $3
        AND page_id = (
            SELECT page_id
            FROM pages
            WHERE guild_id = $1 AND lower(title) = lower($2)
        )
";

const WATCH_LIST_QUERY: &str = "
    SELECT page_id, title
    FROM watch_subscriptions
    INNER JOIN pages USING (page_id)
    WHERE watch_subscriptions.guild_id = $1 AND user_id = $2
    ORDER BY lower(title) ASC, page_id ASC
    LIMIT $3 OFFSET $4
";

pub struct WatchListService {
    conn: Arc<PgConnection>,
    batch_size: i64,
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
}

impl WatchListService {
    #[inline]
    pub fn new(
        conn: &Arc<PgConnection>,
        batch_size: i64,
        directory: Arc<dyn Directory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        debug!("Creating watch list service");

        let conn = Arc::clone(conn);
        WatchListService {
            conn,
            batch_size,
            directory,
            notifier,
        }
    }

    /// Subscribes a member to a page.
    /// Returns `false` if they were already watching it.
    pub async fn watch_page(&self, member: &Member, title: &str) -> Result<bool> {
        info!(
            "User ID {} watching page '{}' in guild ID {}",
            member.user_id(),
            title,
            member.guild_id(),
        );

        let WatchResult { found, inserted } = diesel::sql_query(WATCH_PAGE_QUERY)
            .bind::<BigInt, _>(member.guild_id())
            .bind::<Text, _>(title)
            .bind::<BigInt, _>(member.user_id())
            .get_result::<WatchResult>(&*self.conn)?;

        if found {
            Ok(inserted)
        } else {
            Err(Error::PageNotFound)
        }
    }

    /// Unsubscribes a member from a page.
    /// Returns `false` if they weren't watching it.
    pub async fn unwatch_page(&self, member: &Member, title: &str) -> Result<bool> {
        info!(
            "User ID {} unwatching page '{}' in guild ID {}",
            member.user_id(),
            title,
            member.guild_id(),
        );

        let rows = diesel::sql_query(UNWATCH_PAGE_QUERY)
            .bind::<BigInt, _>(member.guild_id())
            .bind::<Text, _>(title)
            .bind::<BigInt, _>(member.user_id())
            .execute(&*self.conn)?;

        Ok(rows > 0)
    }

    /// Lazily lists the pages a member watches, as `(id, title)` pairs.
    pub fn watch_list<'a>(
        &'a self,
        member: &'a Member,
    ) -> impl Stream<Item = Result<(PageId, String)>> + 'a {
        debug!(
            "Listing watched pages for user ID {} in guild ID {}",
            member.user_id(),
            member.guild_id(),
        );

        let conn = &*self.conn;
        paginate(self.batch_size, move |offset, limit| {
            let pages = diesel::sql_query(WATCH_LIST_QUERY)
                .bind::<BigInt, _>(member.guild_id())
                .bind::<BigInt, _>(member.user_id())
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load::<WatchedPage>(conn)?;

            Ok(pages
                .into_iter()
                .map(|WatchedPage { page_id, title }| (page_id, title))
                .collect())
        })
    }

    pub async fn page_subscribers(&self, page_id: PageId) -> Result<Vec<UserId>> {
        debug!("Getting subscribers of page ID {}", page_id);

        let user_ids = watch_subscriptions::table
            .filter(watch_subscriptions::page_id.eq(page_id))
            .select(watch_subscriptions::user_id)
            .order_by(watch_subscriptions::user_id.asc())
            .load::<UserId>(&*self.conn)?;

        Ok(user_ids)
    }

    /// Removes every subscription to a page, returning how many there were.
    pub async fn delete_page_subscribers(&self, page_id: PageId) -> Result<usize> {
        info!("Removing all subscriptions to page ID {}", page_id);

        let rows = diesel::delete(
            watch_subscriptions::table.filter(watch_subscriptions::page_id.eq(page_id)),
        )
        .execute(&*self.conn)?;

        Ok(rows)
    }

    /// Notifies everyone watching a page about a new revision to it.
    ///
    /// The author isn't notified, and neither is anyone who has left the
    /// guild or can no longer view the page.
    pub async fn on_page_edit(
        &self,
        wiki: &WikiService,
        permissions: &PermissionsService,
        revision_id: RevisionId,
    ) -> Result<DeliveryReport> {
        info!("Dispatching edit notifications for revision ID {}", revision_id);

        self.transaction(async {
            let (old, new) = wiki.get_revision_and_previous(revision_id).await?;
            let guild_id = new.guild_id();

            if !self.directory.has_guild(guild_id).await {
                warn!(
                    "Guild ID {} is unavailable, not dispatching edit of page ID {}",
                    guild_id,
                    new.page_id(),
                );

                return Ok(DeliveryReport::default());
            }

            let author_id = new.author_id();
            let recipients = self
                .page_subscribers(new.page_id())
                .await?
                .into_iter()
                .filter(|&user_id| user_id != author_id);

            let edit = PageEdit::new(old.as_ref(), &new);
            let report = fan_out(recipients, move |user_id| async move {
                let member = self.directory.fetch_member(guild_id, user_id).await?;

                permissions
                    .check_permissions(&member, Permissions::VIEW, edit.title())
                    .await?;

                self.notifier.send_page_edit(user_id, &edit).await
            })
            .await;

            Ok(report)
        })
        .await
    }

    /// Notifies everyone watching a deleted page, then drops its subscriptions.
    pub async fn on_page_delete(
        &self,
        guild_id: GuildId,
        page_id: PageId,
        title: &str,
    ) -> Result<DeliveryReport> {
        info!(
            "Dispatching delete notifications for page ID {} ('{}') in guild ID {}",
            page_id, title, guild_id,
        );

        self.transaction(async {
            if !self.directory.has_guild(guild_id).await {
                warn!(
                    "Guild ID {} is unavailable, not dispatching deletion of page ID {}",
                    guild_id, page_id,
                );

                return Ok(DeliveryReport::default());
            }

            let recipients = self.page_subscribers(page_id).await?;
            let report = fan_out(recipients, move |user_id| async move {
                self.directory.fetch_member(guild_id, user_id).await?;
                self.notifier
                    .send_page_delete(user_id, guild_id, title)
                    .await
            })
            .await;

            let cleared = self.delete_page_subscribers(page_id).await?;
            debug!("Cleared {} subscriptions to page ID {}", cleared, page_id);

            Ok(report)
        })
        .await
    }
}

impl_async_transaction!(WatchListService);

impl Debug for WatchListService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WatchListService")
            .field("conn", &"PgConnection { .. }")
            .field("batch_size", &self.batch_size)
            .field("directory", &self.directory)
            .field("notifier", &self.notifier)
            .finish()
    }
}
