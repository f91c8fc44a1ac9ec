/*
 * server/watch_list.rs
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
use crate::watch_list::DeliveryReport;
use futures::Stream;

impl Server {
    /// Subscribes a member to a page, returning `false` if they already were.
    #[inline]
    pub async fn watch_page(&self, member: &Member, title: &str) -> Result<bool> {
        self.watch_list.watch_page(member, title).await
    }

    #[inline]
    pub async fn unwatch_page(&self, member: &Member, title: &str) -> Result<bool> {
        self.watch_list.unwatch_page(member, title).await
    }

    #[inline]
    pub fn watch_list<'a>(
        &'a self,
        member: &'a Member,
    ) -> impl Stream<Item = Result<(PageId, String)>> + 'a {
        self.watch_list.watch_list(member)
    }

    #[inline]
    pub async fn page_subscribers(&self, page_id: PageId) -> Result<Vec<UserId>> {
        self.watch_list.page_subscribers(page_id).await
    }

    #[inline]
    pub async fn delete_page_subscribers(&self, page_id: PageId) -> Result<usize> {
        self.watch_list.delete_page_subscribers(page_id).await
    }

    /// Handles a page edit event. Safe to run more than once per revision.
    #[inline]
    pub async fn on_page_edit(&self, revision_id: RevisionId) -> Result<DeliveryReport> {
        self.watch_list
            .on_page_edit(&self.wiki, &self.permissions, revision_id)
            .await
    }

    /// Handles a page deletion event. Safe to run more than once per page.
    #[inline]
    pub async fn on_page_delete(
        &self,
        guild_id: GuildId,
        page_id: PageId,
        title: &str,
    ) -> Result<DeliveryReport> {
        self.watch_list
            .on_page_delete(guild_id, page_id, title)
            .await
    }
}
