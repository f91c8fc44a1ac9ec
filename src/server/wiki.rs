/*
 * server/wiki.rs
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
use futures::Stream;

impl Server {
    /// Gets a page along with its current content.
    #[inline]
    pub async fn get_page(&self, guild_id: GuildId, title: &str) -> Result<Page> {
        self.wiki.get_page(guild_id, title).await
    }

    #[inline]
    pub async fn get_page_id(&self, guild_id: GuildId, title: &str) -> Result<Option<PageId>> {
        self.wiki.get_page_id(guild_id, title).await
    }

    /// Creates a new page with the given contents as its first revision.
    #[inline]
    pub async fn create_page(
        &self,
        guild_id: GuildId,
        title: &str,
        content: &str,
        author_id: UserId,
    ) -> Result<(PageId, RevisionId)> {
        self.wiki
            .create_page(guild_id, title, content, author_id)
            .await
    }

    /// Adds a revision to a page, then lets its watchers know.
    ///
    /// Notification errors are logged rather than returned,
    /// since the revision has already been saved by then.
    pub async fn revise_page(
        &self,
        guild_id: GuildId,
        title: &str,
        content: &str,
        author_id: UserId,
    ) -> Result<RevisionId> {
        let revision_id = self
            .wiki
            .revise_page(guild_id, title, content, author_id)
            .await?;

        if let Err(error) = self.on_page_edit(revision_id).await {
            error!(
                "Unable to dispatch notifications for revision ID {}: {}",
                revision_id, error,
            );
        }

        Ok(revision_id)
    }

    #[inline]
    pub async fn rename_page(&self, guild_id: GuildId, title: &str, new_title: &str) -> Result<()> {
        self.wiki.rename_page(guild_id, title, new_title).await
    }

    /// Deletes a page, then lets its watchers know.
    pub async fn delete_page(&self, guild_id: GuildId, title: &str) -> Result<PageId> {
        let (page_id, title) = self.wiki.delete_page(guild_id, title).await?;

        if let Err(error) = self.on_page_delete(guild_id, page_id, &title).await {
            error!(
                "Unable to dispatch deletion notices for page ID {}: {}",
                page_id, error,
            );
        }

        Ok(page_id)
    }

    #[inline]
    pub fn get_page_revisions<'a>(
        &'a self,
        guild_id: GuildId,
        title: &'a str,
    ) -> impl Stream<Item = Result<Revision>> + 'a {
        self.wiki.get_page_revisions(guild_id, title)
    }

    #[inline]
    pub fn get_all_pages(&self, guild_id: GuildId) -> impl Stream<Item = Result<Page>> + '_ {
        self.wiki.get_all_pages(guild_id)
    }

    #[inline]
    pub fn search_pages<'a>(
        &'a self,
        guild_id: GuildId,
        query: &'a str,
    ) -> impl Stream<Item = Result<Page>> + 'a {
        self.wiki.search_pages(guild_id, query)
    }

    #[inline]
    pub fn get_recent_revisions(
        &self,
        guild_id: GuildId,
        cutoff: DateTime<Utc>,
    ) -> impl Stream<Item = Result<RecentRevision>> + '_ {
        self.wiki.get_recent_revisions(guild_id, cutoff)
    }

    #[inline]
    pub async fn get_individual_revisions(
        &self,
        guild_id: GuildId,
        revision_ids: &[RevisionId],
    ) -> Result<Vec<Revision>> {
        self.wiki
            .get_individual_revisions(guild_id, revision_ids)
            .await
    }

    #[inline]
    pub async fn get_revision_and_previous(
        &self,
        revision_id: RevisionId,
    ) -> Result<(Option<Revision>, Revision)> {
        self.wiki.get_revision_and_previous(revision_id).await
    }
}
