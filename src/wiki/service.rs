/*
 * wiki/service.rs
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

use super::models::{NewPage, NewRevision};
use crate::service_prelude::*;
use crate::utils::{lower, paginate, rows_to_result};
use futures::Stream;
use std::collections::HashSet;

/// Trigram searches never return more than this many pages.
const SEARCH_LIMIT: i64 = 100;

const GET_PAGE_QUERY: &str = "
    SELECT pages.page_id, guild_id, title, revision_id, author_id, content, revised_at
    FROM pages
    INNER JOIN revisions
        ON pages.latest_revision_id = revisions.revision_id
    WHERE guild_id = $1 AND lower(title) = lower($2)
";

const PAGE_REVISIONS_QUERY: &str = "
    SELECT revision_id, page_id, guild_id, title, author_id, content, revised_at
    FROM pages
    INNER JOIN revisions USING (page_id)
    WHERE guild_id = $1 AND lower(title) = lower($2)
    ORDER BY revision_id DESC
    LIMIT $3 OFFSET $4
";

const ALL_PAGES_QUERY: &str = "
    SELECT pages.page_id, guild_id, title, revision_id, author_id, content, revised_at
    FROM pages
    INNER JOIN revisions
        ON pages.latest_revision_id = revisions.revision_id
    WHERE guild_id = $1
    ORDER BY lower(title) ASC, pages.page_id ASC
    LIMIT $2 OFFSET $3
";

const SEARCH_PAGES_QUERY: &str = "
    SELECT pages.page_id, guild_id, title, revision_id, author_id, content, revised_at
    FROM pages
    INNER JOIN revisions
        ON pages.latest_revision_id = revisions.revision_id
    WHERE guild_id = $1 AND title % $2
    ORDER BY similarity(title, $2) DESC, pages.page_id ASC
    LIMIT $3 OFFSET $4
";

const RECENT_REVISIONS_QUERY: &str = "
    SELECT title, revision_id, page_id, author_id, revised_at
    FROM revisions
    INNER JOIN pages USING (page_id)
    WHERE guild_id = $1 AND revised_at > $2
    ORDER BY revised_at DESC, revision_id DESC
    LIMIT $3 OFFSET $4
";

const INDIVIDUAL_REVISIONS_QUERY: &str = "
    SELECT revision_id, page_id, guild_id, title, author_id, content, revised_at
    FROM pages
    INNER JOIN revisions USING (page_id)
    WHERE guild_id = $1 AND revision_id = ANY ($2)
    ORDER BY revision_id ASC
";

const REVISION_AND_PREVIOUS_QUERY: &str = "
    SELECT revision_id, page_id, guild_id, title, author_id, content, revised_at
    FROM pages
    INNER JOIN revisions USING (page_id)
    WHERE
        page_id = (SELECT page_id FROM revisions WHERE revision_id = $1)
        AND revision_id <= $1
    ORDER BY revision_id DESC
    LIMIT 2
";

pub struct WikiService {
    conn: Arc<PgConnection>,
    batch_size: i64,
}

impl WikiService {
    #[inline]
    pub fn new(conn: &Arc<PgConnection>, batch_size: i64) -> Self {
        debug!("Creating wiki service");

        let conn = Arc::clone(conn);
        WikiService { conn, batch_size }
    }

    pub async fn get_page(&self, guild_id: GuildId, title: &str) -> Result<Page> {
        debug!("Getting page '{}' in guild ID {}", title, guild_id);

        let page = diesel::sql_query(GET_PAGE_QUERY)
            .bind::<BigInt, _>(guild_id)
            .bind::<Text, _>(title)
            .get_result::<Page>(&*self.conn)
            .optional()?;

        page.ok_or(Error::PageNotFound)
    }

    pub async fn get_page_id(&self, guild_id: GuildId, title: &str) -> Result<Option<PageId>> {
        debug!("Getting page ID for '{}' in guild ID {}", title, guild_id);

        let page_id = pages::table
            .filter(pages::guild_id.eq(guild_id))
            .filter(lower(pages::title).eq(lower(title)))
            .select(pages::page_id)
            .first::<PageId>(&*self.conn)
            .optional()?;

        Ok(page_id)
    }

    pub async fn create_page(
        &self,
        guild_id: GuildId,
        title: &str,
        content: &str,
        author_id: UserId,
    ) -> Result<(PageId, RevisionId)> {
        info!(
            "Creating page '{}' in guild ID {} by user ID {}",
            title, guild_id, author_id,
        );

        self.transaction(async {
            let model = NewPage {
                guild_id: guild_id.into(),
                title,
            };

            trace!("Inserting {:?} into pages table", &model);
            let page_id = diesel::insert_into(pages::table)
                .values(&model)
                .returning(pages::page_id)
                .get_result::<PageId>(&*self.conn)
                .map_err(Error::from_title_conflict)?;

            let revision_id = self.create_revision(page_id, content, author_id)?;

            Ok((page_id, revision_id))
        })
        .await
    }

    pub async fn revise_page(
        &self,
        guild_id: GuildId,
        title: &str,
        content: &str,
        author_id: UserId,
    ) -> Result<RevisionId> {
        info!(
            "Revising page '{}' in guild ID {} by user ID {}",
            title, guild_id, author_id,
        );

        self.transaction(async {
            let page_id = match self.get_page_id(guild_id, title).await? {
                Some(page_id) => page_id,
                None => return Err(Error::PageNotFound),
            };

            self.create_revision(page_id, content, author_id)
        })
        .await
    }

    pub async fn rename_page(&self, guild_id: GuildId, title: &str, new_title: &str) -> Result<()> {
        info!(
            "Renaming page '{}' -> '{}' in guild ID {}",
            title, new_title, guild_id,
        );

        // Savepoint, so a title conflict doesn't poison an outer transaction
        self.transaction(async {
            let rows = diesel::update(
                pages::table
                    .filter(pages::guild_id.eq(guild_id))
                    .filter(lower(pages::title).eq(lower(title))),
            )
            .set(pages::title.eq(new_title))
            .execute(&*self.conn)
            .map_err(Error::from_title_conflict)?;

            if rows_to_result(rows) {
                Ok(())
            } else {
                Err(Error::PageNotFound)
            }
        })
        .await
    }

    /// Deletes a page along with its revisions and permission overwrites.
    /// Returns the ID and title the page had.
    pub async fn delete_page(&self, guild_id: GuildId, title: &str) -> Result<(PageId, String)> {
        info!("Deleting page '{}' in guild ID {}", title, guild_id);

        let deleted = diesel::delete(
            pages::table
                .filter(pages::guild_id.eq(guild_id))
                .filter(lower(pages::title).eq(lower(title))),
        )
        .returning((pages::page_id, pages::title))
        .get_result::<(PageId, String)>(&*self.conn)
        .optional()?;

        deleted.ok_or(Error::PageNotFound)
    }

    /// Lazily lists the revisions of a page, newest first.
    pub fn get_page_revisions<'a>(
        &'a self,
        guild_id: GuildId,
        title: &'a str,
    ) -> impl Stream<Item = Result<Revision>> + 'a {
        debug!("Listing revisions for page '{}' in guild ID {}", title, guild_id);

        let conn = &*self.conn;
        paginate(self.batch_size, move |offset, limit| {
            let revisions = diesel::sql_query(PAGE_REVISIONS_QUERY)
                .bind::<BigInt, _>(guild_id)
                .bind::<Text, _>(title)
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load::<Revision>(conn)?;

            Ok(revisions)
        })
    }

    /// Lazily lists every page in a guild, ordered by title.
    pub fn get_all_pages(&self, guild_id: GuildId) -> impl Stream<Item = Result<Page>> + '_ {
        debug!("Listing all pages in guild ID {}", guild_id);

        let conn = &*self.conn;
        paginate(self.batch_size, move |offset, limit| {
            let pages = diesel::sql_query(ALL_PAGES_QUERY)
                .bind::<BigInt, _>(guild_id)
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load::<Page>(conn)?;

            Ok(pages)
        })
    }

    /// Lazily lists pages whose titles are similar to the query, best matches first.
    pub fn search_pages<'a>(
        &'a self,
        guild_id: GuildId,
        query: &'a str,
    ) -> impl Stream<Item = Result<Page>> + 'a {
        debug!("Searching for pages like '{}' in guild ID {}", query, guild_id);

        let conn = &*self.conn;
        paginate(self.batch_size, move |offset, limit| {
            let limit = limit.min(SEARCH_LIMIT - offset);
            if limit <= 0 {
                return Ok(Vec::new());
            }

            let pages = diesel::sql_query(SEARCH_PAGES_QUERY)
                .bind::<BigInt, _>(guild_id)
                .bind::<Text, _>(query)
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load::<Page>(conn)?;

            Ok(pages)
        })
    }

    /// Lazily lists revisions made in a guild after the cutoff, newest first.
    pub fn get_recent_revisions(
        &self,
        guild_id: GuildId,
        cutoff: DateTime<Utc>,
    ) -> impl Stream<Item = Result<RecentRevision>> + '_ {
        debug!(
            "Listing revisions in guild ID {} made after {}",
            guild_id, cutoff,
        );

        let conn = &*self.conn;
        paginate(self.batch_size, move |offset, limit| {
            let revisions = diesel::sql_query(RECENT_REVISIONS_QUERY)
                .bind::<BigInt, _>(guild_id)
                .bind::<Timestamptz, _>(cutoff)
                .bind::<BigInt, _>(limit)
                .bind::<BigInt, _>(offset)
                .load::<RecentRevision>(conn)?;

            Ok(revisions)
        })
    }

    /// Gets the given revisions, oldest first.
    /// Fails if any of them do not exist in the guild.
    pub async fn get_individual_revisions(
        &self,
        guild_id: GuildId,
        revision_ids: &[RevisionId],
    ) -> Result<Vec<Revision>> {
        debug!(
            "Getting revisions {:?} in guild ID {}",
            revision_ids, guild_id,
        );

        let revision_ids = revision_ids.iter().copied().collect::<HashSet<_>>();
        let unique_ids = revision_ids.iter().copied().collect::<Vec<_>>();

        let revisions = diesel::sql_query(INDIVIDUAL_REVISIONS_QUERY)
            .bind::<BigInt, _>(guild_id)
            .bind::<Array<BigInt>, _>(unique_ids)
            .load::<Revision>(&*self.conn)?;

        if revisions.len() != revision_ids.len() {
            warn!(
                "Requested {} revisions, only found {}",
                revision_ids.len(),
                revisions.len(),
            );

            return Err(Error::RevisionNotFound);
        }

        Ok(revisions)
    }

    /// Gets a revision and the one before it on the same page, if any.
    pub async fn get_revision_and_previous(
        &self,
        revision_id: RevisionId,
    ) -> Result<(Option<Revision>, Revision)> {
        debug!("Getting revision ID {} and its predecessor", revision_id);

        let mut revisions = diesel::sql_query(REVISION_AND_PREVIOUS_QUERY)
            .bind::<BigInt, _>(revision_id)
            .load::<Revision>(&*self.conn)?;

        let old = if revisions.len() > 1 {
            revisions.pop()
        } else {
            None
        };

        match revisions.pop() {
            Some(new) => Ok((old, new)),
            None => Err(Error::RevisionNotFound),
        }
    }

    // Only call inside a transaction.
    fn create_revision(
        &self,
        page_id: PageId,
        content: &str,
        author_id: UserId,
    ) -> Result<RevisionId> {
        let model = NewRevision {
            page_id: page_id.into(),
            author_id: author_id.into(),
            content,
        };

        trace!("Inserting revision for page ID {} into revisions table", page_id);
        let revision_id = diesel::insert_into(revisions::table)
            .values(&model)
            .returning(revisions::revision_id)
            .get_result::<RevisionId>(&*self.conn)?;

        trace!("Pointing page ID {} to revision ID {}", page_id, revision_id);
        diesel::update(pages::table.find(page_id))
            .set(pages::latest_revision_id.eq(revision_id))
            .execute(&*self.conn)?;

        Ok(revision_id)
    }
}

impl_async_transaction!(WikiService);

impl Debug for WikiService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WikiService")
            .field("conn", &"PgConnection { .. }")
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
