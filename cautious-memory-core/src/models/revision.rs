/*
 * models/revision.rs
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

/// An immutable page revision.
///
/// `title` is the page's *current* title, not the one it had
/// when this revision was written.
#[derive(Serialize, Deserialize, QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    #[sql_type = "BigInt"]
    revision_id: RevisionId,

    #[sql_type = "BigInt"]
    page_id: PageId,

    #[sql_type = "BigInt"]
    guild_id: GuildId,

    #[sql_type = "Text"]
    title: String,

    #[sql_type = "BigInt"]
    author_id: UserId,

    #[sql_type = "Text"]
    content: String,

    #[sql_type = "Timestamptz"]
    revised_at: DateTime<Utc>,
}

impl Revision {
    #[inline]
    pub fn id(&self) -> RevisionId {
        self.revision_id
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    pub fn revised_at(&self) -> DateTime<Utc> {
        self.revised_at
    }
}

/// Revision metadata for the recent changes feed, without content.
#[derive(Serialize, Deserialize, QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct RecentRevision {
    #[sql_type = "Text"]
    title: String,

    #[sql_type = "BigInt"]
    revision_id: RevisionId,

    #[sql_type = "BigInt"]
    page_id: PageId,

    #[sql_type = "BigInt"]
    author_id: UserId,

    #[sql_type = "Timestamptz"]
    revised_at: DateTime<Utc>,
}

impl RecentRevision {
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn id(&self) -> RevisionId {
        self.revision_id
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    #[inline]
    pub fn revised_at(&self) -> DateTime<Utc> {
        self.revised_at
    }
}
