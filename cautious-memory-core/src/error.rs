/*
 * error.rs
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

use crate::Permissions;
use diesel::result::{ConnectionError, DatabaseErrorKind, Error as DieselError};
use std::io;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("error: {0}")]
    StaticMsg(&'static str),

    #[error("general I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Database(#[from] DieselError),

    #[error("error connecting to database: {0}")]
    DatabaseConnection(#[from] ConnectionError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("the given page was not found")]
    PageNotFound,

    #[error("the given page already exists")]
    PageExists,

    #[error("one or more of the given revisions were not found")]
    RevisionNotFound,

    #[error("the given member or role was not found")]
    IdentityNotFound,

    #[error("missing page permissions: {0}")]
    MissingPermissions(Permissions),
}

impl Error {
    pub fn fixed_name(&self) -> &'static str {
        use self::Error::*;

        match *self {
            StaticMsg(_) => "custom",
            Io(_) => "io",
            Database(_) => "database",
            DatabaseConnection(_) => "database-connection",
            InvalidConfig(_) => "invalid-config",
            InvalidArgument(_) => "invalid-argument",
            PageNotFound => "page-not-found",
            PageExists => "page-exists",
            RevisionNotFound => "revision-not-found",
            IdentityNotFound => "identity-not-found",
            MissingPermissions(_) => "missing-permissions",
        }
    }

    /// Translates a uniqueness violation on `pages` into `PageExists`.
    pub fn from_title_conflict(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Error::PageExists,
            _ => Error::Database(error),
        }
    }

    /// Translates a missing page id into `PageNotFound`.
    ///
    /// Page-scoped writes resolve the page id inside the statement itself,
    /// so an unknown title shows up as a NULL written to a `page_id` column.
    pub fn from_page_lookup(error: DieselError) -> Self {
        let missing_page = match error {
            DieselError::DatabaseError(_, ref info) => info.column_name() == Some("page_id"),
            _ => false,
        };

        if missing_page {
            Error::PageNotFound
        } else {
            Error::Database(error)
        }
    }
}
