/*
 * utils.rs
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

use crate::Result;
use either::{Left, Right};
use futures::prelude::*;
use std::iter;

sql_function! {
    /// Postgres `lower()`, used for case-insensitive title matching.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

#[inline]
pub fn rows_to_result(rows: usize) -> bool {
    match rows {
        0 => false,
        1 => true,
        _ => {
            error!("Expected one affected row, got {}", rows);

            true
        }
    }
}

/// Lazily runs a query one batch at a time, yielding rows in order.
///
/// `fetch` receives `(offset, limit)` and is only called again once the
/// previous batch has been fully consumed. A short or empty batch ends
/// the stream, and an error is yielded once before the stream ends.
pub fn paginate<'a, T, F>(batch_size: i64, fetch: F) -> impl Stream<Item = Result<T>> + 'a
where
    T: 'a,
    F: FnMut(i64, i64) -> Result<Vec<T>> + 'a,
{
    stream::unfold(Some((fetch, 0)), move |state| async move {
        let (mut fetch, offset) = state?;

        match fetch(offset, batch_size) {
            Ok(rows) => {
                let count = rows.len() as i64;
                let next = if rows.is_empty() || count < batch_size {
                    None
                } else {
                    Some((fetch, offset + count))
                };

                Some((Ok(rows), next))
            }
            Err(error) => Some((Err(error), None)),
        }
    })
    .map(|batch| {
        let rows = match batch {
            Ok(rows) => Left(rows.into_iter().map(Ok)),
            Err(error) => Right(iter::once(Err(error))),
        };

        stream::iter(rows)
    })
    .flatten()
}
