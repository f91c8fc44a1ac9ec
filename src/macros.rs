/*
 * macros.rs
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

/// Adds an async `transaction()` method to a type holding `conn: Arc<PgConnection>`.
///
/// Nested calls become savepoints, since every service shares one connection.
macro_rules! impl_async_transaction {
    ($type:ty) => {
        impl $type {
            pub async fn transaction<F, T>(&self, f: F) -> Result<T>
            where
                F: std::future::Future<Output = Result<T>>,
            {
                use diesel::connection::TransactionManager;

                let conn = &*self.conn;
                let manager = diesel::Connection::transaction_manager(conn);

                trace!("Beginning transaction");
                manager.begin_transaction(conn)?;

                match f.await {
                    Ok(value) => {
                        trace!("Committing transaction");
                        manager.commit_transaction(conn)?;
                        Ok(value)
                    }
                    Err(error) => {
                        debug!("Rolling back transaction: {}", error);

                        if let Err(rollback_error) = manager.rollback_transaction(conn) {
                            error!("Unable to roll back transaction: {}", rollback_error);
                        }

                        Err(error)
                    }
                }
            }
        }
    };
}
