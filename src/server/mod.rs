/*
 * server/mod.rs
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

mod permissions;
mod watch_list;
mod wiki;

use crate::config::Config;
use crate::permissions::PermissionsService;
use crate::service_prelude::*;
use crate::watch_list::{Directory, Notifier, WatchListService};
use crate::wiki::WikiService;

#[cfg(test)]
const MIGRATION_SQL: &str = include_str!("../../migrations/2019-10-01-000000_create_wiki/up.sql");

/// Entry point to the wiki, sharing one database connection between services.
pub struct Server {
    conn: Arc<PgConnection>,
    permissions: PermissionsService,
    wiki: WikiService,
    watch_list: WatchListService,
}

impl Server {
    pub fn new(
        config: &Config,
        directory: Arc<dyn Directory>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        info!("Creating cautious_memory::Server, establishing connection to Postgres");

        if let Err(error) = config.validate() {
            error!("Refusing to start with invalid configuration: {}", error);

            return Err(error);
        }

        let conn = match PgConnection::establish(&config.database_url) {
            Ok(conn) => Arc::new(conn),
            Err(error) => {
                error!("Error establishing Postgres connection: {}", error);

                return Err(Error::DatabaseConnection(error));
            }
        };

        let permissions = PermissionsService::new(&conn);
        let wiki = WikiService::new(&conn, config.batch_size);
        let watch_list = WatchListService::new(&conn, config.batch_size, directory, notifier);

        Ok(Server {
            conn,
            permissions,
            wiki,
            watch_list,
        })
    }

    /* Helper methods */

    /// Opens a transaction that is never committed and sets up the schema in it.
    #[cfg(test)]
    pub fn begin_test_transaction(&self) -> Result<()> {
        use diesel::connection::SimpleConnection;

        self.conn.begin_test_transaction()?;
        self.conn.batch_execute(MIGRATION_SQL)?;

        Ok(())
    }
}

impl Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("cautious_memory::Server")
            .field("conn", &"PgConnection { .. }")
            .field("permissions", &self.permissions)
            .field("wiki", &self.wiki)
            .field("watch_list", &self.watch_list)
            .finish()
    }
}
