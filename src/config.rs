/*
 * config.rs
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

use crate::{Error, Result};
use std::fs;
use std::path::Path;

const DEFAULT_BATCH_SIZE: i64 = 50;

#[inline]
fn default_batch_size() -> i64 {
    DEFAULT_BATCH_SIZE
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub database_url: String,

    /// How many rows each lazy listing fetches per round trip.
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
}

impl Config {
    #[inline]
    pub fn new<S: Into<String>>(database_url: S) -> Self {
        Config {
            database_url: database_url.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|error| Error::InvalidConfig(error.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but can't be used.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            return Err(Error::InvalidConfig(format!(
                "batch-size must be positive, got {}",
                self.batch_size,
            )));
        }

        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading configuration from {}", path.display());

        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
