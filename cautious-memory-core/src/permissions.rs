/*
 * permissions.rs
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

use crate::{Error, Result, StdResult};
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

bitflags! {
    /// Permission flags held by a role or member on a page.
    ///
    /// These values are persisted, so they must never be renumbered.
    /// New flags have to use bits above the current maximum.
    #[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct Permissions: i32 {
        const NONE = 0;
        const VIEW = 1;
        const RENAME = 2;
        const EDIT = 4;
        const CREATE = 8;
        const DELETE = 16;
        const MANAGE_PERMISSIONS = 32;

        /// Granted to any role without an explicit entry.
        const DEFAULT = Self::CREATE.bits()
            | Self::VIEW.bits()
            | Self::RENAME.bits()
            | Self::EDIT.bits();
    }
}

// Single-bit flags, in declaration order.
const MEMBERS: [(&str, Permissions); 6] = [
    ("view", Permissions::VIEW),
    ("rename", Permissions::RENAME),
    ("edit", Permissions::EDIT),
    ("create", Permissions::CREATE),
    ("delete", Permissions::DELETE),
    ("manage_permissions", Permissions::MANAGE_PERMISSIONS),
];

lazy_static! {
    static ref NAMES: HashMap<&'static str, Permissions> = {
        let mut map = HashMap::with_capacity(MEMBERS.len() + 2);
        map.insert("none", Permissions::NONE);
        map.extend(MEMBERS.iter().copied());
        map.insert("default", Permissions::DEFAULT);
        map
    };
}

impl Permissions {
    /// Converts a stored value, keeping any bits this version does not know about.
    #[inline]
    pub fn from_raw(bits: i32) -> Self {
        Permissions::from_bits_retain(bits)
    }

    #[inline]
    pub fn to_raw(self) -> i32 {
        self.bits()
    }

    /// Combines base permissions with page overwrites. Denied bits always win.
    #[inline]
    pub fn resolve(base: Permissions, allow: Permissions, deny: Permissions) -> Self {
        Permissions::from_bits_retain((base.bits() | allow.bits()) & !deny.bits())
    }

    /// Fails if any permission is both allowed and denied.
    pub fn ensure_disjoint(allow: Permissions, deny: Permissions) -> Result<()> {
        if allow.intersects(deny) {
            let overlap = allow & deny;
            warn!("Allowed and denied permissions intersect: {}", overlap);

            return Err(Error::InvalidArgument(format!(
                "allowed and denied permissions must not intersect ({})",
                overlap,
            )));
        }

        Ok(())
    }

    /// Iterates over the single named permissions set here.
    /// Never yields `NONE` or `DEFAULT`.
    pub fn members(self) -> impl Iterator<Item = Permissions> {
        MEMBERS
            .iter()
            .map(|&(_, perm)| perm)
            .filter(move |&perm| self.contains(perm))
    }

    /// Returns the name of a single named permission.
    pub fn name(self) -> Option<&'static str> {
        MEMBERS
            .iter()
            .find(|&&(_, perm)| perm == self)
            .map(|&(name, _)| name)
    }

    pub fn valid_names() -> impl Iterator<Item = &'static str> {
        std::iter::once("none")
            .chain(MEMBERS.iter().map(|&(name, _)| name))
            .chain(std::iter::once("default"))
    }
}

impl FromStr for Permissions {
    type Err = Error;

    fn from_str(value: &str) -> StdResult<Self, Error> {
        let key = value.to_ascii_lowercase().replace('-', "_");

        match NAMES.get(key.as_str()) {
            Some(&perm) => Ok(perm),
            None => {
                let valid = Permissions::valid_names().collect::<Vec<_>>().join(", ");

                Err(Error::InvalidArgument(format!(
                    "invalid permission '{}', try one of these: {}",
                    value, valid,
                )))
            }
        }
    }
}

impl Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names = self.members().filter_map(Permissions::name);

        match names.next() {
            None => write!(f, "none"),
            Some(first) => {
                write!(f, "{}", first)?;

                for name in names {
                    write!(f, ", {}", name)?;
                }

                Ok(())
            }
        }
    }
}

impl Default for Permissions {
    #[inline]
    fn default() -> Self {
        Permissions::DEFAULT
    }
}
