/*
 * macros.rs
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

/// Declares a snowflake id newtype in its own module.
///
/// The id reads and binds as a Postgres `BIGINT`, so it can be used directly
/// in queries. The optional `from` list adds widening conversions from other
/// id types sharing the same snowflake space.
macro_rules! make_id_type {
    ($module:ident, $name:ident from [$($source:ident),+ $(,)?]) => {
        make_id_type!($module, $name);

        $(
            impl From<$source> for $name {
                #[inline]
                fn from(id: $source) -> $name {
                    $name::from_raw(id.to_i64())
                }
            }
        )+
    };
    ($module:ident, $name:ident) => {
        mod $module {
            use diesel::deserialize::{self, FromSql};
            use diesel::pg::Pg;
            use diesel::serialize::{self, Output, ToSql};
            use diesel::sql_types::BigInt;
            use std::fmt::{self, Display};
            use std::io::Write;
            use std::num::ParseIntError;
            use std::str::FromStr;

            #[derive(
                Serialize,
                Deserialize,
                AsExpression,
                FromSqlRow,
                Debug,
                Copy,
                Clone,
                Hash,
                PartialOrd,
                Ord,
                PartialEq,
                Eq,
            )]
            #[sql_type = "BigInt"]
            pub struct $name(i64);

            impl $name {
                #[inline]
                pub fn from_raw(value: i64) -> Self {
                    trace!("Creating raw {} with value {}", stringify!($name), value);

                    $name(value)
                }

                #[inline]
                pub fn to_i64(self) -> i64 {
                    self.0
                }
            }

            impl From<$name> for i64 {
                #[inline]
                fn from(id: $name) -> i64 {
                    id.0
                }
            }

            /// Parses the decimal form the chat platform hands out.
            impl FromStr for $name {
                type Err = ParseIntError;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    value.trim().parse().map($name::from_raw)
                }
            }

            impl Display for $name {
                #[inline]
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    Display::fmt(&self.0, f)
                }
            }

            impl ToSql<BigInt, Pg> for $name {
                #[inline]
                fn to_sql<W: Write>(&self, out: &mut Output<W, Pg>) -> serialize::Result {
                    <i64 as ToSql<BigInt, Pg>>::to_sql(&self.0, out)
                }
            }

            impl FromSql<BigInt, Pg> for $name {
                #[inline]
                fn from_sql(bytes: Option<&[u8]>) -> deserialize::Result<Self> {
                    <i64 as FromSql<BigInt, Pg>>::from_sql(bytes).map($name)
                }
            }
        }

        pub use self::$module::$name;
    };
}
