/*
 * types.rs
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

make_id_type!(guild_id, GuildId);
make_id_type!(user_id, UserId);
make_id_type!(role_id, RoleId);
make_id_type!(page_id, PageId);
make_id_type!(revision_id, RevisionId);

// Permission overwrites are keyed on either a role or a single member,
// and both share the same snowflake space.
make_id_type!(entity_id, EntityId from [RoleId, UserId]);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse() {
        let guild_id = "81384788765712384".parse::<GuildId>().expect("Unable to parse id");
        assert_eq!(guild_id.to_i64(), 81384788765712384);
        assert_eq!(guild_id.to_string(), "81384788765712384");

        assert_eq!(" 42\n".parse::<PageId>(), Ok(PageId::from_raw(42)));
        assert!("".parse::<UserId>().is_err());
        assert!("<@1234>".parse::<UserId>().is_err());
        assert!("99999999999999999999".parse::<RoleId>().is_err());
    }

    #[test]
    fn entities() {
        let role_id = RoleId::from_raw(1000);
        let user_id = UserId::from_raw(2000);

        assert_eq!(EntityId::from(role_id), EntityId::from_raw(1000));
        assert_eq!(EntityId::from(user_id).to_i64(), 2000);
        assert_eq!(i64::from(EntityId::from(user_id)), i64::from(user_id));
    }
}
