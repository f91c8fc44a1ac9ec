/*
 * schema.rs
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

table! {
    pages (page_id) {
        page_id -> Int8,
        guild_id -> Int8,
        title -> Text,
        latest_revision_id -> Nullable<Int8>,
    }
}

table! {
    page_permissions (page_id, entity_id) {
        page_id -> Int8,
        entity_id -> Int8,
        allow -> Int4,
        deny -> Int4,
    }
}

table! {
    revisions (revision_id) {
        revision_id -> Int8,
        page_id -> Int8,
        author_id -> Int8,
        content -> Text,
        revised_at -> Timestamptz,
    }
}

table! {
    role_permissions (role_id) {
        role_id -> Int8,
        permissions -> Int4,
    }
}

table! {
    watch_subscriptions (page_id, user_id) {
        guild_id -> Int8,
        user_id -> Int8,
        page_id -> Int8,
    }
}

joinable!(page_permissions -> pages (page_id));
joinable!(revisions -> pages (page_id));

allow_tables_to_appear_in_same_query!(
    pages,
    page_permissions,
    revisions,
    role_permissions,
    watch_subscriptions,
);
