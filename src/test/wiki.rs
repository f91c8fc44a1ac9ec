/*
 * test/wiki.rs
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

use super::prelude::*;
use chrono::{Duration, Utc};

#[tokio::test]
async fn pages() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();
    let author_id = random_user();

    let (page_id, revision_id) = server
        .create_page(guild_id, "Home", "v1", author_id)
        .await
        .expect("Unable to create page");

    {
        let page = server
            .get_page(guild_id, "hOmE")
            .await
            .expect("Unable to get page");

        assert_eq!(page.id(), page_id);
        assert_eq!(page.title(), "Home");
        assert_eq!(page.content(), "v1");
        assert_eq!(page.latest_revision_id(), revision_id);
        assert_eq!(page.author_id(), author_id);
    }

    {
        let error = server
            .create_page(guild_id, "HOME", "again", author_id)
            .await
            .expect_err("Created duplicate page");

        match error {
            Error::PageExists => (),
            _ => panic!("Error doesn't match"),
        }
    }

    // Same title in another guild is a separate page
    server
        .create_page(random_guild(), "Home", "elsewhere", author_id)
        .await
        .expect("Unable to create page in other guild");

    {
        let error = server
            .get_page(guild_id, "Nowhere")
            .await
            .expect_err("Found nonexistent page");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    assert_eq!(
        server.get_page_id(guild_id, "home").await.unwrap(),
        Some(page_id),
    );
    assert_eq!(server.get_page_id(guild_id, "nowhere").await.unwrap(), None);
}

#[tokio::test]
async fn revisions() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();
    let author_id = random_user();

    let (page_id, first_id) = server
        .create_page(guild_id, "Changelog", "v1", author_id)
        .await
        .expect("Unable to create page");

    let mut revision_ids = vec![first_id];
    for content in &["v2", "v3", "v4", "v5"] {
        let revision_id = server
            .revise_page(guild_id, "changelog", content, author_id)
            .await
            .expect("Unable to revise page");

        revision_ids.push(revision_id);
    }

    let page = server.get_page(guild_id, "Changelog").await.unwrap();
    assert_eq!(page.content(), "v5");
    assert_eq!(page.latest_revision_id(), revision_ids[4]);

    // Newest first, spanning several batches
    let revisions = server
        .get_page_revisions(guild_id, "CHANGELOG")
        .try_collect::<Vec<_>>()
        .await
        .expect("Unable to list revisions");

    let listed = revisions.iter().map(Revision::id).collect::<Vec<_>>();
    let mut expected = revision_ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
    assert!(revisions.iter().all(|revision| revision.page_id() == page_id));

    {
        let (old, new) = server
            .get_revision_and_previous(revision_ids[2])
            .await
            .expect("Unable to get revision pair");

        assert_eq!(new.content(), "v3");
        assert_eq!(old.map(|revision| revision.id()), Some(revision_ids[1]));
    }

    {
        let (old, new) = server
            .get_revision_and_previous(first_id)
            .await
            .expect("Unable to get first revision");

        assert_eq!(new.content(), "v1");
        assert!(old.is_none());
    }

    {
        let requested = [revision_ids[3], revision_ids[0], revision_ids[3]];
        let found = server
            .get_individual_revisions(guild_id, &requested)
            .await
            .expect("Unable to get revisions");

        let contents = found.iter().map(Revision::content).collect::<Vec<_>>();
        assert_eq!(contents, vec!["v1", "v4"]);
    }

    {
        let missing = RevisionId::from_raw(-1);
        let error = server
            .get_individual_revisions(guild_id, &[first_id, missing])
            .await
            .expect_err("Found nonexistent revision");

        match error {
            Error::RevisionNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        // Revisions in another guild aren't visible
        let error = server
            .get_individual_revisions(random_guild(), &[first_id])
            .await
            .expect_err("Found revision from another guild");

        match error {
            Error::RevisionNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        let error = server
            .revise_page(guild_id, "Nonexistent", "text", author_id)
            .await
            .expect_err("Revised nonexistent page");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }
}

#[tokio::test]
async fn rename() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();
    create_page(server, guild_id, "Draft").await;
    create_page(server, guild_id, "Taken").await;

    server
        .rename_page(guild_id, "draft", "Final")
        .await
        .expect("Unable to rename page");

    assert!(server.get_page_id(guild_id, "Draft").await.unwrap().is_none());
    assert_eq!(
        server.get_page(guild_id, "final").await.unwrap().title(),
        "Final",
    );

    {
        let error = server
            .rename_page(guild_id, "Final", "TAKEN")
            .await
            .expect_err("Renamed over existing page");

        match error {
            Error::PageExists => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        let error = server
            .rename_page(guild_id, "Draft", "Something")
            .await
            .expect_err("Renamed nonexistent page");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }
}

#[tokio::test]
async fn delete() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();
    let (page_id, revision_id) = create_page(server, guild_id, "Doomed").await;

    server
        .set_page_overwrites(
            guild_id,
            "Doomed",
            EntityId::from(random_role()),
            Permissions::EDIT,
            Permissions::DELETE,
        )
        .await
        .expect("Unable to set overwrites");

    let deleted_id = server
        .delete_page(guild_id, "DOOMED")
        .await
        .expect("Unable to delete page");

    assert_eq!(deleted_id, page_id);

    {
        let error = server
            .get_page(guild_id, "Doomed")
            .await
            .expect_err("Found deleted page");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        let error = server
            .get_revision_and_previous(revision_id)
            .await
            .expect_err("Found revision of deleted page");

        match error {
            Error::RevisionNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        let error = server
            .get_page_overwrites(guild_id, "Doomed")
            .await
            .expect_err("Found overwrites of deleted page");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        let error = server
            .delete_page(guild_id, "Doomed")
            .await
            .expect_err("Deleted page twice");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }
}

#[tokio::test]
async fn listings() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();

    for title in &["delta", "Alpha", "charlie", "Bravo", "Dragon Lore"] {
        create_page(server, guild_id, title).await;
    }

    {
        let pages = server
            .get_all_pages(guild_id)
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to list pages");

        let titles = pages.iter().map(Page::title).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Alpha", "Bravo", "charlie", "delta", "Dragon Lore"]);
    }

    {
        let pages = server
            .search_pages(guild_id, "dragon")
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to search pages");

        let titles = pages.iter().map(Page::title).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Dragon Lore"]);
    }

    {
        let pages = server
            .search_pages(random_guild(), "dragon")
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to search pages");

        assert!(pages.is_empty());
    }

    {
        let cutoff = Utc::now() - Duration::hours(1);
        let revisions = server
            .get_recent_revisions(guild_id, cutoff)
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to list recent revisions");

        assert_eq!(revisions.len(), 5);
        assert!(revisions
            .windows(2)
            .all(|pair| pair[0].revised_at() >= pair[1].revised_at()));
    }

    {
        let cutoff = Utc::now() + Duration::hours(1);
        let revisions = server
            .get_recent_revisions(guild_id, cutoff)
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to list recent revisions");

        assert!(revisions.is_empty());
    }
}

#[tokio::test]
async fn search_limit() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();

    for i in 0..105 {
        let title = format!("Archive {}", i);
        create_page(server, guild_id, &title).await;
    }

    let count = server
        .search_pages(guild_id, "Archive")
        .try_fold(0, |count, _| async move { Ok::<_, Error>(count + 1) })
        .await
        .expect("Unable to search pages");

    assert_eq!(count, 100);
}
