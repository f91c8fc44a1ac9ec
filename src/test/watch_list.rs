/*
 * test/watch_list.rs
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

#[tokio::test]
async fn subscriptions() {
    let env = create_server().await;

    let server = &env.server;
    let guild_id = random_guild();
    let member = Member::new(guild_id, random_user(), vec![]);

    for title in &["Zebra", "apple", "Mango"] {
        create_page(server, guild_id, title).await;
    }

    assert_eq!(server.watch_page(&member, "ZEBRA").await.unwrap(), true);
    assert_eq!(server.watch_page(&member, "zebra").await.unwrap(), false);
    assert_eq!(server.watch_page(&member, "Apple").await.unwrap(), true);
    assert_eq!(server.watch_page(&member, "mango").await.unwrap(), true);

    {
        let error = server
            .watch_page(&member, "Nowhere")
            .await
            .expect_err("Watched missing page");

        match error {
            Error::PageNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }

    {
        let watched = server
            .watch_list(&member)
            .map_ok(|(_, title)| title)
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to get watch list");

        assert_eq!(watched, vec!["apple", "Mango", "Zebra"]);
    }

    assert_eq!(server.unwatch_page(&member, "Mango").await.unwrap(), true);
    assert_eq!(server.unwatch_page(&member, "Mango").await.unwrap(), false);
    assert_eq!(server.unwatch_page(&member, "Nowhere").await.unwrap(), false);

    {
        // Watch lists are per guild
        let elsewhere = Member::new(random_guild(), member.user_id(), vec![]);
        let watched = server
            .watch_list(&elsewhere)
            .try_collect::<Vec<_>>()
            .await
            .expect("Unable to get watch list");

        assert!(watched.is_empty());
    }

    let page_id = server.get_page_id(guild_id, "Zebra").await.unwrap().unwrap();
    let other = random_user();
    server
        .watch_page(&Member::new(guild_id, other, vec![]), "Zebra")
        .await
        .unwrap();

    let mut subscribers = server.page_subscribers(page_id).await.unwrap();
    subscribers.sort();
    let mut expected = vec![member.user_id(), other];
    expected.sort();
    assert_eq!(subscribers, expected);

    assert_eq!(server.delete_page_subscribers(page_id).await.unwrap(), 2);
    assert!(server.page_subscribers(page_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_notifications() {
    let env = create_server().await;

    let TestEnv {
        server,
        directory,
        notifier,
    } = &env;

    let guild_id = random_guild();
    let role_id = random_role();
    let author = Member::new(guild_id, random_user(), vec![role_id]);
    let watcher = Member::new(guild_id, random_user(), vec![role_id]);

    server
        .set_role_permissions(role_id, Permissions::DEFAULT)
        .await
        .unwrap();

    directory.add_member(&author);
    directory.add_member(&watcher);

    server
        .create_page(guild_id, "Home", "v1", author.user_id())
        .await
        .expect("Unable to create page");

    server.watch_page(&author, "Home").await.unwrap();
    server.watch_page(&watcher, "Home").await.unwrap();

    server
        .revise_page(guild_id, "Home", "v2", author.user_id())
        .await
        .expect("Unable to revise page");

    // Only the watcher hears about it, not the author
    assert_eq!(
        &*notifier.edits.borrow(),
        &[SentEdit {
            recipient: watcher.user_id(),
            old_content: Some("v1".to_string()),
            new_content: "v2".to_string(),
        }],
    );
}

#[tokio::test]
async fn edit_recipients() {
    let env = create_server().await;

    let TestEnv {
        server,
        directory,
        notifier,
    } = &env;

    let guild_id = random_guild();
    let role_id = random_role();
    let hidden_role_id = random_role();
    let author_id = random_user();

    let viewer = Member::new(guild_id, random_user(), vec![role_id]);
    let blind = Member::new(guild_id, random_user(), vec![hidden_role_id]);
    let departed = Member::new(guild_id, random_user(), vec![role_id]);
    let failing = Member::new(guild_id, random_user(), vec![role_id]);

    server
        .set_role_permissions(hidden_role_id, Permissions::EDIT)
        .await
        .unwrap();

    for member in &[&viewer, &blind, &departed, &failing] {
        directory.add_member(member);
    }

    create_page(server, guild_id, "Secrets").await;
    for member in &[&viewer, &blind, &departed, &failing] {
        server.watch_page(member, "Secrets").await.unwrap();
    }

    directory.remove_member(&departed);
    notifier.fail_for(failing.user_id());

    let revision_id = server
        .revise_page(guild_id, "Secrets", "new text", author_id)
        .await
        .expect("Unable to revise page");

    let recipients = notifier
        .edits
        .borrow()
        .iter()
        .map(|edit| edit.recipient)
        .collect::<Vec<_>>();

    assert_eq!(recipients, vec![viewer.user_id()]);

    // Events may be delivered more than once
    let report = server
        .on_page_edit(revision_id)
        .await
        .expect("Unable to dispatch edit");

    assert_eq!(
        report,
        DeliveryReport {
            sent: 1,
            skipped: 2,
            failed: 1,
        },
    );

    assert_eq!(report.attempted(), 4);
    assert_eq!(notifier.edits.borrow().len(), 2);
}

#[tokio::test]
async fn edit_without_guild() {
    let env = create_server().await;

    let TestEnv {
        server,
        directory,
        notifier,
    } = &env;

    let guild_id = random_guild();
    let watcher = Member::new(guild_id, random_user(), vec![]);
    directory.add_member(&watcher);

    create_page(server, guild_id, "Home").await;
    server.watch_page(&watcher, "Home").await.unwrap();
    directory.remove_guild(guild_id);

    let revision_id = server
        .revise_page(guild_id, "Home", "v2", random_user())
        .await
        .expect("Unable to revise page");

    let report = server.on_page_edit(revision_id).await.unwrap();
    assert_eq!(report, DeliveryReport::default());
    assert!(notifier.edits.borrow().is_empty());

    {
        let error = server
            .on_page_edit(RevisionId::from_raw(-1))
            .await
            .expect_err("Dispatched missing revision");

        match error {
            Error::RevisionNotFound => (),
            _ => panic!("Error doesn't match"),
        }
    }
}

#[tokio::test]
async fn delete_notifications() {
    let env = create_server().await;

    let TestEnv {
        server,
        directory,
        notifier,
    } = &env;

    let guild_id = random_guild();
    let (page_id, _) = create_page(server, guild_id, "Doomed").await;

    let watchers = (0..5)
        .map(|_| Member::new(guild_id, random_user(), vec![]))
        .collect::<Vec<_>>();

    for watcher in &watchers {
        directory.add_member(watcher);
        server.watch_page(watcher, "Doomed").await.unwrap();
    }

    notifier.fail_for(watchers[0].user_id());
    notifier.fail_for(watchers[1].user_id());
    directory.remove_member(&watchers[2]);

    server
        .delete_page(guild_id, "doomed")
        .await
        .expect("Unable to delete page");

    // Subscriptions are gone regardless of how sending went
    assert!(server.page_subscribers(page_id).await.unwrap().is_empty());

    let deletes = notifier.deletes.borrow();
    assert_eq!(deletes.len(), 2);
    assert!(deletes.iter().all(|(_, title)| title == "Doomed"));
}

#[tokio::test]
async fn delete_without_guild() {
    let env = create_server().await;

    let TestEnv {
        server,
        directory,
        notifier,
    } = &env;

    let guild_id = random_guild();
    let watcher = Member::new(guild_id, random_user(), vec![]);
    directory.add_member(&watcher);

    let (page_id, _) = create_page(server, guild_id, "Home").await;
    server.watch_page(&watcher, "Home").await.unwrap();
    directory.remove_guild(guild_id);

    let report = server
        .on_page_delete(guild_id, page_id, "Home")
        .await
        .expect("Unable to dispatch deletion");

    assert_eq!(report, DeliveryReport::default());
    assert!(notifier.deletes.borrow().is_empty());

    // Nothing is cleared without a guild to notify
    assert_eq!(
        server.page_subscribers(page_id).await.unwrap(),
        vec![watcher.user_id()],
    );
}
