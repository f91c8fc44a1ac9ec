/*
 * watch_list/notify.rs
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
use async_trait::async_trait;
use cautious_memory_core::{GuildId, Member, Revision, UserId};
use futures::future;
use std::fmt::Debug;
use std::future::Future;

/// Looks up guilds and members on the chat platform.
#[async_trait(?Send)]
pub trait Directory: Debug {
    /// Whether the bot is still present in the guild.
    async fn has_guild(&self, guild_id: GuildId) -> bool;

    /// Fails with `IdentityNotFound` if the user is not a member of the guild.
    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> Result<Member>;
}

/// Delivers watch list notifications to users.
///
/// How a notice is rendered is up to the implementation.
#[async_trait(?Send)]
pub trait Notifier: Debug {
    async fn send_page_edit(&self, recipient: UserId, edit: &PageEdit<'_>) -> Result<Delivery>;

    async fn send_page_delete(
        &self,
        recipient: UserId,
        guild_id: GuildId,
        title: &str,
    ) -> Result<Delivery>;
}

/// A page edit, as the revision it produced and the one it replaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageEdit<'a> {
    pub old: Option<&'a Revision>,
    pub new: &'a Revision,
}

impl<'a> PageEdit<'a> {
    #[inline]
    pub fn new(old: Option<&'a Revision>, new: &'a Revision) -> Self {
        PageEdit { old, new }
    }

    #[inline]
    pub fn title(&self) -> &'a str {
        self.new.title()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Skipped,
}

/// Tally of one notification fan-out.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DeliveryReport {
    #[inline]
    pub fn attempted(&self) -> usize {
        self.sent + self.skipped + self.failed
    }
}

/// Runs one send per recipient concurrently and tallies the outcomes.
///
/// A recipient who can't be found or isn't allowed to see the page is
/// skipped. Any other error is logged and counted as a failure, and
/// never stops the remaining sends.
pub async fn fan_out<I, F, Fut>(recipients: I, send: F) -> DeliveryReport
where
    I: IntoIterator<Item = UserId>,
    F: Fn(UserId) -> Fut,
    Fut: Future<Output = Result<Delivery>>,
{
    let sends = recipients.into_iter().map(|user_id| {
        let delivery = send(user_id);

        async move { (user_id, delivery.await) }
    });

    let mut report = DeliveryReport::default();
    for (user_id, outcome) in future::join_all(sends).await {
        match outcome {
            Ok(Delivery::Sent) => report.sent += 1,
            Ok(Delivery::Skipped) => report.skipped += 1,
            Err(Error::IdentityNotFound) | Err(Error::MissingPermissions(_)) => {
                debug!("Skipping notification for user ID {}", user_id);

                report.skipped += 1;
            }
            Err(error) => {
                warn!("Unable to notify user ID {}: {}", user_id, error);

                report.failed += 1;
            }
        }
    }

    debug!(
        "Notification fan-out done: {} sent, {} skipped, {} failed",
        report.sent, report.skipped, report.failed,
    );

    report
}
