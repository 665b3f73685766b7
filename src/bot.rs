//! The chat side: long-polls for commands and answers them from the cached
//! reading, never from the cloud directly.

use std::time::Duration;

use crate::{api::Telegram, monitor::LatestReading, prelude::*, reading::Reading, render};

const GREETING: &str = "Hi! Send /status to get the inverter data.";

/// Pause after a failed poll, so a dead network does not spin the loop.
const RETRY_PAUSE: Duration = Duration::from_secs(5);

/// Serve commands until the task is dropped.
pub async fn run(api: &Telegram, latest: &LatestReading) -> Result {
    let me = api.get_me().await.context("failed to start the bot")?;
    info!(username = me.username.as_deref().unwrap_or("<unnamed>"), "Serving…");

    let mut offset = 0;
    loop {
        let updates = match api.get_updates(offset).await {
            Ok(updates) => updates,
            Err(error) => {
                warn!("Failed to poll for updates: {error:#}");
                tokio::time::sleep(RETRY_PAUSE).await;
                continue;
            }
        };
        for update in updates {
            offset = offset.max(update.id + 1);
            let Some(message) = update.message else { continue };
            let Some(text) = message.text.as_deref() else { continue };
            let Some(reply) = respond(text, latest.get().as_ref()) else { continue };
            if let Err(error) = api.send_message(message.chat.id, &reply).await {
                warn!(chat_id = message.chat.id, "Failed to reply: {error:#}");
            }
        }
    }
}

/// The reply to an inbound message, or `None` when the message is not ours
/// to answer.
fn respond(text: &str, latest: Option<&Reading>) -> Option<String> {
    let command = text.split_whitespace().next()?;
    // Group chats address commands as `/status@BotName`.
    let command = command.split('@').next().unwrap_or(command);
    match command {
        "/start" => Some(GREETING.to_string()),
        "/status" => Some(render::describe_reading(latest)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::units::Watts;

    fn reading() -> Reading {
        Reading {
            ac_power: Some(Watts::from(500.0)),
            yield_today: None,
            yield_total: None,
            feed_in_power: None,
            fetched_at: Local::now(),
        }
    }

    #[test]
    fn start_is_greeted() {
        assert_eq!(respond("/start", None).as_deref(), Some(GREETING));
    }

    #[test]
    fn status_reports_the_cached_reading() {
        let reply = respond("/status", Some(&reading())).unwrap();
        assert!(reply.contains("500 W"));
    }

    #[test]
    fn status_with_empty_slot_reports_no_data() {
        let reply = respond("/status", None).unwrap();
        assert!(reply.contains("No data"));
    }

    #[test]
    fn group_chat_suffix_is_accepted() {
        assert!(respond("/status@MeerkatSolarBot", Some(&reading())).is_some());
    }

    #[test]
    fn other_messages_are_ignored() {
        assert_eq!(respond("hello", None), None);
        assert_eq!(respond("", None), None);
        assert_eq!(respond("/stop", None), None);
    }
}
