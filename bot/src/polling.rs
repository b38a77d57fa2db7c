//! Long-polling update loop.

use crate::handler::BotHandler;
use crate::telegram::{TelegramClient, Update};
use pricescout_scanner::ProductSearch;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause after a failed `getUpdates` before polling again.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Poll for updates until Ctrl-C, handling each message on its own task.
pub async fn run_polling<S>(handler: Arc<BotHandler<S, TelegramClient>>)
where
    S: ProductSearch + 'static,
{
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut offset = None;
    loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break,
            polled = handler.messenger().get_updates(offset) => polled,
        };

        match polled {
            Ok(updates) => {
                offset = next_offset(&updates).or(offset);
                for update in updates {
                    dispatch(&handler, update);
                }
            }
            Err(e) => {
                warn!(error = %e, retry_in = ?POLL_RETRY_DELAY, "polling failed");
                tokio::select! {
                    _ = &mut shutdown => break,
                    () = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                }
            }
        }
    }

    info!("shutdown requested, stopped polling");
}

/// Offset acknowledging every update in the batch.
fn next_offset(updates: &[Update]) -> Option<i64> {
    updates.iter().map(|u| u.update_id + 1).max()
}

fn dispatch<S>(handler: &Arc<BotHandler<S, TelegramClient>>, update: Update)
where
    S: ProductSearch + 'static,
{
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        debug!(update_id = update.update_id, "skipping non-text message");
        return;
    };

    let chat_id = message.chat.id;
    let handler = Arc::clone(handler);
    tokio::spawn(async move {
        if let Err(e) = handler.handle_text(chat_id, &text).await {
            warn!(chat_id, error = %e, "failed to reply");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(update_id: i64) -> Update {
        Update {
            update_id,
            message: None,
        }
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(next_offset(&[]), None);
        assert_eq!(next_offset(&[update(5)]), Some(6));
        assert_eq!(next_offset(&[update(7), update(9), update(8)]), Some(10));
    }
}
