//! Background inbox poller — feeds the pipeline from IMAP instead of the
//! webhook. Only active when `MAIL_POLL_SECS` is configured; each tick is
//! skipped while the automation switch is stopped.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::automation::{AutomationSwitch, Pipeline};
use crate::mail::monitor::fetch_job_notifications;

pub struct PollerConfig {
    pub imap_host: String,
    pub email: String,
    pub password: String,
    pub interval: Duration,
}

/// Runs forever; spawn it as a background task.
pub async fn run_inbox_poller(
    pipeline: Arc<Pipeline>,
    switch: AutomationSwitch,
    config: PollerConfig,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !switch.is_running() {
            continue;
        }

        let notifications = match fetch_job_notifications(
            config.imap_host.clone(),
            config.email.clone(),
            config.password.clone(),
        )
        .await
        {
            Ok(notifications) => notifications,
            Err(e) => {
                error!("Inbox poll failed: {e}");
                continue;
            }
        };

        if !notifications.is_empty() {
            info!("Inbox poll found {} job notification(s)", notifications.len());
        }
        for notification in notifications {
            if let Err(e) = pipeline
                .process_notification(
                    &notification.subject,
                    &notification.body,
                    &notification.sender,
                )
                .await
            {
                error!("Polled notification failed: {e}");
            }
        }
    }
}
