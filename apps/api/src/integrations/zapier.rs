//! Outbound Zapier forwarder — posts pipeline event summaries to a
//! configured hook URL. Best-effort: failures are logged and swallowed so
//! they can never affect the pipeline outcome.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{error, info};

pub struct ZapierNotifier {
    http: reqwest::Client,
    hook_url: String,
}

impl ZapierNotifier {
    pub fn new(hook_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ZapierNotifier { http, hook_url })
    }

    /// Sends one event to the hook. Returns the hook's JSON response when the
    /// call succeeded, `None` otherwise.
    pub async fn forward(&self, event: &Value) -> Option<Value> {
        let result = self
            .http
            .post(&self.hook_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(event)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => {
                    info!("Event forwarded to Zapier. Response: {body}");
                    Some(body)
                }
                Err(e) => {
                    error!("Zapier returned a non-JSON response: {e}");
                    None
                }
            },
            Err(e) => {
                error!("Zapier integration error: {e}");
                None
            }
        }
    }
}
