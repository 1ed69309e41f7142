//! HTTP implementation of the `AuthProbe` port.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;

use crate::application::ports::AuthProbe;
use crate::domain::user::Identity;

/// Posts credentials to `<rest_url>/security/authenticate` with `ureq`.
pub struct HttpAuthProbe {
    timeout: Duration,
}

impl Default for HttpAuthProbe {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

/// `true` when the response body carries a non-empty `result.token`.
fn has_token(body: &serde_json::Value) -> bool {
    body.get("result")
        .and_then(|r| r.get("token"))
        .and_then(serde_json::Value::as_str)
        .is_some_and(|t| !t.is_empty())
}

impl AuthProbe for HttpAuthProbe {
    async fn authenticate(
        &self,
        rest_url: &str,
        identity: &Identity,
        password: &str,
    ) -> Result<bool> {
        let url = format!("{}/security/authenticate", rest_url.trim_end_matches('/'));
        let body = json!({ "identifier": identity.as_str(), "password": password });
        let timeout = self.timeout;

        // ureq is blocking; keep it off the runtime threads.
        tokio::task::spawn_blocking(move || {
            let agent = ureq::AgentBuilder::new().timeout(timeout).build();
            match agent.post(&url).send_json(body) {
                Ok(resp) => {
                    let value: serde_json::Value =
                        resp.into_json().context("decoding authentication response")?;
                    Ok(has_token(&value))
                }
                Err(ureq::Error::Status(401 | 403, _)) => Ok(false),
                Err(e) => Err(anyhow::Error::new(e)).with_context(|| format!("POST {url}")),
            }
        })
        .await
        .context("spawn_blocking for authenticate")?
    }
}
