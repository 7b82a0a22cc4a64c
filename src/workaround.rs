use crate::block;
use crate::encoder::QueryUrl;
use crate::error::{DorkError, Result};
use crate::request::PacedFetcher;
use rand::Rng;

/// shown by the relay's cloudflare front while it makes us wait
pub const INTERSTITIAL_MARKER: &str = "Please Wait... | Cloudflare";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkaroundOutcome {
    Recovered(String),
    HardBlocked(String),
}

/// asks a third party relay to fetch the blocked url for us
pub struct WorkaroundClient<'a> {
    fetcher: &'a PacedFetcher,
    relay_url: &'a str,
}

impl<'a> WorkaroundClient<'a> {
    pub fn new(fetcher: &'a PacedFetcher, relay_url: &'a str) -> Self {
        Self {
            fetcher,
            relay_url,
        }
    }

    pub async fn recover(&self, query: &QueryUrl) -> WorkaroundOutcome {
        info!("Trying to bypass Google IP block...");

        // the relay picks its own user agent from this index
        let uak = rand::thread_rng().gen_range(4..=8u8).to_string();
        let form = [
            ("Cookie", String::new()),
            ("url", query.as_str().to_string()),
            ("submit", "Submit".to_string()),
            ("type", "GET&http=1.1".to_string()),
            ("uak", uak),
        ];

        let relayed = match self.fetcher.post_form(self.relay_url, &form).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "relay unreachable");
                String::new()
            }
        };

        match decode_relay(&relayed) {
            Ok(html) => WorkaroundOutcome::Recovered(html),
            Err(e) => {
                tracing::debug!(error = %e, "relay did not give us the page");
                WorkaroundOutcome::HardBlocked(e.to_string())
            }
        }
    }
}

/// pulls the escaped google page out of the relay's answer
///
/// an empty answer counts as a block page, so does anything the relay's
/// own bot protection sends back
pub fn decode_relay(relayed: &str) -> Result<String> {
    // nothing back is as good as a block page
    let relayed = if relayed.is_empty() {
        block::BLOCK_SIGNATURES[0]
    } else {
        relayed
    };
    if relayed.contains(INTERSTITIAL_MARKER) {
        return Err(DorkError::RelayDecode(
            "relay is behind a cloudflare challenge".to_string(),
        ));
    }
    if block::is_blocked(relayed) {
        return Err(DorkError::RelayDecode(
            "google is blocking the relay as well".to_string(),
        ));
    }

    let start = relayed
        .find("&lt;html&gt;")
        .or_else(|| relayed.find("&lt;html"))
        .ok_or_else(|| DorkError::RelayDecode("no escaped html document".to_string()))?;

    let close = "&lt;/html&gt;";
    let end = relayed[start..]
        .find(close)
        .map(|i| start + i + close.len())
        .ok_or_else(|| DorkError::RelayDecode("escaped html is not closed".to_string()))?;

    Ok(unescape(&relayed[start..end]))
}

/// htmlescape rejects stray `&`, fall back to the brackets
fn unescape(escaped: &str) -> String {
    match htmlescape::decode_html(escaped) {
        Ok(html) => html,
        Err(_) => escaped
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&"),
    }
}
