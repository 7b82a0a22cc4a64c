use crate::block;
use crate::config::Settings;
use crate::encoder::QueryUrl;
use crate::error::{DorkError, Result};
use crate::file_util::read_lines;
use crate::user_agents::UserAgentPool;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Proxy};
use std::path::Path;
use std::time::Duration;

/// an outbound proxy, always carries a scheme
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyEntry(String);

impl ProxyEntry {
    pub fn parse(raw: &str) -> Option<Self> {
        setup_proxy(raw.trim()).map(ProxyEntry)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// adds `http://` to a proxy that came without a scheme
/// # example
/// ```rust,ignore
/// let x: String = setup_proxy("127.0.0.1:8095").unwrap();
/// assert_eq!(x, "http://127.0.0.1:8095");
/// ```
pub fn setup_proxy(proxy: &str) -> Option<String> {
    if proxy.is_empty() {
        return None;
    }

    let protocols = ["http://", "https://", "socks4://", "socks5://"];
    if protocols.iter().any(|p| proxy.starts_with(p)) {
        return Some(proxy.to_string());
    }
    if proxy.contains("://") {
        return None;
    }
    Some(format!("http://{proxy}"))
}

/// one proxy per line, bad lines are reported and skipped
pub fn load_proxies<P: AsRef<Path>>(path: P) -> Result<Vec<ProxyEntry>> {
    let mut proxies = vec![];
    for line in read_lines(path)? {
        match ProxyEntry::parse(&line) {
            Some(p) if Proxy::all(p.as_str()).is_ok() => proxies.push(p),
            _ => warn!(format!("skipping invalid proxy: {line}")),
        }
    }
    Ok(proxies)
}

/// sleep between two requests: `rand(min..=max) seconds - offset`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jitter {
    pub min_secs: u64,
    pub max_secs: u64,
    pub offset_ms: u64,
}

impl Jitter {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min_secs: settings.delay_min_secs,
            max_secs: settings.delay_max_secs.max(settings.delay_min_secs),
            offset_ms: settings.delay_offset_ms,
        }
    }

    pub fn delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let secs = rng.gen_range(self.min_secs..=self.max_secs);
        Duration::from_millis(secs.saturating_mul(1000).saturating_sub(self.offset_ms))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    /// body is usable as is
    Ok,
    /// timeout or connection failure, body is empty
    Failed,
    /// google served its bot page
    Blocked,
    /// blocked, but the relay got us the page
    Recovered,
    /// blocked and the relay failed too
    HardBlocked,
}

/// one request for one query url
#[derive(Clone, Debug)]
pub struct FetchAttempt {
    pub query: QueryUrl,
    pub user_agent: String,
    pub proxy: Option<ProxyEntry>,
    pub body: String,
    pub status: FetchStatus,
}

/// sends the dork requests one by one, never more than one in flight
pub struct PacedFetcher {
    client: Client,
    user_agents: UserAgentPool,
    proxies: Vec<ProxyEntry>,
    timeout: Duration,
    jitter: Jitter,
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers
}

fn build_client(timeout: Duration, proxy: Option<&ProxyEntry>) -> Result<Client> {
    let mut builder = Client::builder()
        .default_headers(default_headers())
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(p) = proxy {
        builder = builder.proxy(Proxy::all(p.as_str())?);
    }

    Ok(builder.build()?)
}

impl PacedFetcher {
    pub fn new(
        settings: &Settings,
        user_agents: UserAgentPool,
        proxies: Vec<ProxyEntry>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout(), None)?,
            user_agents,
            proxies,
            timeout: settings.timeout(),
            jitter: Jitter::from_settings(settings),
        })
    }

    pub fn user_agents(&self) -> &UserAgentPool {
        &self.user_agents
    }

    /// picks a user agent and maybe a proxy for the next request
    fn pick_identity(&self) -> (String, Option<ProxyEntry>) {
        let mut rng = rand::thread_rng();
        let ua = self.user_agents.pick(&mut rng).to_string();
        let proxy = self.proxies.choose(&mut rng).cloned();
        (ua, proxy)
    }

    /// proxied requests get their own client, the proxy is fixed at build time
    fn client_for(&self, proxy: Option<&ProxyEntry>) -> Result<Client> {
        match proxy {
            None => Ok(self.client.clone()),
            Some(p) => build_client(self.timeout, Some(p)),
        }
    }

    /// GET `url`, the body is read whatever the status code is
    pub async fn get_text(
        &self,
        url: &str,
        user_agent: &str,
        proxy: Option<&ProxyEntry>,
    ) -> Result<String> {
        let client = self.client_for(proxy)?;
        let response = client
            .get(url)
            .header(header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| transient(url, e))?;

        tracing::debug!(%url, status = response.status().as_u16(), "got response");
        response.text().await.map_err(|e| transient(url, e))
    }

    /// POST a form, used for the relay
    pub async fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<String> {
        let user_agent = {
            let mut rng = rand::thread_rng();
            self.user_agents.pick(&mut rng).to_string()
        };
        let response = self
            .client
            .post(url)
            .header(header::USER_AGENT, user_agent)
            .form(form)
            .send()
            .await
            .map_err(|e| transient(url, e))?;

        tracing::debug!(%url, status = response.status().as_u16(), "got relay response");
        response.text().await.map_err(|e| transient(url, e))
    }

    /// one query, no retries, failures end up as an empty body
    pub async fn fetch(&self, query: &QueryUrl) -> FetchAttempt {
        let (user_agent, proxy) = self.pick_identity();
        tracing::debug!(url = %query, proxy = ?proxy.as_ref().map(ProxyEntry::as_str), "fetching dork");

        let (body, status) = match self.get_text(query.as_str(), &user_agent, proxy.as_ref()).await
        {
            Ok(body) if block::is_blocked(&body) => (body, FetchStatus::Blocked),
            Ok(body) => (body, FetchStatus::Ok),
            Err(e) => {
                warn!(format!("dork `{}` failed: {e}", query.dork()));
                (String::new(), FetchStatus::Failed)
            }
        };

        FetchAttempt {
            query: query.clone(),
            user_agent,
            proxy,
            body,
            status,
        }
    }

    /// waits out the jitter window before the next request
    pub async fn pause(&self) {
        let delay = {
            let mut rng = rand::thread_rng();
            self.jitter.delay(&mut rng)
        };
        tracing::trace!(?delay, "sleeping before next request");
        tokio::time::sleep(delay).await;
    }
}

fn transient(url: &str, e: reqwest::Error) -> DorkError {
    let reason = if e.is_timeout() {
        "timed out".to_string()
    } else {
        e.to_string()
    };
    DorkError::TransientFetch {
        url: url.to_string(),
        reason,
    }
}
