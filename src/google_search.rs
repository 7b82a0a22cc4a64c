use crate::config::Settings;
use crate::encoder::{self, QueryUrl};
use crate::filter;
use crate::parser::ArtifactParser;
use crate::request::{FetchStatus, PacedFetcher};
use crate::templates::DorkTemplate;
use crate::workaround::{WorkaroundClient, WorkaroundOutcome};
use serde::Serialize;

/// every page fetched for one domain, in template order
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    text: String,
}

impl Corpus {
    pub fn append(&mut self, body: &str) {
        self.text.push_str(body);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching { index: usize },
    Blocked { index: usize },
    Done,
    HardBlocked { after: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunOutcome {
    Done,
    /// `after` templates were sent before google shut us out
    HardBlocked { after: usize },
}

#[derive(Clone, Debug, Serialize)]
pub struct DorkReport {
    pub domain: String,
    pub hosts: Vec<String>,
    pub emails: Vec<String>,
    pub outcome: RunOutcome,
    pub attempts: usize,
}

impl DorkReport {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.emails.is_empty()
    }
}

/// one dorking run for one domain
pub struct DorkRun<'a> {
    domain: String,
    queries: Vec<QueryUrl>,
    fetcher: &'a PacedFetcher,
    relay: WorkaroundClient<'a>,
    corpus: Corpus,
    state: RunState,
    /// final status of every attempt, in order
    statuses: Vec<FetchStatus>,
    progress_every: usize,
}

impl<'a> DorkRun<'a> {
    pub fn new(
        domain: &str,
        templates: &[DorkTemplate],
        settings: &'a Settings,
        fetcher: &'a PacedFetcher,
    ) -> Self {
        let domain = domain.trim().to_string();
        Self {
            queries: encoder::encode_all(templates, &domain, &settings.search_url),
            domain,
            fetcher,
            relay: WorkaroundClient::new(fetcher, &settings.relay_url),
            corpus: Corpus::default(),
            state: RunState::Idle,
            statuses: Vec::new(),
            progress_every: settings.progress_every,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn statuses(&self) -> &[FetchStatus] {
        &self.statuses
    }

    /// sends the dorks one at a time until they run out or google wins
    pub async fn fetch_all(&mut self) -> RunState {
        self.state = if self.queries.is_empty() {
            RunState::Done
        } else {
            RunState::Fetching { index: 0 }
        };

        while let RunState::Fetching { index } = self.state {
            if self.progress_every > 0 && index > 0 && index % self.progress_every == 0 {
                info!(format!("Searching through {index} results"));
            }

            let query = &self.queries[index];
            let mut attempt = self.fetcher.fetch(query).await;

            if attempt.status == FetchStatus::Blocked {
                self.state = RunState::Blocked { index };
                warn!("Google is blocking your IP due to too many automated requests, wait or change your IP");

                match self.relay.recover(query).await {
                    WorkaroundOutcome::Recovered(html) => {
                        attempt.body = html;
                        attempt.status = FetchStatus::Recovered;
                    }
                    WorkaroundOutcome::HardBlocked(reason) => {
                        tracing::debug!(domain = %self.domain, %reason, "hard blocked");
                        err!("Google is blocking your ip and the workaround, returning");
                        attempt.status = FetchStatus::HardBlocked;
                        self.statuses.push(attempt.status);
                        self.state = RunState::HardBlocked { after: index + 1 };
                        break;
                    }
                }
            }

            tracing::trace!(status = ?attempt.status, bytes = attempt.body.len(), "attempt done");
            self.statuses.push(attempt.status);
            self.corpus.append(&attempt.body);

            let next = index + 1;
            if next < self.queries.len() {
                self.fetcher.pause().await;
                self.state = RunState::Fetching { index: next };
            } else {
                self.state = RunState::Done;
            }
        }

        self.state
    }

    /// parses whatever the corpus holds, also after a hard block
    pub fn report(&self) -> DorkReport {
        let parser = ArtifactParser::new(self.corpus.as_str(), &self.domain);
        let hosts = filter::scope_hosts(filter::filter(parser.hostnames()), &self.domain);
        let emails = filter::filter(parser.emails());

        let mut hosts: Vec<String> = hosts.into_iter().collect();
        let mut emails: Vec<String> = emails.into_iter().collect();
        hosts.sort();
        emails.sort();

        let outcome = match self.state {
            RunState::HardBlocked { after } => RunOutcome::HardBlocked { after },
            _ => RunOutcome::Done,
        };

        DorkReport {
            domain: self.domain.clone(),
            hosts,
            emails,
            outcome,
            attempts: self.statuses.len(),
        }
    }
}

/// dorks one domain and parses the pages into hosts and emails
pub async fn perform_google_dorking(
    domain: &str,
    templates: &[DorkTemplate],
    settings: &Settings,
    fetcher: &PacedFetcher,
) -> DorkReport {
    let mut run = DorkRun::new(domain, templates, settings, fetcher);
    run.fetch_all().await;
    run.report()
}
