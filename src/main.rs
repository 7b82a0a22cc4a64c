#![allow(dead_code)]
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// first, the other modules use its macros
mod logging;

mod block;
mod config;
mod encoder;
mod error;
mod file_util;
mod filter;
mod google_search;
mod parser;
mod request;
mod save_util;
mod templates;
mod tests;
mod user_agents;
mod workaround;

use config::Settings;
use google_search::perform_google_dorking;
use request::{load_proxies, PacedFetcher};
use user_agents::UserAgentPool;

#[derive(Parser, Debug)]
#[command(name = "dorkhuntrs", version)]
#[command(about = "Google dorking for hostnames and emails of a target domain")]
struct Cli {
    /// Target domains, each one is dorked on its own
    #[arg(required = true)]
    domains: Vec<String>,

    /// Newline separated dork templates
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Newline separated proxies, one is picked per request
    #[arg(short, long)]
    proxies: Option<PathBuf>,

    /// Toml file with settings, flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the dork_results directory is created
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Per request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long)]
    search_url: Option<String>,

    #[arg(long)]
    relay_url: Option<String>,

    /// Do not write the csv file
    #[arg(long)]
    no_save: bool,

    /// Print the results as json
    #[arg(long)]
    json: bool,

    /// Debug output, RUST_LOG takes precedence
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings, error::DorkError> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(t) = &self.templates {
            settings.templates = t.clone();
        }
        if let Some(p) = &self.proxies {
            settings.proxies = Some(p.clone());
        }
        if let Some(o) = &self.output_dir {
            settings.output_dir = o.clone();
        }
        if let Some(t) = self.timeout {
            settings.timeout_secs = t;
        }
        if let Some(u) = &self.search_url {
            settings.search_url = u.clone();
        }
        if let Some(u) = &self.relay_url {
            settings.relay_url = u.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "dorkhuntrs=debug"
    } else {
        "dorkhuntrs=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings()?;
    let templates = templates::load_or_empty(&settings.templates);

    let proxies = match &settings.proxies {
        Some(path) => load_proxies(path).unwrap_or_else(|e| {
            warn!(format!("{e}, continuing without proxies"));
            vec![]
        }),
        None => vec![],
    };

    let fetcher = PacedFetcher::new(&settings, UserAgentPool::default(), proxies)?;

    let mut reports = Vec::with_capacity(cli.domains.len());
    for domain in &cli.domains {
        info!(format!("Performing Google dorking on {domain}"));
        reports.push(perform_google_dorking(domain, &templates, &settings, &fetcher).await);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (i, report) in reports.iter().enumerate() {
            save_util::print_report(i + 1, report);
        }
    }

    if !cli.no_save {
        save_util::save_or_report(&settings.output_dir, &reports);
    }

    Ok(())
}
