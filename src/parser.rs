use regex::Regex;
use std::collections::HashSet;

/// markup google wraps around matched words
const MARKUP: [&str; 9] = [
    "<em>", "<b>", "</b>", "</em>", "%3a", "<strong>", "</strong>", "<wbr>", "</wbr>",
];

/// delimiters that would otherwise glue onto a hostname
const DELIMITERS: [&str; 12] = [
    "<", ">", ":", "=", ";", "&", "%3A", "%3D", "%3C", "%2f", "/", "\\",
];

/// rfc 6531 local part without `*` and `()`, those were mostly false positives
const EMAIL_LOCAL: &str = r"[a-zA-Z0-9.\-_+#~!$&',;=:]+";
const HOST_CHARS: &str = r"[a-zA-Z0-9.-]*";

pub fn strip_www(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}

/// extracts hostnames and emails for one domain out of raw search pages
pub struct ArtifactParser {
    text: String,
    domain: String,
}

impl ArtifactParser {
    pub fn new(corpus: &str, domain: &str) -> Self {
        Self {
            text: generic_clean(corpus),
            domain: domain.trim().to_lowercase(),
        }
    }

    pub fn hostnames(&self) -> HashSet<String> {
        let mut hosts = find_all(&self.text, &host_pattern(&self.domain));
        let bare = strip_www(&self.domain);
        if bare != self.domain {
            hosts.extend(find_all(&self.text, &host_pattern(bare)));
        }
        hosts
    }

    pub fn emails(&self) -> HashSet<String> {
        let pattern = format!(
            "{EMAIL_LOCAL}@{HOST_CHARS}{}",
            regex::escape(strip_www(&self.domain))
        );

        find_all(&self.text, &pattern)
            .into_iter()
            .map(|email| {
                let email = email.strip_prefix('.').unwrap_or(&email);
                email.trim().to_lowercase()
            })
            .filter(|email| email.len() >= 2)
            .collect()
    }
}

/// removes markup and turns delimiters into spaces
pub fn generic_clean(raw: &str) -> String {
    let mut text = raw.to_string();
    for tag in MARKUP {
        text = text.replace(tag, "");
    }
    for delim in DELIMITERS {
        text = text.replace(delim, " ");
    }
    text
}

fn host_pattern(domain: &str) -> String {
    format!(r"{HOST_CHARS}\.{}", regex::escape(domain))
}

fn find_all(text: &str, pattern: &str) -> HashSet<String> {
    match Regex::new(pattern) {
        Ok(re) => re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        Err(e) => {
            tracing::debug!(%pattern, error = %e, "bad artifact pattern");
            HashSet::new()
        }
    }
}

pub fn extract_hostnames(corpus: &str, domain: &str) -> HashSet<String> {
    ArtifactParser::new(corpus, domain).hostnames()
}

pub fn extract_emails(corpus: &str, domain: &str) -> HashSet<String> {
    ArtifactParser::new(corpus, domain).emails()
}
