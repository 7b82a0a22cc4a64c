use crate::templates::DorkTemplate;
use std::fmt;

/// characters google treats as operators, and what they become
const ESCAPES: [(char, &str); 15] = [
    (':', "%3A"),
    ('+', "%2B"),
    ('.', "%2E"),
    ('"', "%22"),
    ('*', "%2A"),
    ('[', "%5B"),
    (']', "%5D"),
    ('?', "%3F"),
    ('/', "%2F"),
    ('\'', "%27"),
    ('&', "%26"),
    ('(', "%28"),
    (')', "%29"),
    ('|', "%7C"),
    (' ', "+"),
];

/// a search url built from one template and one domain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryUrl {
    url: String,
    escaped: String,
    template: DorkTemplate,
}

impl QueryUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn template(&self) -> &DorkTemplate {
        &self.template
    }

    /// the dork as it reads once the escapes are undone
    pub fn dork(&self) -> String {
        decode(&self.escaped)
    }
}

impl fmt::Display for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// escapes the operator characters of a dork, everything else is left alone
pub fn escape_dork(dork: &str) -> String {
    let mut out = String::with_capacity(dork.len() * 2);
    for c in dork.chars() {
        match ESCAPES.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// reverses [`escape_dork`], only for the escapes it produces
pub fn decode(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    'outer: while let Some(c) = rest.chars().next() {
        if c == '+' {
            out.push(' ');
            rest = &rest[1..];
            continue;
        }
        if c == '%' {
            for (from, to) in ESCAPES.iter().filter(|(_, to)| to.starts_with('%')) {
                if rest.starts_with(to) {
                    out.push(*from);
                    rest = &rest[to.len()..];
                    continue 'outer;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// `base + escaped dork + "+" + domain`
///
/// # Example
/// ```rust,ignore
/// let q = encode(&DorkTemplate::new("site: inurl:admin"), "example.com", "https://www.google.com/search?q=");
/// assert!(q.as_str().ends_with("+example.com"));
/// ```
pub fn encode(template: &DorkTemplate, domain: &str, base: &str) -> QueryUrl {
    let escaped = escape_dork(template.as_str());
    QueryUrl {
        url: format!("{base}{escaped}+{domain}"),
        escaped,
        template: template.clone(),
    }
}

pub fn encode_all(templates: &[DorkTemplate], domain: &str, base: &str) -> Vec<QueryUrl> {
    templates
        .iter()
        .map(|t| encode(t, domain, base))
        .collect()
}
