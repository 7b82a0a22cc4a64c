use std::collections::HashSet;

/// url and unicode escape leftovers that stick to scraped names
const REMNANTS: [&str; 4] = ["252f", "2f", "u003d", "x3e"];

/// lowercases, strips escape remnants and drops obvious junk
///
/// running it on its own output changes nothing
pub fn filter<I, S>(candidates: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter_map(|c| clean(c.as_ref()))
        .collect()
}

fn clean(candidate: &str) -> Option<String> {
    // lowercase first so `2F` goes with `2f`
    let mut item = candidate.to_lowercase();
    loop {
        let before = item.len();
        for remnant in REMNANTS {
            item = item.replace(remnant, "");
        }
        item = item.trim().to_string();
        if item.len() == before {
            break;
        }
    }

    let starts_alnum = item.chars().next().is_some_and(char::is_alphanumeric);
    if !starts_alnum || item.contains("xxx") || item.contains("..") {
        return None;
    }
    Some(item)
}

/// keeps hosts under the domain, the apex itself is not a find
pub fn scope_hosts(hosts: HashSet<String>, domain: &str) -> HashSet<String> {
    let suffix = format!(".{}", crate::parser::strip_www(&domain.to_lowercase()));
    hosts.into_iter().filter(|h| h.contains(&suffix)).collect()
}
