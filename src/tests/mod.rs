/*
 * Network tests talk to a local wiremock server only
 */

#[cfg(test)]
mod tests {
    use crate::block::is_blocked;
    use crate::config::Settings;
    use crate::encoder::{decode, encode, escape_dork};
    use crate::filter::{filter, scope_hosts};
    use crate::google_search::{DorkReport, RunOutcome};
    use crate::parser::{extract_emails, extract_hostnames, generic_clean};
    use crate::request::{load_proxies, setup_proxy, Jitter, ProxyEntry};
    use crate::save_util::save_reports;
    use crate::templates::{self, DorkTemplate};
    use crate::user_agents::UserAgentPool;
    use crate::workaround::decode_relay;
    use std::collections::HashSet;
    use std::io::Write;

    macro_rules! data {
        () => {
            "example.com"
        };
    }

    macro_rules! set {
        ($($s:expr),* $(,)?) => {
            [$($s.to_string()),*].into_iter().collect::<HashSet<String>>()
        };
    }

    const BLOCK_PHRASE: &str =
        "This page appears when Google automatically detects requests coming from your computer network";

    #[test]
    fn encode_site_inurl() {
        let q = encode(
            &DorkTemplate::new("site: inurl:admin"),
            data!(),
            "https://www.google.com/search?q=",
        );
        assert!(q.as_str().starts_with("https://www.google.com/search?q="));
        assert!(q.as_str().contains("site%3A"));
        assert!(q.as_str().contains("inurl%3Aadmin"));
        assert!(q.as_str().ends_with("+example.com"));
    }

    #[test]
    fn encode_escapes_whole_set() {
        let dork = r#"a:b+c.d"e*f[g]h?i/j'k&l(m)n|o p"#;
        let escaped = escape_dork(dork);
        for c in [':', '.', '"', '*', '[', ']', '?', '/', '\'', '&', '(', ')', '|', ' '] {
            assert!(!escaped.contains(c), "{c} left unescaped in {escaped}");
        }
        assert_eq!(
            escaped,
            "a%3Ab%2Bc%2Ed%22e%2Af%5Bg%5Dh%3Fi%2Fj%27k%26l%28m%29n%7Co+p"
        );
        assert_eq!(decode(&escaped), dork);
    }

    #[test]
    fn encode_leaves_other_chars_alone() {
        let dork = "abc-_~<>{}=;#!é";
        assert_eq!(escape_dork(dork), dork);
        assert_eq!(decode(dork), dork);
    }

    #[test]
    fn query_url_dork_reads_back() {
        let template = DorkTemplate::new(r#"intitle:"index of" (backup | old)"#);
        let q = encode(&template, data!(), "https://www.google.com/search?q=");
        assert_eq!(q.dork(), template.as_str());
        assert_eq!(q.template(), &template);
    }

    #[test]
    fn block_detection() {
        assert!(is_blocked(&format!("<html>\n<p>{BLOCK_PHRASE}.</p>\n</html>")));
        assert!(is_blocked("<a href=\"https://www.google.com/sorry/index?continue=x\">"));
        assert!(is_blocked("http://www.google.com/sorry/index"));
        assert!(!is_blocked("<html><body>mail.example.com</body></html>"));
        assert!(!is_blocked(""));
        assert!(!is_blocked(&BLOCK_PHRASE.to_lowercase()));
    }

    #[test]
    fn relay_decode_hello() {
        let html = decode_relay("...&lt;html&gt;hello&lt;/html&gt;...").unwrap();
        assert_eq!(html, "<html>hello</html>");
    }

    #[test]
    fn relay_decode_html_with_attributes() {
        let relayed = "<pre>&lt;html lang=&quot;en&quot;&gt;&lt;b&gt;x&lt;/b&gt;&lt;/html&gt;</pre>";
        let html = decode_relay(relayed).unwrap();
        assert_eq!(html, "<html lang=\"en\"><b>x</b></html>");
    }

    #[test]
    fn relay_decode_stray_ampersand() {
        let html = decode_relay("&lt;html&gt;a & b&lt;/html&gt;").unwrap();
        assert_eq!(html, "<html>a & b</html>");
    }

    #[test]
    fn relay_decode_failures() {
        assert!(decode_relay("").is_err());
        assert!(decode_relay("<title>Please Wait... | Cloudflare</title>").is_err());
        assert!(decode_relay(&format!("&lt;html&gt;{BLOCK_PHRASE}&lt;/html&gt;")).is_err());
        assert!(decode_relay("<html>not escaped</html>").is_err());
        assert!(decode_relay("&lt;html&gt;never closed").is_err());
    }

    #[test]
    fn generic_clean_strips_markup() {
        let cleaned = generic_clean("<b>dev</b>.example.com;https://api.example.com/x");
        assert!(cleaned.contains("dev.example.com"));
        assert!(cleaned.contains(" api.example.com "));
        assert!(!cleaned.contains('<'));
        assert!(!cleaned.contains('/'));
    }

    #[test]
    fn hostnames_dedup() {
        let corpus = "mail.example.com mail.example.com <em>mail.example.com</em>";
        let hosts = extract_hostnames(corpus, data!());
        assert_eq!(hosts, set!["mail.example.com"]);
    }

    #[test]
    fn hostnames_anchor_on_domain() {
        let corpus = "https://a.example.com/x b.example.com:443 c.other.org example.comx d-e.example.com";
        let hosts = extract_hostnames(corpus, data!());
        assert!(!hosts.is_empty());
        for host in &hosts {
            assert!(host.ends_with(data!()), "{host}");
        }
        assert!(hosts.contains("d-e.example.com"));
        assert!(!hosts.iter().any(|h| h.contains("other.org")));
    }

    #[test]
    fn hostnames_dot_is_literal() {
        let hosts = extract_hostnames("a.exampleXcom", data!());
        assert!(hosts.is_empty());
    }

    #[test]
    fn hostnames_www_stripped() {
        let corpus = "www.example.com shop.example.com";
        let hosts = extract_hostnames(corpus, "www.example.com");
        assert!(hosts.contains("shop.example.com"));
        for host in &hosts {
            assert!(host.ends_with("example.com"));
        }
    }

    #[test]
    fn emails_extracted() {
        let corpus =
            "mailto:JANE@example.com, .admin@example.com <b>ops@mail.example.com</b> x@other.org";
        let emails = extract_emails(corpus, "www.example.com");
        assert!(emails.contains("jane@example.com"));
        assert!(emails.contains("admin@example.com"));
        assert!(emails.contains("ops@mail.example.com"));
        for email in &emails {
            let at = email.find('@').unwrap();
            assert!(email[at..].ends_with("example.com"), "{email}");
            assert!(!email.starts_with('.'));
        }
    }

    #[test]
    fn filter_drops_junk() {
        let kept = filter([
            "-bad.example.com",
            "xxx.example.com",
            "a..example.com",
            "2fapi.example.com",
            "API.Example.com",
            "u003dweb.example.com",
            "",
        ]);
        assert_eq!(kept, set!["api.example.com", "web.example.com"]);
    }

    #[test]
    fn filter_idempotent() {
        let messy = [
            "a.2f.example.com",
            " 2Fa.example.com",
            "x3eX3Edev.example.com",
            "252f252fftp.example.com",
            "Mail.Example.com",
            "ok.example.com",
        ];
        let once = filter(messy);
        let twice = filter(once.clone());
        assert_eq!(once, twice);
        assert!(!once.contains("a..example.com"));
    }

    #[test]
    fn scope_hosts_drops_apex() {
        let hosts = scope_hosts(set!["example.com", "a.example.com", "b.www.example.com"], "www.example.com");
        assert_eq!(hosts, set!["a.example.com", "b.www.example.com"]);
    }

    #[test]
    fn jitter_window() {
        let jitter = Jitter::from_settings(&Settings::default());
        let mut rng = rand::thread_rng();
        let allowed = [500, 1500, 2500];
        for _ in 0..200 {
            let ms = jitter.delay(&mut rng).as_millis();
            assert!(allowed.contains(&ms), "{ms}");
        }
    }

    #[test]
    fn jitter_without_delay_is_zero() {
        let jitter = Jitter::from_settings(&Settings::default().without_delay());
        assert_eq!(jitter.delay(&mut rand::thread_rng()).as_millis(), 0);
    }

    #[test]
    fn jitter_huge_bounds_saturate() {
        let jitter = Jitter {
            min_secs: u64::MAX,
            max_secs: u64::MAX,
            offset_ms: 500,
        };
        let delay = jitter.delay(&mut rand::thread_rng());
        assert_eq!(delay, std::time::Duration::from_millis(u64::MAX - 500));
    }

    #[test]
    fn proxies_load_and_skip_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "127.0.0.1:8080").unwrap();
        writeln!(file, "ftp://10.0.0.1:21").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  socks5://10.0.0.2:9050  ").unwrap();
        writeln!(file, "https://proxy.example.com:3128").unwrap();

        let proxies = load_proxies(file.path()).unwrap();
        let loaded: Vec<&str> = proxies.iter().map(ProxyEntry::as_str).collect();
        assert_eq!(
            loaded,
            vec![
                "http://127.0.0.1:8080",
                "socks5://10.0.0.2:9050",
                "https://proxy.example.com:3128"
            ]
        );
    }

    #[test]
    fn proxies_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_proxies(dir.path().join("proxies.txt")),
            Err(crate::error::DorkError::MissingFile { .. })
        ));
    }

    #[test]
    fn proxy_setup() {
        assert_eq!(setup_proxy("127.0.0.1:8080").as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(setup_proxy("socks5://10.0.0.1:9050").as_deref(), Some("socks5://10.0.0.1:9050"));
        assert_eq!(setup_proxy(""), None);
        assert_eq!(setup_proxy("ftp://10.0.0.1:21"), None);
        assert_eq!(
            ProxyEntry::parse("  10.0.0.2:3128 ").unwrap().as_str(),
            "http://10.0.0.2:3128"
        );
    }

    #[test]
    fn user_agent_pool() {
        let pool = UserAgentPool::default();
        assert!(pool.len() > 10);
        let mut rng = rand::thread_rng();
        let ua = pool.pick(&mut rng).to_string();
        assert!(pool.contains(&ua));

        let custom = UserAgentPool::new(vec!["only-one".to_string()]);
        assert_eq!(custom.pick(&mut rng), "only-one");
        assert_eq!(UserAgentPool::new(vec![]).len(), pool.len());
    }

    #[test]
    fn templates_load_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  site: inurl:admin  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "intitle:\"index of\"").unwrap();

        let loaded = templates::load(file.path()).unwrap();
        assert_eq!(
            loaded,
            vec![
                DorkTemplate::new("site: inurl:admin"),
                DorkTemplate::new("intitle:\"index of\"")
            ]
        );
    }

    #[test]
    fn templates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            templates::load(&missing),
            Err(crate::error::DorkError::MissingFile { .. })
        ));
        assert!(templates::load_or_empty(&missing).is_empty());
    }

    #[test]
    fn settings_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 15").unwrap();
        writeln!(file, "relay_url = \"http://relay.local/\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.timeout_secs, 15);
        assert_eq!(settings.relay_url, "http://relay.local/");
        assert_eq!(settings.search_url, crate::config::GOOGLE_SEARCH_URL);
        assert_eq!(settings.delay_max_secs, 3);
    }

    #[test]
    fn settings_validation() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());
        settings.delay_min_secs = 5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn save_reports_csv() {
        let dir = tempfile::tempdir().unwrap();
        let reports = vec![DorkReport {
            domain: data!().to_string(),
            hosts: vec!["a.example.com".to_string(), "b.example.com".to_string()],
            emails: vec!["admin@example.com".to_string()],
            outcome: RunOutcome::Done,
            attempts: 2,
        }];

        let path = save_reports(dir.path(), &reports).unwrap();
        assert!(path.ends_with("dork_results/google_dork.csv"));

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Domain", "Hosts", "Emails"]);

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "example.com");
        assert_eq!(&rows[0][1], "a.example.com\nb.example.com");
        assert_eq!(&rows[0][2], "admin@example.com");
    }
}
