use deepmarket_core::citation::MAX_BARE_URLS;
use deepmarket_core::{extract_citations, Citation};

#[test]
fn test_one_citation_per_numbered_match() {
    let text = "\
Market size hit $4B [1] https://stats.example/size in 2023.
Leaders include Acme [3] https://news.example/acme and Beta [12] http://beta.example/about.
";
    let cites = extract_citations(text);
    assert_eq!(
        cites,
        vec![
            Citation::new("1", "https://stats.example/size"),
            Citation::new("3", "https://news.example/acme"),
            Citation::new("12", "http://beta.example/about."),
        ]
    );
}

#[test]
fn test_numbered_ids_are_not_renumbered_or_deduplicated() {
    let text = "[7] https://x.example [7] https://x.example [2] https://y.example";
    let ids: Vec<_> = extract_citations(text).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["7", "7", "2"]);
}

#[test]
fn test_numbered_strategy_suppresses_bare_urls() {
    let text = "See https://bare.example first, then [4] https://numbered.example";
    assert_eq!(
        extract_citations(text),
        vec![Citation::new("4", "https://numbered.example")]
    );
}

#[test]
fn test_bare_urls_get_sequential_ids() {
    let text = "Sources: https://a.example, https://b.example/path and http://c.example";
    let cites = extract_citations(text);
    assert_eq!(
        cites,
        vec![
            Citation::new("1", "https://a.example,"),
            Citation::new("2", "https://b.example/path"),
            Citation::new("3", "http://c.example"),
        ]
    );
}

#[test]
fn test_bare_urls_capped_at_ten() {
    let text: String = (1..=15)
        .map(|i| format!("https://site{i}.example "))
        .collect();
    let cites = extract_citations(&text);
    assert_eq!(cites.len(), MAX_BARE_URLS);
    assert_eq!(cites[0], Citation::new("1", "https://site1.example"));
    assert_eq!(cites[9], Citation::new("10", "https://site10.example"));
}

#[test]
fn test_no_urls_yields_empty() {
    assert!(extract_citations("No sources, just prose [1] and [2].").is_empty());
}

#[test]
fn test_non_http_schemes_ignored() {
    assert!(extract_citations("ftp://files.example and mailto:me@example.com").is_empty());
}
