// src/ingest/providers/djinni.rs
use super::{AttrMatch, ElementRule, ListingSite};

pub const NAME: &str = "djinni";
pub const LISTING_URL: &str = "https://djinni.co/jobs/";
pub const BASE_URL: &str = "https://djinni.co";

pub const KEYWORDS: [&str; 6] = [
    "JavaScript",
    "Angular",
    "React.js",
    "Svelte",
    "Vue.js",
    "Markup",
];

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// djinni.co job search. Without browser-like headers and a cache-busting
/// param the site serves an old copy of the list.
pub fn site() -> ListingSite {
    ListingSite {
        name: NAME,
        url: LISTING_URL.to_string(),
        query: KEYWORDS
            .iter()
            .map(|k| ("primary_keyword", k.to_string()))
            .collect(),
        cache_buster: Some("_"),
        headers: vec![
            ("User-Agent", USER_AGENT),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("Accept-Language", "uk-UA,uk;q=0.9,en-US;q=0.8,en;q=0.7"),
            ("Cache-Control", "no-cache"),
            ("Pragma", "no-cache"),
            ("Referer", LISTING_URL),
        ],
        base_url: Some(BASE_URL),
        container: ElementRule::new("li", AttrMatch::IdPrefix("job-item")),
        title_link: ElementRule::new("a", AttrMatch::Class("job-item__title-link")),
        organization: ElementRule::new("a", AttrMatch::HrefContains("company-")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::providers::extract_records;

    #[test]
    fn resolves_relative_links_against_base() {
        let html = r#"
        <ul class="list-unstyled">
          <li id="job-item-700001" class="mb-4">
            <div class="d-flex">
              <a class="mr-2" href="/jobs/?company-umbrella=1">Umbrella Corp</a>
            </div>
            <h2><a class="job-item__title-link" href="/jobs/700001-react-developer/">React Developer</a></h2>
          </li>
          <li id="job-item-700002">
            <h2><a class="job-item__title-link" href="/jobs/700002-no-company/">No company</a></h2>
          </li>
          <li id="subscribe-form"><a class="job-item__title-link" href="/x">x</a><a href="/company-x">X</a></li>
        </ul>"#;

        let jobs = extract_records(&site(), html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(
            jobs[0].identifier,
            "https://djinni.co/jobs/700001-react-developer/"
        );
        assert_eq!(jobs[0].title, "React Developer");
        assert_eq!(jobs[0].organization, "Umbrella Corp");
    }

    #[test]
    fn sends_browser_headers_and_all_keywords() {
        let s = site();
        assert_eq!(s.query.len(), KEYWORDS.len());
        assert!(s.headers.iter().any(|(k, v)| *k == "Referer" && *v == LISTING_URL));
        assert!(s
            .headers
            .iter()
            .any(|(k, v)| *k == "User-Agent" && v.starts_with("Mozilla/5.0")));
        assert_eq!(s.cache_buster, Some("_"));
    }
}
