// src/ingest/providers/mod.rs
//! Listing-page extraction shared by every job board.
//!
//! Each board is a [`ListingSite`] value: where to fetch, which headers to
//! send, and the structural predicates that locate a posting in the markup.
//! [`HtmlListingSource`] turns a site into a [`Source`].

pub mod djinni;
pub mod dou;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{Client, Url};
use scraper::{ElementRef, Html};

use crate::error::SourceError;
use crate::ingest::normalize_text;
use crate::ingest::types::{JobRecord, Source};

/// Attribute test applied to an element whose tag already matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch {
    /// `class` attribute contains this exact class token.
    Class(&'static str),
    /// `id` attribute starts with this prefix.
    IdPrefix(&'static str),
    /// `href` attribute contains this substring.
    HrefContains(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRule {
    pub tag: &'static str,
    pub attr: AttrMatch,
}

impl ElementRule {
    pub const fn new(tag: &'static str, attr: AttrMatch) -> Self {
        Self { tag, attr }
    }

    pub fn matches(&self, el: &ElementRef<'_>) -> bool {
        let v = el.value();
        if !v.name().eq_ignore_ascii_case(self.tag) {
            return false;
        }
        match self.attr {
            AttrMatch::Class(class) => v.classes().any(|c| c == class),
            AttrMatch::IdPrefix(prefix) => v.id().is_some_and(|id| id.starts_with(prefix)),
            AttrMatch::HrefContains(needle) => v.attr("href").is_some_and(|h| h.contains(needle)),
        }
    }
}

/// Fetch parameters and markup predicates for one job board.
#[derive(Debug, Clone)]
pub struct ListingSite {
    pub name: &'static str,
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    /// Query key that receives the current unix time on every fetch.
    pub cache_buster: Option<&'static str>,
    pub headers: Vec<(&'static str, &'static str)>,
    /// Relative posting links are resolved against this URL.
    pub base_url: Option<&'static str>,
    pub container: ElementRule,
    pub title_link: ElementRule,
    pub organization: ElementRule,
}

impl ListingSite {
    /// Points the site at a different listing URL (local mirrors, tests).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Every built-in board, in the order they are merged.
pub fn builtin_sites(dou_category: &str) -> Vec<ListingSite> {
    vec![dou::site(dou_category), djinni::site()]
}

/// Walks the document depth-first and yields one record per matched
/// container whose title link, link target and organization are all present.
/// Containers missing any of them are skipped.
pub fn extract_records(site: &ListingSite, html: &str) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    let base = site.base_url.and_then(|b| Url::parse(b).ok());

    let mut out = Vec::new();
    for node in document.root_element().descendants() {
        let Some(container) = ElementRef::wrap(node) else {
            continue;
        };
        if !site.container.matches(&container) {
            continue;
        }

        let mut link: Option<(String, String)> = None;
        let mut organization = String::new();
        for inner in container.descendants().filter_map(ElementRef::wrap) {
            if site.title_link.matches(&inner) {
                let href = inner.value().attr("href").unwrap_or_default().trim();
                link = Some((href.to_string(), element_text(&inner)));
            }
            if site.organization.matches(&inner) {
                organization = element_text(&inner);
            }
        }

        let Some((href, title)) = link else {
            continue;
        };
        let Some(identifier) = resolve_link(base.as_ref(), &href) else {
            continue;
        };
        if let Some(job) = JobRecord::new(identifier, title, &organization) {
            out.push(job);
        }
    }
    out
}

fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Some(href.to_string()),
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<String>())
}

/// Fetches a [`ListingSite`] over HTTP and extracts its postings.
pub struct HtmlListingSource {
    site: ListingSite,
    client: Client,
}

impl HtmlListingSource {
    pub fn new(site: ListingSite, client: Client) -> Self {
        Self { site, client }
    }

    async fn fetch_page(&self) -> Result<String, SourceError> {
        let name = self.site.name;
        let mut req = self.client.get(&self.site.url).query(&self.site.query);
        if let Some(key) = self.site.cache_buster {
            let now = chrono::Utc::now().timestamp().to_string();
            req = req.query(&[(key, now)]);
        }
        for (header, value) in &self.site.headers {
            req = req.header(*header, *value);
        }

        let resp = req.send().await.map_err(|e| SourceError::Fetch {
            name,
            cause: e.to_string(),
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                name,
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|e| SourceError::Parse {
            name,
            cause: e.to_string(),
        })
    }
}

#[async_trait]
impl Source for HtmlListingSource {
    async fn fetch_records(&self) -> Result<Vec<JobRecord>, SourceError> {
        let body = self.fetch_page().await?;

        let t0 = std::time::Instant::now();
        let out = extract_records(&self.site, &body);
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("scrape_parse_ms").record(ms);

        if out.is_empty() {
            tracing::debug!(source = self.site.name, "listing page yielded no postings");
        }
        counter!("scrape_records_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        self.site.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_site() -> ListingSite {
        ListingSite {
            name: "toy",
            url: "http://localhost/".into(),
            query: vec![],
            cache_buster: None,
            headers: vec![],
            base_url: Some("https://toy.example"),
            container: ElementRule::new("div", AttrMatch::IdPrefix("post-")),
            title_link: ElementRule::new("a", AttrMatch::Class("title")),
            organization: ElementRule::new("span", AttrMatch::Class("org")),
        }
    }

    #[test]
    fn skips_partial_containers() {
        let html = r#"
            <div id="post-1"><a class="title" href="/p/1">Rust Dev</a><span class="org">Acme</span></div>
            <div id="post-2"><a class="title" href="/p/2">No org</a></div>
            <div id="post-3"><a class="title">No href</a><span class="org">Acme</span></div>
            <div id="post-4"><a class="title" href="/p/4">  </a><span class="org">Acme</span></div>
            <div id="ad"><a class="title" href="/p/5">Promo</a><span class="org">Ads</span></div>
        "#;
        let jobs = extract_records(&toy_site(), html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].identifier, "https://toy.example/p/1");
        assert_eq!(jobs[0].title, "Rust Dev");
        assert_eq!(jobs[0].organization, "Acme");
    }

    #[test]
    fn class_match_is_token_based() {
        let rule = ElementRule::new("a", AttrMatch::Class("vt"));
        let html = Html::parse_fragment(r#"<a class="vt hot">x</a><a class="vtx">y</a>"#);
        let hits = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| rule.matches(el))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn nested_text_is_collapsed() {
        let html = r#"<div id="post-9">
            <a class="title" href="https://elsewhere.example/j/9">
                Senior <b>Rust</b>
                Engineer
            </a>
            <span class="org"> Foo &amp; Bar </span>
        </div>"#;
        let jobs = extract_records(&toy_site(), html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Senior Rust Engineer");
        assert_eq!(jobs[0].organization, "Foo & Bar");
        // absolute links are kept as-is
        assert_eq!(jobs[0].identifier, "https://elsewhere.example/j/9");
    }

    #[test]
    fn garbage_input_yields_nothing() {
        assert!(extract_records(&toy_site(), "").is_empty());
        assert!(extract_records(&toy_site(), "<<<not html>>> \u{0}").is_empty());
    }
}
