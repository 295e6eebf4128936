// src/ingest/providers/dou.rs
use super::{AttrMatch, ElementRule, ListingSite};

pub const NAME: &str = "dou";
pub const LISTING_URL: &str = "https://jobs.dou.ua/vacancies/";
pub const DEFAULT_CATEGORY: &str = "Front End";

/// jobs.dou.ua vacancy list for one category. Posting links are absolute.
pub fn site(category: &str) -> ListingSite {
    ListingSite {
        name: NAME,
        url: LISTING_URL.to_string(),
        query: vec![("category", category.to_string())],
        cache_buster: None,
        headers: vec![],
        base_url: None,
        container: ElementRule::new("li", AttrMatch::Class("l-vacancy")),
        title_link: ElementRule::new("a", AttrMatch::Class("vt")),
        organization: ElementRule::new("a", AttrMatch::Class("company")),
    }
}
