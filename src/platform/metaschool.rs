use url::Url;

use crate::app::Result;
use crate::domain::Record;
use crate::platform::extract::{
    contains_any, content_or_text, join_limited, select_first_attr_in, truncate_chars, Document,
    DESCRIPTION_MAX_CHARS, PRICING_MAX_CHARS,
};
use crate::platform::{reject_challenge_page, resolve_link, Platform};

const SOURCE_SITE: &str = "Metaschool";
const BASE_URL: &str = "https://metaschool.so";
const LISTING_PATHS: [&str; 4] = ["/courses", "/projects", "/agents", "/"];

const CARD_SELECTOR: &str =
    r#".card, .course-card, .project-card, a[href*="course"], a[href*="project"]"#;
/// Filtered catalog views rather than course pages
const EXCLUDED_LINK_MARKER: &str = "blockchain=";

const NAME_SELECTOR: &str = "h1, .title, .course-title, h2";
const DESCRIPTION_SELECTOR: &str =
    r#".description, .course-description, .overview, meta[name="description"], p"#;
const DESCRIPTION_MIN_CHARS: usize = 30;

const OUTCOME_SELECTORS: [&str; 3] = [".outcomes li", ".features li", ".what-you-learn li"];
const RATING_MARKERS: [&str; 2] = ["review", "("];
const FEATURE_MARKERS: [&str; 3] = ["learn", "build", "master"];

const PROS_SELECTORS: [&str; 3] = [".pros li", ".benefits li", ".why-take-this-course li"];
const PROS_KEYWORDS: [&str; 4] = ["benefit", "advantage", "learn", "skill"];
const CONS_SELECTORS: [&str; 3] = [".cons li", ".requirements li", ".prerequisites li"];
const CONS_KEYWORDS: [&str; 3] = ["require", "prerequisite", "need"];
const REVIEW_SELECTORS: [&str; 4] = [".review", ".testimonial", ".user-review", ".comment"];

const PRICE_SELECTORS: [&str; 4] = [".price", ".pricing", ".cost", ".enroll"];
const PRICE_KEYWORDS: [&str; 4] = ["free", "$", "€", "paid"];
/// Courses without any price markup are free
const DEFAULT_PRICING: &str = "Free";

const CATEGORY_SELECTOR: &str = ".category, .difficulty, .level, .tag";

/// Metaschool: a catalog of web3 and AI courses and projects
pub struct Metaschool {
    base_url: Url,
}

impl Metaschool {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    fn description(doc: &Document) -> String {
        let text = doc
            .select_one(DESCRIPTION_SELECTOR)
            .map(content_or_text)
            .unwrap_or_default();
        if text.chars().count() > DESCRIPTION_MIN_CHARS {
            truncate_chars(&text, DESCRIPTION_MAX_CHARS)
        } else {
            String::new()
        }
    }

    /// Outcome list items split into features and rating; other items dropped
    fn outcomes(doc: &Document) -> (String, String) {
        let mut features = Vec::new();
        let mut rating = Vec::new();
        for item in doc.first_list(&OUTCOME_SELECTORS) {
            let lower = item.to_lowercase();
            if contains_any(&lower, &RATING_MARKERS) {
                rating.push(item);
            } else if contains_any(&lower, &FEATURE_MARKERS) {
                features.push(item);
            }
        }
        (join_limited(&features, 5), join_limited(&rating, 3))
    }

    fn pricing(doc: &Document) -> String {
        let price = doc.first_text(&PRICE_SELECTORS);
        if !price.is_empty() {
            return price;
        }

        doc.paragraphs_mentioning(&PRICE_KEYWORDS)
            .first()
            .map(|text| truncate_chars(text, PRICING_MAX_CHARS))
            .unwrap_or_else(|| DEFAULT_PRICING.to_string())
    }
}

impl Default for Metaschool {
    fn default() -> Self {
        Self::new(Url::parse(BASE_URL).expect("static base URL"))
    }
}

impl Platform for Metaschool {
    fn source_site(&self) -> &str {
        SOURCE_SITE
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn uses_rendering(&self) -> bool {
        true
    }

    fn listing_paths(&self) -> &[&str] {
        &LISTING_PATHS
    }

    fn extract_item_links(&self, page_url: &Url, html: &str) -> Vec<String> {
        Document::parse(html)
            .select_all(CARD_SELECTOR)
            .into_iter()
            .filter_map(|card| {
                if card.value().name() == "a" {
                    card.value().attr("href").map(str::to_string)
                } else {
                    select_first_attr_in(card, "a[href]", "href")
                }
            })
            .filter_map(|href| resolve_link(page_url, &href))
            .filter(|url| !url.contains(EXCLUDED_LINK_MARKER))
            .collect()
    }

    fn parse_page(&self, url: &str, html: &str) -> Result<Record> {
        let doc = Document::parse(html);
        reject_challenge_page(url, &doc)?;

        let mut record = Record::builder(SOURCE_SITE, url).name(doc.first_text(&[NAME_SELECTOR]));
        record.brief_description = Self::description(&doc);
        (record.features, record.rating) = Self::outcomes(&doc);
        record.pros = doc.list_or_paragraphs(&PROS_SELECTORS, &PROS_KEYWORDS, 3);
        record.cons = doc.list_or_paragraphs(&CONS_SELECTORS, &CONS_KEYWORDS, 3);
        record.user_reviews = doc.reviews(&REVIEW_SELECTORS, 3);
        record.pricing = Self::pricing(&doc);
        record.category = doc.first_text(&[CATEGORY_SELECTOR]);

        record.build()
    }
}
