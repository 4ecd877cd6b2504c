use url::Url;

use crate::app::Result;
use crate::domain::{Record, RecordBuilder};
use crate::platform::extract::{
    contains_any, content_or_text, join_limited, select_texts_in, truncate_chars, Document,
    DESCRIPTION_MAX_CHARS,
};
use crate::platform::{reject_challenge_page, resolve_link, Platform};

const SOURCE_SITE: &str = "Agent.ai";
const BASE_URL: &str = "https://agent.ai";
const LISTING_PATHS: [&str; 4] = ["/agents", "/marketplace", "/browse", "/"];

const LINK_KEYWORDS: [&str; 3] = ["agent", "bot", "ai"];
const LINK_EXCLUDES: [&str; 4] = ["linkedin", "login", "signup", "community"];

const NAME_SELECTORS: [&str; 5] = ["h1", ".agent-name", ".title", "h2", "title"];
/// Names that are really script or error placeholders
const BAD_NAME_MARKERS: [&str; 3] = ["javascript", "error", "moment"];
const FALLBACK_NAME: &str = "Unknown Agent";

const DESCRIPTION_SELECTORS: [&str; 4] = [
    r#"meta[name="description"]"#,
    ".agent-description",
    ".summary",
    "p",
];
const DESCRIPTION_MIN_CHARS: usize = 30;
const BAD_DESCRIPTION_MARKERS: [&str; 2] = ["javascript", "error"];

const DETAIL_SELECTORS: [&str; 3] = [".features li", ".capabilities li", ".agent-details li"];
const MAIN_CONTENT_SELECTOR: &str = "main, .content, .main-content, article";
const PRICING_MARKERS: [&str; 1] = ["credit"];
const RATING_MARKERS: [&str; 3] = ["review", "rating", "("];

const PROS_SELECTORS: [&str; 3] = [".pros li", ".advantages li", ".benefits li"];
const PROS_KEYWORDS: [&str; 3] = ["benefit", "advantage", "strength"];
const CONS_SELECTORS: [&str; 3] = [".cons li", ".limitations li", ".disadvantages li"];
const CONS_KEYWORDS: [&str; 3] = ["limitation", "drawback", "challenge"];
const REVIEW_SELECTORS: [&str; 4] = [".review", ".testimonial", ".user-review", ".comment"];
const CATEGORY_SELECTORS: [&str; 3] = [".category", ".tag", ".type"];

/// Agent.ai marketplace: a directory of AI agents
pub struct AgentAi {
    base_url: Url,
}

impl AgentAi {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    fn name(doc: &Document, url: &str) -> String {
        let name = doc.first_text(&NAME_SELECTORS);
        if !name.is_empty() && !contains_any(&name.to_lowercase(), &BAD_NAME_MARKERS) {
            return name;
        }

        Url::parse(url)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
            })
            .filter(|segment| !segment.is_empty())
            .unwrap_or_else(|| FALLBACK_NAME.to_string())
    }

    fn description(doc: &Document) -> String {
        for selector in DESCRIPTION_SELECTORS {
            let Some(element) = doc.select_one(selector) else {
                continue;
            };
            let text = content_or_text(element);
            if text.chars().count() > DESCRIPTION_MIN_CHARS
                && !contains_any(&text.to_lowercase(), &BAD_DESCRIPTION_MARKERS)
            {
                return truncate_chars(&text, DESCRIPTION_MAX_CHARS);
            }
        }
        String::new()
    }

    /// Detail list items, sorted into features, pricing and rating
    fn details(doc: &Document, record: &mut RecordBuilder) {
        let mut items = doc.first_list(&DETAIL_SELECTORS);
        if items.is_empty() {
            if let Some(main) = doc.select_one(MAIN_CONTENT_SELECTOR) {
                items = select_texts_in(main, "ul li, ol li");
            }
        }

        let mut features = Vec::new();
        let mut pricing = Vec::new();
        let mut rating = Vec::new();
        for item in items {
            let lower = item.to_lowercase();
            if contains_any(&lower, &PRICING_MARKERS) {
                pricing.push(item);
            } else if contains_any(&lower, &RATING_MARKERS) {
                rating.push(item);
            } else {
                features.push(item);
            }
        }

        record.features = join_limited(&features, 5);
        record.pricing = join_limited(&pricing, 3);
        record.rating = join_limited(&rating, 3);
    }
}

impl Default for AgentAi {
    fn default() -> Self {
        Self::new(Url::parse(BASE_URL).expect("static base URL"))
    }
}

impl Platform for AgentAi {
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
            .select_all("a[href]")
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| {
                let lower = href.to_lowercase();
                contains_any(&lower, &LINK_KEYWORDS) && !contains_any(&lower, &LINK_EXCLUDES)
            })
            .filter_map(|href| resolve_link(page_url, href))
            .collect()
    }

    fn parse_page(&self, url: &str, html: &str) -> Result<Record> {
        let doc = Document::parse(html);
        reject_challenge_page(url, &doc)?;

        let mut record = Record::builder(SOURCE_SITE, url).name(Self::name(&doc, url));
        record.brief_description = Self::description(&doc);
        Self::details(&doc, &mut record);
        record.pros = doc.list_or_paragraphs(&PROS_SELECTORS, &PROS_KEYWORDS, 3);
        record.cons = doc.list_or_paragraphs(&CONS_SELECTORS, &CONS_KEYWORDS, 3);
        record.user_reviews = doc.reviews(&REVIEW_SELECTORS, 3);
        record.category = doc.first_text(&CATEGORY_SELECTORS);

        record.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ScoutError;

    const LISTING: &str = r#"<html><body>
        <a href="/agent/writer-bot">Writer</a>
        <a href="https://agent.ai/agent/researcher#top">Researcher</a>
        <a href="/login?next=/agents">Log in</a>
        <a href="https://www.linkedin.com/company/agent-ai">LinkedIn</a>
        <a href="/community/agents">Community</a>
        <a href="/pricing">Pricing</a>
        <a href="/agent/writer-bot">Writer again</a>
    </body></html>"#;

    const AGENT_PAGE: &str = r#"<html><head>
        <title>Writer Bot | Agent.ai</title>
        <meta name="description" content="Writer Bot drafts long-form marketing copy from a short brief in seconds.">
    </head><body>
        <h1> Writer   Bot </h1>
        <span class="category">Marketing</span>
        <ul class="features">
            <li>Drafts blog posts</li>
            <li>Costs 5 credits per run</li>
            <li>4.8 (120 reviews)</li>
            <li>Rewrites headlines</li>
        </ul>
        <ul class="pros"><li>Fast</li><li>Cheap</li></ul>
        <p>One limitation is that it only writes English.</p>
        <div class="review">Saved me hours every week.</div>
        <div class="review">Great tone control.</div>
    </body></html>"#;

    fn platform() -> AgentAi {
        AgentAi::default()
    }

    #[test]
    fn test_extract_item_links_filters_and_resolves() {
        let page = Url::parse("https://agent.ai/agents").unwrap();
        let links = platform().extract_item_links(&page, LISTING);

        assert_eq!(
            links,
            vec![
                "https://agent.ai/agent/writer-bot",
                "https://agent.ai/agent/researcher",
                "https://agent.ai/agent/writer-bot",
            ]
        );
    }

    #[test]
    fn test_parse_full_page() {
        let url = "https://agent.ai/agent/writer-bot";
        let record = platform().parse_page(url, AGENT_PAGE).unwrap();

        assert_eq!(record.name(), "Writer Bot");
        assert_eq!(record.url(), url);
        assert_eq!(record.source_site(), "Agent.ai");
        assert!(record.brief_description().starts_with("Writer Bot drafts"));
        assert_eq!(record.features(), "Drafts blog posts; Rewrites headlines");
        assert_eq!(record.pricing(), "Costs 5 credits per run");
        assert_eq!(record.rating(), "4.8 (120 reviews)");
        assert_eq!(record.pros(), "Fast; Cheap");
        assert_eq!(record.cons(), "One limitation is that it only writes English.");
        assert_eq!(
            record.user_reviews(),
            "Saved me hours every week.; Great tone control."
        );
        assert_eq!(record.category(), "Marketing");
    }

    #[test]
    fn test_sparse_page_yields_empty_fields() {
        let url = "https://agent.ai/agent/minimal";
        let record = platform()
            .parse_page(url, "<html><body><h1>Minimal</h1></body></html>")
            .unwrap();

        assert_eq!(record.name(), "Minimal");
        for value in &record.values()[2..10] {
            assert_eq!(*value, "");
        }
    }

    #[test]
    fn test_placeholder_name_falls_back_to_url_slug() {
        let html = "<html><body><h1>Please enable JavaScript</h1></body></html>";
        let record = platform()
            .parse_page("https://agent.ai/agent/summarizer", html)
            .unwrap();
        assert_eq!(record.name(), "summarizer");

        let record = platform()
            .parse_page("https://agent.ai/", "<html><body></body></html>")
            .unwrap();
        assert_eq!(record.name(), "Unknown Agent");
    }

    #[test]
    fn test_short_or_broken_descriptions_skipped() {
        let html = r#"<html><head><meta name="description" content="Too short"></head><body>
            <h1>Agent</h1>
            <div class="summary">An error occurred while loading this agent description text.</div>
            <p>This paragraph is long enough to serve as a usable description.</p>
        </body></html>"#;
        let record = platform()
            .parse_page("https://agent.ai/agent/a", html)
            .unwrap();
        assert_eq!(
            record.brief_description(),
            "This paragraph is long enough to serve as a usable description."
        );
    }

    #[test]
    fn test_main_content_lists_used_when_no_feature_list() {
        let html = r#"<html><body><h1>Agent</h1>
            <ul><li>Outside main</li></ul>
            <main><ul><li>Summarizes PDFs</li><li>100 credits</li></ul></main>
        </body></html>"#;
        let record = platform()
            .parse_page("https://agent.ai/agent/a", html)
            .unwrap();
        assert_eq!(record.features(), "Summarizes PDFs");
        assert_eq!(record.pricing(), "100 credits");
    }

    #[test]
    fn test_long_description_truncated() {
        let long = "word ".repeat(200);
        let html = format!(
            r#"<html><head><meta name="description" content="{long}"></head><body><h1>A</h1></body></html>"#
        );
        let record = platform()
            .parse_page("https://agent.ai/agent/a", &html)
            .unwrap();
        assert_eq!(record.brief_description().chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn test_challenge_page_is_parse_failure() {
        let html = "<html><head><title>Just a moment...</title></head><body></body></html>";
        let err = platform()
            .parse_page("https://agent.ai/agent/a", html)
            .unwrap_err();
        assert!(matches!(err, ScoutError::Parse { .. }));
    }
}
