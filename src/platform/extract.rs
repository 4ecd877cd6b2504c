//! Tolerant selector helpers shared by the platform parsers.
//!
//! Every lookup degrades to "nothing found" instead of failing: an invalid
//! selector or missing element yields an empty string or empty list.

use scraper::{ElementRef, Html, Selector};

pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const REVIEW_MAX_CHARS: usize = 200;
pub const PRICING_MAX_CHARS: usize = 200;
pub const FIELD_SEPARATOR: &str = "; ";

/// A parsed page plus the lookups platforms need
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Every element matching `selector`, in document order
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn select_one(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.html.select(&selector).next()
    }

    /// Document `<title>` text
    pub fn title(&self) -> String {
        self.select_one("title").map(element_text).unwrap_or_default()
    }

    /// Text of the first element matched by the first selector that matches anything
    pub fn first_text(&self, selectors: &[&str]) -> String {
        selectors
            .iter()
            .find_map(|s| self.select_one(s))
            .map(element_text)
            .unwrap_or_default()
    }

    /// Texts of all elements matched by the first selector that matches anything
    pub fn first_list(&self, selectors: &[&str]) -> Vec<String> {
        for selector in selectors {
            let found = self.select_all(selector);
            if !found.is_empty() {
                return found.into_iter().map(element_text).collect();
            }
        }
        Vec::new()
    }

    /// First non-empty selector list, else paragraphs mentioning `keywords`; joined
    pub fn list_or_paragraphs(&self, selectors: &[&str], keywords: &[&str], limit: usize) -> String {
        let mut items = self.first_list(selectors);
        if items.is_empty() {
            items = self.paragraphs_mentioning(keywords);
        }
        join_limited(&items, limit)
    }

    /// Up to `limit` review snippets, each cut to [`REVIEW_MAX_CHARS`]
    pub fn reviews(&self, selectors: &[&str], limit: usize) -> String {
        let reviews: Vec<String> = self
            .first_list(selectors)
            .iter()
            .take(limit)
            .map(|review| truncate_chars(review, REVIEW_MAX_CHARS))
            .collect();
        reviews.join(FIELD_SEPARATOR)
    }

    /// Paragraph texts mentioning any of `keywords` (case-insensitive)
    pub fn paragraphs_mentioning(&self, keywords: &[&str]) -> Vec<String> {
        self.select_all("p")
            .into_iter()
            .map(element_text)
            .filter(|text| contains_any(&text.to_lowercase(), keywords))
            .collect()
    }
}

/// Whitespace-collapsed text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Texts of descendants of `element` matching `selector`
pub fn select_texts_in(element: ElementRef<'_>, selector: &str) -> Vec<String> {
    match Selector::parse(selector) {
        Ok(selector) => element.select(&selector).map(element_text).collect(),
        Err(_) => Vec::new(),
    }
}

/// Attribute of the first descendant of `element` matching `selector`
pub fn select_first_attr_in(element: ElementRef<'_>, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    element
        .select(&selector)
        .next()
        .and_then(|found| found.value().attr(attr))
        .map(str::to_string)
}

/// `content` attribute when present (meta tags), text content otherwise
pub fn content_or_text(element: ElementRef<'_>) -> String {
    match element.value().attr("content") {
        Some(content) => collapse_whitespace(content),
        None => element_text(element),
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Join the first `limit` non-empty entries
pub fn join_limited(items: &[String], limit: usize) -> String {
    items
        .iter()
        .filter(|s| !s.is_empty())
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>  Demo
        Page </title><meta name="description" content="  A   described page "></head>
        <body>
          <ul class="features"><li>One</li><li> Two  items </li></ul>
          <p>This has a benefit.</p>
          <p>Nothing here.</p>
        </body></html>"#;

    #[test]
    fn test_title_and_whitespace() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.title(), "Demo Page");
    }

    #[test]
    fn test_first_text_skips_missing_selectors() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.first_text(&[".absent", ".features li"]), "One");
        assert_eq!(doc.first_text(&[".absent"]), "");
    }

    #[test]
    fn test_invalid_selector_is_empty() {
        let doc = Document::parse(PAGE);
        assert!(doc.select_all("li[[").is_empty());
        assert_eq!(doc.first_text(&["li[[", "title"]), "Demo Page");
    }

    #[test]
    fn test_first_list_and_paragraphs() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.first_list(&[".pros li", ".features li"]), vec!["One", "Two items"]);
        assert_eq!(doc.paragraphs_mentioning(&["benefit"]), vec!["This has a benefit."]);
    }

    #[test]
    fn test_content_attribute_preferred() {
        let doc = Document::parse(PAGE);
        let meta = doc.select_one(r#"meta[name="description"]"#).unwrap();
        assert_eq!(content_or_text(meta), "A described page");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("€€€", 1), "€");
    }

    #[test]
    fn test_join_limited() {
        let items = vec!["a".to_string(), "".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(join_limited(&items, 2), "a; b");
        assert_eq!(join_limited(&[], 3), "");
    }
}
