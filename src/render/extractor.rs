use crate::render::RenderConfig;

/// Builds the script that snapshots the rendered document
pub struct MarkupExtractor {
    remove_selectors: Vec<String>,
}

impl MarkupExtractor {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            remove_selectors: config.remove_selectors.clone(),
        }
    }

    /// Generate JavaScript returning the page markup
    ///
    /// Runs in the browser context: strips the configured elements, then
    /// returns `{ html, title }` for the whole document.
    pub fn snapshot_script(&self) -> String {
        let remove_selectors = self
            .remove_selectors
            .iter()
            .map(|s| format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"
            (() => {{
                const removeSelectors = [{remove_selectors}];
                for (const selector of removeSelectors) {{
                    try {{
                        document.querySelectorAll(selector).forEach(el => el.remove());
                    }} catch (_) {{}}
                }}

                const root = document.documentElement;
                return {{
                    html: root ? root.outerHTML : '',
                    title: document.title || ''
                }};
            }})()
            "#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_script_lists_selectors() {
        let extractor = MarkupExtractor::new(&RenderConfig::default());
        let script = extractor.snapshot_script();

        assert!(script.contains("removeSelectors"));
        assert!(script.contains("'script'"));
        assert!(script.contains("outerHTML"));
    }

    #[test]
    fn test_snapshot_script_escapes_quotes() {
        let config = RenderConfig {
            remove_selectors: vec!["a[title='x']".to_string()],
            ..Default::default()
        };
        let script = MarkupExtractor::new(&config).snapshot_script();
        assert!(script.contains(r"'a[title=\'x\']'"));
    }
}
