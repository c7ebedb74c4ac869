use regex::Regex;

/// Normalizes raw document text before analysis and chunking: collapse
/// whitespace runs, strip characters outside the allow-list, trim.
pub struct TextCleaner {
    disallowed: Regex,
    whitespace: Regex,
}

impl TextCleaner {
    pub fn new() -> Self {
        Self {
            // Word characters, whitespace, and basic punctuation survive.
            disallowed: Regex::new(r#"[^\w\s.,;:!?'"()-]"#).unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    pub fn clean(&self, raw: &str) -> String {
        let stripped = self.disallowed.replace_all(raw, "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}
