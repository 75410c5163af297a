//! HTML diff templates

use serde::{Deserialize, Serialize};

/// Three-part template: `start`, one `body` per changed field, `end`
///
/// `body` placeholders are `:key`, `:old` and `:new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffTemplates {
    #[serde(default = "default_start")]
    pub start: String,

    #[serde(default = "default_body")]
    pub body: String,

    #[serde(default = "default_end")]
    pub end: String,
}

fn default_start() -> String {
    "<div>".to_string()
}

fn default_body() -> String {
    concat!(
        r#"<p class="diff-string">"#,
        r#"<span class="diff-key">:key</span>:"#,
        r#"<span class="diff-old">:old</span> &rarr; "#,
        r#"<span class="diff-new">:new</span></p>"#
    )
    .to_string()
}

fn default_end() -> String {
    "</div>".to_string()
}

impl Default for DiffTemplates {
    fn default() -> Self {
        Self {
            start: default_start(),
            body: default_body(),
            end: default_end(),
        }
    }
}

impl DiffTemplates {
    /// Render one body row; substituted values are HTML-escaped
    pub fn render_row(&self, key: &str, old: &str, new: &str) -> String {
        // Single pass so a value containing ":new" is not substituted again
        let mut out = String::with_capacity(self.body.len() + old.len() + new.len());
        let mut rest = self.body.as_str();

        while let Some(pos) = rest.find(':') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            let (value, len) = if tail.starts_with(":key") {
                (Some(key), 4)
            } else if tail.starts_with(":old") {
                (Some(old), 4)
            } else if tail.starts_with(":new") {
                (Some(new), 4)
            } else {
                (None, 1)
            };
            match value {
                Some(value) => out.push_str(&escape_html(value)),
                None => out.push(':'),
            }
            rest = &tail[len..];
        }
        out.push_str(rest);
        out
    }

    /// `start`, the rows, `end`
    pub fn render<'a, I>(&self, rows: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut out = self.start.clone();
        for (key, old, new) in rows {
            out.push_str(&self.render_row(key, old, new));
        }
        out.push_str(&self.end);
        out
    }
}

/// Escape the five HTML-significant characters
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_row() {
        let row = DiffTemplates::default().render_row("title", "Old", "New");
        assert_eq!(
            row,
            r#"<p class="diff-string"><span class="diff-key">title</span>:<span class="diff-old">Old</span> &rarr; <span class="diff-new">New</span></p>"#
        );
    }

    #[test]
    fn test_render_wraps_rows() {
        let templates = DiffTemplates {
            start: "[".into(),
            body: "(:key=:old>:new)".into(),
            end: "]".into(),
        };
        let html = templates.render([("a", "1", "2"), ("b", "", "x")]);
        assert_eq!(html, "[(a=1>2)(b=>x)]");
        assert_eq!(templates.render([]), "[]");
    }

    #[test]
    fn test_values_are_escaped_and_not_resubstituted() {
        let templates = DiffTemplates {
            start: String::new(),
            body: ":old|:new".into(),
            end: String::new(),
        };
        assert_eq!(
            templates.render_row("k", "<b>:new</b>", "a & 'b'"),
            "&lt;b&gt;:new&lt;/b&gt;|a &amp; &#039;b&#039;"
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let templates: DiffTemplates = serde_json::from_str(r#"{"start": "<ul>"}"#).unwrap();
        assert_eq!(templates.start, "<ul>");
        assert_eq!(templates.end, "</div>");
    }
}
