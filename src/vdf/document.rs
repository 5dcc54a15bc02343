use crate::error::{InstallerError, Result};
use crate::vdf::scan::{self, BlockSpan, Entry};
use std::ops::Range;

/// A VDF document held as text and edited in place.
///
/// Every edit touches only the bytes of the block it targets; comments, ordering and
/// whitespace elsewhere are left as they were. Spans returned by one call are only
/// valid until the next mutating call, which returns the updated span it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Wrap document text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Current text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take the current text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// First block named `name` in document order, at any depth (case-insensitive).
    pub fn find_section(&self, name: &str) -> Result<Option<BlockSpan>> {
        self.search(0..self.text.len(), name)
    }

    /// Direct child block of `parent` named `name` (case-insensitive, token-exact).
    pub fn find_child(&self, parent: BlockSpan, name: &str) -> Result<Option<BlockSpan>> {
        let found = scan::entries(&self.text, parent.body())?
            .into_iter()
            .find_map(|e| match e {
                Entry::Block { name: n, span } if n.matches(&self.text, name) => Some(span),
                _ => None,
            });
        Ok(found)
    }

    /// Names of the direct child blocks of `parent`, in document order.
    pub fn child_names(&self, parent: BlockSpan) -> Result<Vec<String>> {
        let names = scan::entries(&self.text, parent.body())?
            .into_iter()
            .filter_map(|e| match e {
                Entry::Block { name, .. } => Some(scan::unescape(name.raw(&self.text)).into_owned()),
                Entry::Pair { .. } => None,
            })
            .collect();
        Ok(names)
    }

    /// Value of the top-level key `key` in `block` (case-insensitive).
    pub fn value(&self, block: BlockSpan, key: &str) -> Result<Option<String>> {
        let found = scan::entries(&self.text, block.body())?
            .into_iter()
            .find_map(|e| match e {
                Entry::Pair { key: k, value } if k.matches(&self.text, key) => {
                    Some(scan::unescape(value.raw(&self.text)).into_owned())
                }
                _ => None,
            });
        Ok(found)
    }

    /// Return the child block `name` of `parent`, creating an empty one if absent.
    ///
    /// A new block is appended as the last item of `parent`, indented one tab deeper
    /// than the line holding `parent`'s closing brace.
    pub fn child_or_insert(&mut self, parent: BlockSpan, name: &str) -> Result<BlockSpan> {
        if let Some(found) = self.find_child(parent, name)? {
            log::debug!("found block \"{name}\" at offset {}", found.open);
            return Ok(found);
        }

        let close_indent = scan::line_indent(&self.text, parent.close).to_string();
        let indent = format!("{close_indent}\t");
        let quoted = scan::escape(name);
        let nl = self.newline();
        let block = format!("{indent}\"{quoted}\"{nl}{indent}{{{nl}{indent}}}");
        let parent = self.append_to_body(parent, &block, &close_indent);

        let created = self.find_child(parent, name)?.ok_or_else(|| {
            InstallerError::malformed(format!("inserted block \"{name}\" could not be located"))
        })?;
        log::debug!("created block \"{name}\" at offset {}", created.open);
        Ok(created)
    }

    /// Set `key` to `value` inside `block`; returns the block's span after the edit.
    ///
    /// An existing top-level key (matched case-insensitively) keeps its spelling and only
    /// its value token is replaced. Otherwise a `"key"\t\t"value"` line is appended after
    /// the last item of the block, using that item's indentation.
    pub fn set_value(&mut self, block: BlockSpan, key: &str, value: &str) -> Result<BlockSpan> {
        let escaped = scan::escape(value);
        let items = scan::entries(&self.text, block.body())?;

        let existing = items.iter().find_map(|e| match e {
            Entry::Pair { key: k, value: v } if k.matches(&self.text, key) => Some(v.inner.clone()),
            _ => None,
        });

        if let Some(range) = existing {
            log::debug!("replacing value of \"{key}\" at offset {}", range.start);
            let close = block.close - range.len() + escaped.len();
            self.text.replace_range(range, &escaped);
            return Ok(BlockSpan {
                open: block.open,
                close,
            });
        }

        let indent = items
            .last()
            .and_then(|e| scan::own_line_indent(&self.text, e.start()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}\t", scan::line_indent(&self.text, block.close)));
        let close_indent = scan::line_indent(&self.text, block.close).to_string();
        let line = format!("{indent}\"{}\"\t\t\"{escaped}\"", scan::escape(key));

        log::debug!("inserting \"{key}\" into block at offset {}", block.open);
        Ok(self.append_to_body(block, &line, &close_indent))
    }

    /// Insert `line` after the last non-blank content of `block`. A blank body is
    /// replaced outright so placeholder whitespace does not linger.
    fn append_to_body(&mut self, block: BlockSpan, line: &str, close_indent: &str) -> BlockSpan {
        let nl = self.newline();
        let body = block.body();
        let content_end = body.start + self.text[body.clone()].trim_end().len();

        let (range, insertion): (Range<usize>, String) = if content_end == body.start {
            (body, format!("{nl}{line}{nl}{close_indent}"))
        } else {
            (content_end..content_end, format!("{nl}{line}"))
        };

        let close = block.close - range.len() + insertion.len();
        self.text.replace_range(range, &insertion);
        BlockSpan {
            open: block.open,
            close,
        }
    }

    /// `\r\n` if the document already uses it, so inserted lines match.
    fn newline(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    fn search(&self, body: Range<usize>, name: &str) -> Result<Option<BlockSpan>> {
        for entry in scan::entries(&self.text, body)? {
            if let Entry::Block { name: n, span } = entry {
                if n.matches(&self.text, name) {
                    return Ok(Some(span));
                }
                if let Some(found) = self.search(span.body(), name)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LOCALCONFIG: &str = "\"UserLocalConfigStore\"
{
\t\"Software\"
\t{
\t\t\"Valve\"
\t\t{
\t\t\t\"Steam\"
\t\t\t{
\t\t\t\t\"apps\"
\t\t\t\t{
\t\t\t\t\t\"440\"
\t\t\t\t\t{
\t\t\t\t\t\t\"LastPlayed\"\t\t\"1700000000\"
\t\t\t\t\t}
\t\t\t\t}
\t\t\t}
\t\t}
\t}
}
";

    #[test]
    fn finds_nested_section_case_insensitively() {
        let doc = Document::new(LOCALCONFIG);
        let apps = doc.find_section("Apps").unwrap().unwrap();
        assert_eq!(doc.child_names(apps).unwrap(), vec!["440".to_string()]);
    }

    #[test]
    fn child_match_is_token_exact() {
        let doc = Document::new("\"Apps\"\n{\n\t\"3221700\"\n\t{\n\t}\n}\n");
        let apps = doc.find_section("Apps").unwrap().unwrap();
        assert_eq!(doc.find_child(apps, "322170").unwrap(), None);
        assert!(doc.find_child(apps, "3221700").unwrap().is_some());
    }

    #[test]
    fn key_is_not_a_block() {
        let doc = Document::new("\"Apps\"\n{\n\t\"322170\"\t\t\"x\"\n}\n");
        let apps = doc.find_section("Apps").unwrap().unwrap();
        assert_eq!(doc.find_child(apps, "322170").unwrap(), None);
    }

    #[test]
    fn creates_child_with_parent_indentation() {
        let mut doc = Document::new(LOCALCONFIG);
        let apps = doc.find_section("apps").unwrap().unwrap();
        let block = doc.child_or_insert(apps, "322170").unwrap();
        doc.set_value(block, "LaunchOptions", "%command%").unwrap();

        let expected = LOCALCONFIG.replace(
            "\t\t\t\t\t}\n\t\t\t\t}",
            "\t\t\t\t\t}\n\t\t\t\t\t\"322170\"\n\t\t\t\t\t{\n\t\t\t\t\t\t\"LaunchOptions\"\t\t\"%command%\"\n\t\t\t\t\t}\n\t\t\t\t}",
        );
        assert_eq!(doc.as_str(), expected);
    }

    #[test]
    fn inserted_key_follows_last_top_level_item() {
        let mut doc = Document::new(LOCALCONFIG);
        let apps = doc.find_section("apps").unwrap().unwrap();
        let block = doc.child_or_insert(apps, "440").unwrap();
        doc.set_value(block, "LaunchOptions", "-novid").unwrap();
        assert!(doc.as_str().contains(
            "\t\t\t\t\t\t\"LastPlayed\"\t\t\"1700000000\"\n\t\t\t\t\t\t\"LaunchOptions\"\t\t\"-novid\"\n\t\t\t\t\t}"
        ));
    }

    #[test]
    fn replaces_value_preserving_key_spelling() {
        let mut doc = Document::new("\"a\"\n{\n\t\"launchoptions\"\t\"old\"\n\t\"other\"\t\"x\"\n}\n");
        let a = doc.find_section("a").unwrap().unwrap();
        doc.set_value(a, "LaunchOptions", "new value").unwrap();
        assert_eq!(
            doc.as_str(),
            "\"a\"\n{\n\t\"launchoptions\"\t\"new value\"\n\t\"other\"\t\"x\"\n}\n"
        );
    }

    #[test]
    fn nested_key_is_not_replaced() {
        let mut doc = Document::new("\"a\"\n{\n\t\"sub\"\n\t{\n\t\t\"name\"\t\"keep\"\n\t}\n}\n");
        let a = doc.find_section("a").unwrap().unwrap();
        doc.set_value(a, "name", "top").unwrap();
        assert!(doc.as_str().contains("\"name\"\t\"keep\""));
        assert!(doc.as_str().contains("\t\"name\"\t\t\"top\"\n}"));
    }

    #[test]
    fn returned_span_tracks_edits() {
        let mut doc = Document::new("\"a\"\n{\n}\n\"b\"\n{\n}\n");
        let a = doc.find_section("a").unwrap().unwrap();
        let a = doc.set_value(a, "k1", "v1").unwrap();
        let a = doc.set_value(a, "k2", "v\"2").unwrap();
        let a = doc.set_value(a, "k1", "longer value").unwrap();
        assert_eq!(&doc.as_str()[a.close..a.close + 1], "}");
        assert_eq!(doc.value(a, "K2").unwrap().as_deref(), Some("v\"2"));
        assert_eq!(doc.value(a, "k1").unwrap().as_deref(), Some("longer value"));
        assert!(doc.as_str().ends_with("}\n\"b\"\n{\n}\n"));
    }

    #[test]
    fn crlf_document_keeps_crlf_line_endings() {
        let original = LOCALCONFIG.replace('\n', "\r\n");
        let mut doc = Document::new(original.as_str());
        let apps = doc.find_section("apps").unwrap().unwrap();
        let block = doc.child_or_insert(apps, "322170").unwrap();
        doc.set_value(block, "LaunchOptions", "%command%").unwrap();

        let expected = LOCALCONFIG
            .replace(
                "\t\t\t\t\t}\n\t\t\t\t}",
                "\t\t\t\t\t}\n\t\t\t\t\t\"322170\"\n\t\t\t\t\t{\n\t\t\t\t\t\t\"LaunchOptions\"\t\t\"%command%\"\n\t\t\t\t\t}\n\t\t\t\t}",
            )
            .replace('\n', "\r\n");
        assert_eq!(doc.as_str(), expected);
    }

    #[test]
    fn crlf_empty_block_gets_crlf_key_line() {
        let mut doc = Document::new("\"Apps\"\r\n{\r\n}\r\n");
        let apps = doc.find_section("Apps").unwrap().unwrap();
        doc.set_value(apps, "k", "v").unwrap();
        assert_eq!(doc.as_str(), "\"Apps\"\r\n{\r\n\t\"k\"\t\t\"v\"\r\n}\r\n");
    }

    #[test]
    fn malformed_section_is_an_error() {
        let doc = Document::new("\"Apps\"\n{\n\t\"1\"\n\t{\n}\n");
        assert!(matches!(
            doc.find_section("missing"),
            Err(InstallerError::Malformed { .. })
        ));
    }
}
