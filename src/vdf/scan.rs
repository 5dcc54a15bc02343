use crate::error::{InstallerError, Result};
use std::borrow::Cow;
use std::ops::Range;

/// Half-open location of a block inside a document: `open` is the offset of its `{`,
/// `close` the offset of the matching `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Offset of the opening brace.
    pub open: usize,
    /// Offset of the matching closing brace.
    pub close: usize,
}

impl BlockSpan {
    /// Byte range strictly between the braces.
    pub fn body(&self) -> Range<usize> {
        self.open + 1..self.close
    }
}

/// A quoted token. `outer` includes the quotes, `inner` is the raw (still escaped) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) outer: Range<usize>,
    pub(crate) inner: Range<usize>,
}

impl Token {
    pub(crate) fn raw<'a>(&self, text: &'a str) -> &'a str {
        &text[self.inner.clone()]
    }

    /// Token-exact, ASCII case-insensitive compare against an unescaped name.
    pub(crate) fn matches(&self, text: &str, name: &str) -> bool {
        unescape(self.raw(text)).eq_ignore_ascii_case(name)
    }
}

/// One top-level item of a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Pair { key: Token, value: Token },
    Block { name: Token, span: BlockSpan },
}

impl Entry {
    pub(crate) fn start(&self) -> usize {
        match self {
            Entry::Pair { key, .. } => key.outer.start,
            Entry::Block { name, .. } => name.outer.start,
        }
    }
}

/// Offset of the `}` matching the `{` at `open`.
///
/// Quoted strings are opaque: an unescaped `"` toggles string state and a backslash
/// inside a string skips the following byte. `//` comments outside strings run to the
/// end of the line and are ignored. Returns `None` when `open` is not a `{` or the
/// document ends before the nesting depth returns to zero.
pub(crate) fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let b = text.as_bytes();
    if b.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_str = false;
    let mut i = open;

    while i < b.len() {
        let c = b[i];
        if in_str {
            match c {
                b'\\' => i += 1,
                b'"' => in_str = false,
                _ => {}
            }
        } else {
            match c {
                b'"' => in_str = true,
                b'/' if b.get(i + 1) == Some(&b'/') => {
                    i = line_end(b, i);
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }

    None
}

/// Offset of the `{` opening the block named by a token that ends at `after`.
///
/// Only whitespace and comments may sit between the name and its brace; anything
/// else (a quoted value, a closing brace) means the token does not name a block.
pub(crate) fn block_open_after(text: &str, after: usize, end: usize) -> Option<usize> {
    let b = text.as_bytes();
    let i = skip_trivia(b, after, end);
    (i < end && b[i] == b'{').then_some(i)
}

/// Tokenize the top level of `body`. Nested blocks are returned whole, never descended into.
pub(crate) fn entries(text: &str, body: Range<usize>) -> Result<Vec<Entry>> {
    let b = text.as_bytes();
    let end = body.end;
    let mut out = Vec::new();
    let mut i = body.start;

    loop {
        i = skip_trivia(b, i, end);
        if i >= end {
            break;
        }

        if b[i] != b'"' {
            // bare tokens and conditionals like `[$WIN32]` carry no structure we edit
            i += 1;
            continue;
        }

        let name = read_quoted(b, i, end)?;
        i = name.outer.end;

        if let Some(open) = block_open_after(text, i, end) {
            let close = matching_brace(text, open)
                .filter(|&c| c < end)
                .ok_or_else(|| {
                    InstallerError::malformed(format!(
                        "block \"{}\" at offset {} has no closing brace",
                        name.raw(text),
                        name.outer.start
                    ))
                })?;
            out.push(Entry::Block {
                name,
                span: BlockSpan { open, close },
            });
            i = close + 1;
            continue;
        }

        let j = skip_trivia(b, i, end);
        if j < end && b[j] == b'"' {
            let value = read_quoted(b, j, end)?;
            i = value.outer.end;
            out.push(Entry::Pair { key: name, value });
        }
    }

    Ok(out)
}

fn read_quoted(b: &[u8], start: usize, end: usize) -> Result<Token> {
    let mut i = start + 1;
    while i < end {
        match b[i] {
            b'\\' => i += 2,
            b'"' => {
                return Ok(Token {
                    outer: start..i + 1,
                    inner: start + 1..i,
                })
            }
            _ => i += 1,
        }
    }
    Err(InstallerError::malformed(format!(
        "unterminated string at offset {start}"
    )))
}

fn skip_trivia(b: &[u8], mut i: usize, end: usize) -> usize {
    while i < end {
        if b[i].is_ascii_whitespace() {
            i += 1;
        } else if b[i] == b'/' && i + 1 < end && b[i + 1] == b'/' {
            i = line_end(b, i).min(end);
        } else {
            break;
        }
    }
    i
}

fn line_end(b: &[u8], from: usize) -> usize {
    b[from..]
        .iter()
        .position(|&c| c == b'\n')
        .map_or(b.len(), |p| from + p)
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |p| p + 1)
}

/// Leading whitespace of the line containing `pos`.
pub(crate) fn line_indent(text: &str, pos: usize) -> &str {
    let line = &text[line_start(text, pos)..pos];
    &line[..line.len() - line.trim_start().len()]
}

/// Indentation before `pos`, if `pos` is the first non-blank character of its line.
pub(crate) fn own_line_indent(text: &str, pos: usize) -> Option<&str> {
    let prefix = &text[line_start(text, pos)..pos];
    prefix
        .bytes()
        .all(|c| c == b' ' || c == b'\t')
        .then_some(prefix)
}

pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '"']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace('\\', "\\\\").replace('"', "\\\""))
}

pub(crate) fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(n) = chars.next() {
                out.push(n);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
