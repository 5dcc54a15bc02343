use crate::error::{InstallerError, Result};
use crate::vdf::scan::unescape;

/// Flattening VDF reader for `libraryfolders.vdf`, `appmanifest_*.acf`,
/// `config.vdf` and `compatibilitytool.vdf`.
///
/// Tolerant by design of what Steam writes:
/// - keys/values are quoted strings
/// - nesting is `{ ... }`
/// - `//` comments run to end of line
///
/// Entries are kept in document order with keys stored as `Path/To/Key`.
#[derive(Debug, Default, Clone)]
pub struct Vdf {
    entries: Vec<(String, String)>,
}

impl Vdf {
    /// Parse document text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut p = Parser::new(text);
        p.parse()?;
        Ok(Self { entries: p.out })
    }

    /// Value at the full `Path/To/Key`, compared case-insensitively.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(path))
            .map(|(_, v)| v.as_str())
    }

    /// First value, in document order, whose last path segment is `leaf`.
    pub fn find_leaf(&self, leaf: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.rsplit('/').next().is_some_and(|l| l.eq_ignore_ascii_case(leaf)))
            .map(|(_, v)| v.as_str())
    }

    /// All `(path, value)` entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

struct Parser<'a> {
    s: &'a [u8],
    i: usize,
    out: Vec<(String, String)>,
    stack: Vec<String>,
    pending_key: Option<String>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            s: text.as_bytes(),
            i: 0,
            out: Vec::new(),
            stack: Vec::new(),
            pending_key: None,
        }
    }

    fn parse(&mut self) -> Result<()> {
        while self.skip_trivia() {
            match self.peek_char() {
                Some(b'"') => {
                    let tok = self.read_quoted()?;
                    self.skip_trivia();
                    match self.peek_char() {
                        Some(b'"') => {
                            let val = self.read_quoted()?;
                            self.add_kv(tok, val);
                        }
                        Some(b'{') => {
                            self.i += 1;
                            self.stack.push(tok);
                        }
                        _ => {
                            self.pending_key = Some(tok);
                        }
                    }
                }
                Some(b'{') => {
                    self.i += 1;
                    if let Some(k) = self.pending_key.take() {
                        self.stack.push(k);
                    }
                }
                Some(b'}') => {
                    self.i += 1;
                    if self.stack.pop().is_none() {
                        return Err(InstallerError::malformed("unexpected '}' in VDF"));
                    }
                }
                _ => {
                    self.i += 1;
                }
            }
        }

        if !self.stack.is_empty() {
            return Err(InstallerError::malformed("unclosed braces in VDF"));
        }
        Ok(())
    }

    fn add_kv(&mut self, k: String, v: String) {
        let mut path = String::new();
        for seg in &self.stack {
            path.push_str(seg);
            path.push('/');
        }
        path.push_str(&k);
        self.out.push((path, v));
    }

    fn skip_trivia(&mut self) -> bool {
        loop {
            while self.i < self.s.len() && self.s[self.i].is_ascii_whitespace() {
                self.i += 1;
            }
            if self.s[self.i..].starts_with(b"//") {
                while self.i < self.s.len() && self.s[self.i] != b'\n' {
                    self.i += 1;
                }
                continue;
            }
            return self.i < self.s.len();
        }
    }

    fn peek_char(&self) -> Option<u8> {
        self.s.get(self.i).copied()
    }

    fn read_quoted(&mut self) -> Result<String> {
        let start = self.i;
        self.i += 1;
        while self.i < self.s.len() {
            match self.s[self.i] {
                b'\\' => self.i += 2,
                b'"' => {
                    let raw = String::from_utf8(self.s[start + 1..self.i].to_vec())?;
                    self.i += 1;
                    return Ok(unescape(&raw).into_owned());
                }
                _ => self.i += 1,
            }
        }
        Err(InstallerError::malformed(format!(
            "unterminated string at offset {start}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_vdf() {
        let txt = r#"
"InstallConfigStore"
{
  "Software"
  {
    "Valve"
    {
      "Steam"
      {
        "CompatToolMapping"
        {
          "322170"
          {
            "name" "GE-Proton9-1"
          }
        }
      }
    }
  }
}
"#;

        let vdf = Vdf::parse(txt).unwrap();
        let val = vdf
            .get("InstallConfigStore/Software/Valve/Steam/compattoolmapping/322170/name")
            .unwrap();
        assert_eq!(val, "GE-Proton9-1");
        assert_eq!(vdf.find_leaf("NAME"), Some("GE-Proton9-1"));
    }

    #[test]
    fn comments_and_escapes() {
        let txt = "\"root\"\n{\n\t\"tool\" // \"quoted\" comment\n\t{\n\t\t\"cmd\"\t\"a \\\"b\\\"\"\n\t}\n}\n";
        let vdf = Vdf::parse(txt).unwrap();
        assert_eq!(vdf.get("root/tool/cmd"), Some("a \"b\""));
    }

    #[test]
    fn keeps_document_order() {
        let vdf = Vdf::parse("\"a\" { \"z\" \"1\" \"b\" \"2\" \"z\" \"3\" }").unwrap();
        let keys: Vec<_> = vdf.entries().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(keys, vec!["a/z=1", "a/b=2", "a/z=3"]);
        assert_eq!(vdf.find_leaf("z"), Some("1"));
    }

    #[test]
    fn unbalanced_is_error() {
        assert!(Vdf::parse("\"a\" { \"b\" \"c\"").is_err());
        assert!(Vdf::parse("\"a\" \"b\" }").is_err());
    }
}
