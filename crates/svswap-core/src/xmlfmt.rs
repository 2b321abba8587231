// Hand-rolled reader for the subset of XML the game engine emits:
// declaration, comments, elements, attributes, character data, and the
// standard entity/character references. DOCTYPE and CDATA are rejected.
use crate::error::CoreError;
use crate::model::{Content, Document, Element};

/// Parse a complete XML document. Whitespace-only text nodes that sit
/// between elements are dropped (previously pretty-printed saves come back
/// clean); whitespace text inside a leaf element is kept as data.
pub fn parse_document(input: &str) -> Result<Document, CoreError> {
    let mut r = Reader::new(input);
    r.skip_misc()?;
    let root = r.parse_element()?;
    r.skip_misc()?;
    if r.pos < r.data.len() {
        return Err(r.err("trailing content after document root"));
    }
    Ok(Document { root })
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            data: input.as_bytes(),
            pos: 0,
        }
    }

    fn err(&self, message: impl Into<String>) -> CoreError {
        CoreError::Parse {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.data[self.pos..].starts_with(prefix)
    }

    fn expect(&mut self, b: u8) -> Result<(), CoreError> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(format!("expected '{}'", b as char)))
        }
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skip whitespace, the XML declaration, processing instructions, and
    /// comments outside the root element.
    fn skip_misc(&mut self) -> Result<(), CoreError> {
        loop {
            self.skip_ws();
            if self.starts_with(b"<?") {
                self.skip_until(b"?>")?;
            } else if self.starts_with(b"<!--") {
                self.skip_until(b"-->")?;
            } else if self.starts_with(b"<!") {
                return Err(self.err("DOCTYPE and CDATA are not supported"));
            } else {
                return Ok(());
            }
        }
    }

    fn skip_until(&mut self, end: &[u8]) -> Result<(), CoreError> {
        while self.pos < self.data.len() {
            if self.starts_with(end) {
                self.pos += end.len();
                return Ok(());
            }
            self.pos += 1;
        }
        Err(self.err(format!(
            "unterminated construct, expected '{}'",
            String::from_utf8_lossy(end)
        )))
    }

    fn read_name(&mut self) -> Result<String, CoreError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            // Covers ASCII names plus namespace prefixes; the save format
            // uses nothing wider.
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.err("expected a name"));
        }
        Ok(String::from_utf8_lossy(&self.data[start..self.pos]).into_owned())
    }

    fn parse_element(&mut self) -> Result<Element, CoreError> {
        self.expect(b'<')?;
        let name = self.read_name()?;
        let mut element = Element::new(name);
        let self_closing = self.parse_attributes(&mut element)?;
        if self_closing {
            return Ok(element);
        }
        self.parse_children(&mut element)?;
        // Closing tag: "</name>"
        self.expect(b'<')?;
        self.expect(b'/')?;
        let close = self.read_name()?;
        if close != element.name {
            return Err(self.err(format!(
                "mismatched closing tag: expected </{}>, found </{}>",
                element.name, close
            )));
        }
        self.skip_ws();
        self.expect(b'>')?;
        Ok(element)
    }

    /// Parse attributes up to and including the tag terminator. Returns true
    /// for a self-closing tag.
    fn parse_attributes(&mut self, element: &mut Element) -> Result<bool, CoreError> {
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(false);
                }
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>')?;
                    return Ok(true);
                }
                Some(_) => {
                    let name = self.read_name()?;
                    self.skip_ws();
                    self.expect(b'=')?;
                    self.skip_ws();
                    let value = self.read_quoted_value()?;
                    if element.attributes.insert(name.clone(), value).is_some() {
                        return Err(self.err(format!("duplicate attribute '{name}'")));
                    }
                }
                None => return Err(self.err("unterminated start tag")),
            }
        }
    }

    fn read_quoted_value(&mut self) -> Result<String, CoreError> {
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.err("expected a quoted attribute value")),
        };
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(q) if q == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some(b'&') => value.push(self.read_reference()?),
                Some(b'<') => return Err(self.err("'<' in attribute value")),
                Some(_) => self.push_char(&mut value),
                None => return Err(self.err("unterminated attribute value")),
            }
        }
    }

    fn parse_children(&mut self, element: &mut Element) -> Result<(), CoreError> {
        loop {
            if self.starts_with(b"<!--") {
                self.skip_until(b"-->")?;
                continue;
            }
            if self.starts_with(b"<![") {
                return Err(self.err("CDATA is not supported"));
            }
            match self.peek() {
                Some(b'<') if self.data.get(self.pos + 1) == Some(&b'/') => return Ok(()),
                Some(b'<') => {
                    let child = self.parse_element()?;
                    element.children.push(Content::Element(child));
                }
                Some(_) => {
                    let text = self.read_text()?;
                    // Indentation between elements is not data; whitespace
                    // that is the sole content of a leaf element is.
                    let sole_content = element.children.is_empty()
                        && self.peek() == Some(b'<')
                        && self.data.get(self.pos + 1) == Some(&b'/');
                    if !text.trim().is_empty() || sole_content {
                        element.children.push(Content::Text(text));
                    }
                }
                None => return Err(self.err("unterminated element content")),
            }
        }
    }

    fn read_text(&mut self) -> Result<String, CoreError> {
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(b'<') | None => return Ok(text),
                Some(b'&') => text.push(self.read_reference()?),
                Some(_) => self.push_char(&mut text),
            }
        }
    }

    /// Append the next (possibly multi-byte) character to `out`.
    fn push_char(&mut self, out: &mut String) {
        let b = self.data[self.pos];
        if b < 0x80 {
            out.push(b as char);
            self.pos += 1;
            return;
        }
        let len = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => 4,
        };
        let end = (self.pos + len).min(self.data.len());
        out.push_str(&String::from_utf8_lossy(&self.data[self.pos..end]));
        self.pos = end;
    }

    /// Decode `&amp;`-style entities and numeric character references.
    fn read_reference(&mut self) -> Result<char, CoreError> {
        let start = self.pos;
        self.expect(b'&')?;
        let semi = self.data[self.pos..]
            .iter()
            .position(|&b| b == b';')
            .ok_or_else(|| self.err("unterminated entity reference"))?;
        let body = &self.data[self.pos..self.pos + semi];
        self.pos += semi + 1;
        let decoded = match body {
            b"amp" => Some('&'),
            b"lt" => Some('<'),
            b"gt" => Some('>'),
            b"quot" => Some('"'),
            b"apos" => Some('\''),
            _ if body.first() == Some(&b'#') => {
                let digits = &body[1..];
                let code = if digits.first() == Some(&b'x') || digits.first() == Some(&b'X') {
                    u32::from_str_radix(&String::from_utf8_lossy(&digits[1..]), 16).ok()
                } else {
                    String::from_utf8_lossy(digits).parse::<u32>().ok()
                };
                code.and_then(char::from_u32)
            }
            _ => None,
        };
        decoded.ok_or_else(|| CoreError::Parse {
            offset: start,
            message: format!(
                "unknown entity reference '&{};'",
                String::from_utf8_lossy(body)
            ),
        })
    }
}
