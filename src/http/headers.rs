use crate::http::parser::ParseError;

const CRLF: &[u8] = b"\r\n";

/// Case-insensitive header collection.
///
/// Field names are lower-cased on insertion. Entries keep insertion order so
/// serialization is deterministic. Repeated names accumulate as a
/// comma-joined value list rather than overwriting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Retrieves a header value by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts a header, replacing any existing value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Inserts a header, comma-joining onto any existing value under the same
    /// name (value-list semantics for repeated field names).
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => {
                v.push(',');
                v.push_str(&value);
            }
            None => self.entries.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consumes as many complete field lines as the buffer holds.
    ///
    /// Returns `(bytes_consumed, done)`. `done` becomes true once the blank
    /// line terminating the header block has been consumed. A buffer with no
    /// complete line left yields `(consumed_so_far, false)` and no error; the
    /// caller supplies more bytes and retries. A rejected field line leaves
    /// the map untouched for that line.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let mut consumed = 0;
        loop {
            let Some(idx) = find_crlf(&data[consumed..]) else {
                // No full line buffered yet.
                return Ok((consumed, false));
            };

            // CRLF at the front is the blank line ending the header block.
            if idx == 0 {
                consumed += CRLF.len();
                return Ok((consumed, true));
            }

            let (name, value) = parse_field_line(&data[consumed..consumed + idx])?;
            consumed += idx + CRLF.len();
            self.add(name, value);
        }
    }
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

/// Splits one field line at the first `:` and validates the name.
fn parse_field_line(line: &[u8]) -> Result<(String, String), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidFieldLine)?;
    let (name, value) = line.split_once(':').ok_or(ParseError::InvalidFieldLine)?;

    // Whitespace between the field name and the colon is not allowed.
    if name.ends_with(' ') || name.ends_with('\t') {
        return Err(ParseError::InvalidFieldName);
    }

    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return Err(ParseError::InvalidFieldName);
    }

    Ok((name, value.trim().to_string()))
}

/// Field-name grammar after lower-casing: `[a-z0-9!#$%&'*+\-.^_`|~]`.
fn is_token_byte(b: u8) -> bool {
    matches!(
        b,
        b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
    )
}
