//! Null-delimited argument tokenizer
//!
//! Tokens are views into the region they were cut from. The tokenizer only
//! ever scans the bytes it has not consumed yet, so a region whose last
//! token lacks its null terminator yields no token for it instead of
//! running past the end.

/// One argument of a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Token<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> Token<'a> {
    /// Offset of the first byte within the tokenized region
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Token bytes, without the terminator
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Token as UTF-8 text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.bytes).ok()
    }

    /// Token length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the token is empty (two adjacent separators)
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Sequential tokenizer over a null-delimited region
///
/// The region is expected to end with a null byte; every token including
/// the last one is terminated.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    /// Bytes not consumed yet
    rest: &'a [u8],
    /// Offset of `rest` within the tokenized region
    cursor: usize,
}

impl<'a> Tokenizer<'a> {
    /// Start tokenizing `region` from its first byte
    pub fn new(region: &'a [u8]) -> Self {
        Self {
            rest: region,
            cursor: 0,
        }
    }

    /// Number of bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Offset of the next token within the region
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Extract the next token
    ///
    /// Returns `None` when the token and its terminator do not fit in the
    /// remaining bytes. The tokenizer is left untouched in that case.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let len = self.rest.iter().position(|&b| b == 0)?;

        let token = Token {
            offset: self.cursor,
            bytes: &self.rest[..len],
        };

        // `len < rest.len()` because the null was found inside `rest`
        self.rest = &self.rest[len + 1..];
        self.cursor += len + 1;

        Some(token)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
