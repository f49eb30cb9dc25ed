// ABOUTME: Splits a script into sequentially executable batches
// ABOUTME: Separator detection is line-based text matching, not SQL-aware

/// Batch separator token, written on a line of its own
pub const SEPARATOR: &str = "GO";

/// Partitions script text into batches
pub trait BatchSplitter {
    /// Return the non-empty, trimmed batches of `script` in file order
    fn split<'a>(&self, script: &'a str) -> Vec<&'a str>;
}

/// Splits wherever a line consists solely of the separator token
///
/// Surrounding whitespace on the separator line is ignored; the match is
/// case-sensitive. This is narrower than a plain substring split: the token
/// inside a line (`'GO'`, `GOLD`, `CATEGORY`) never ends a batch. String
/// literals and comments are not recognised, so a literal containing the
/// token on a line of its own still does.
#[derive(Debug, Clone)]
pub struct SeparatorSplitter {
    token: String,
}

impl SeparatorSplitter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Default for SeparatorSplitter {
    fn default() -> Self {
        Self::new(SEPARATOR)
    }
}

impl BatchSplitter for SeparatorSplitter {
    fn split<'a>(&self, script: &'a str) -> Vec<&'a str> {
        let mut batches = Vec::new();
        let mut start = 0;
        let mut offset = 0;

        for line in script.split_inclusive('\n') {
            if line.trim() == self.token {
                push_batch(&mut batches, &script[start..offset]);
                start = offset + line.len();
            }
            offset += line.len();
        }
        push_batch(&mut batches, &script[start..]);

        batches
    }
}

fn push_batch<'a>(batches: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        batches.push(piece);
    }
}
