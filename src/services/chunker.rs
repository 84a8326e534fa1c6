//! Paragraph-bounded text chunking for knowledge-base ingestion.

/// Default maximum chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Splits text into chunks of at most `chunk_size` characters.
///
/// Paragraphs (separated by blank lines) are packed together while they fit.
/// A paragraph longer than the limit is cut at the last sentence boundary
/// inside the window, or hard-cut when there is none.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Chunker {
    /// Chunker aiming at `chunk_size` characters per chunk (at least 1).
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Split `text` into paragraph-packed chunks, in order.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for paragraph in paragraphs(text) {
            for piece in self.split_long(&paragraph) {
                let needed = if current.is_empty() {
                    piece.chars().count()
                } else {
                    current.chars().count() + 2 + piece.chars().count()
                };
                if needed > self.chunk_size && !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push_str("\n\n");
                }
                current.push_str(&piece);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    fn split_long(&self, paragraph: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut rest: &str = paragraph;

        while rest.chars().count() > self.chunk_size {
            let window_end = rest
                .char_indices()
                .nth(self.chunk_size)
                .map_or(rest.len(), |(index, _)| index);
            let window = &rest[..window_end];
            let cut = snap_to_boundary(window).unwrap_or(window_end);

            pieces.push(rest[..cut].trim().to_string());
            rest = rest[cut..].trim_start();
        }

        if !rest.trim().is_empty() {
            pieces.push(rest.trim().to_string());
        }
        pieces.retain(|piece| !piece.is_empty());
        pieces
    }
}

fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Byte offset just after the last sentence boundary (., !, ?, \n) in `text`.
fn snap_to_boundary(text: &str) -> Option<usize> {
    let boundaries = ['.', '!', '?', '\n'];

    text.char_indices()
        .rev()
        .find(|(_, c)| boundaries.contains(c))
        .map(|(i, c)| i + c.len_utf8())
}
