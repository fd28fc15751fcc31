//! Recursive character text splitter.
//!
//! Splits long text into bounded segments for embedding, preferring
//! natural boundaries (paragraph, then line, then sentence, then word)
//! and falling back to a hard character cut only when a single word
//! exceeds the chunk size. Separators are kept attached to the piece
//! they terminate, so with zero overlap the concatenation of all chunks
//! reconstructs the source text.

/// Boundary preference order: paragraph, line, sentence, word.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// Splits text into chunks of at most `chunk_size` characters.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter with the given maximum chunk size (characters)
    /// and no overlap.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap: 0,
        }
    }

    /// Set the overlap carried from the end of one chunk into the next.
    /// Clamped below the chunk size.
    pub fn with_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap.min(self.chunk_size - 1);
        self
    }

    /// Split `text` into non-empty chunks in source order.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        self.split_level(text, SEPARATORS, &mut chunks);
        chunks
    }

    fn split_level(&self, text: &str, separators: &[&str], out: &mut Vec<String>) {
        if char_len(text) <= self.chunk_size {
            push_chunk(out, text);
            return;
        }

        match separators.split_first() {
            None => self.hard_split(text, out),
            Some((sep, finer)) => {
                let pieces: Vec<&str> = text.split_inclusive(sep).collect();
                if pieces.len() <= 1 {
                    // Separator absent at this level; try a finer one.
                    self.split_level(text, finer, out);
                } else {
                    self.merge_pieces(&pieces, finer, out);
                }
            }
        }
    }

    /// Greedily pack pieces into chunks up to `chunk_size`, recursing
    /// into any piece that is itself oversized.
    fn merge_pieces(&self, pieces: &[&str], finer: &[&str], out: &mut Vec<String>) {
        let mut current = String::new();

        for &piece in pieces {
            if char_len(piece) > self.chunk_size {
                if !current.is_empty() {
                    push_chunk(out, &current);
                    current.clear();
                }
                self.split_level(piece, finer, out);
                continue;
            }

            if !current.is_empty() && char_len(&current) + char_len(piece) > self.chunk_size {
                let mut tail = self.overlap_tail(&current);
                push_chunk(out, &current);

                // The seeded tail must leave room for the piece, or the
                // next chunk would exceed the bound.
                let budget = self.chunk_size.saturating_sub(char_len(piece));
                let tail_len = char_len(&tail);
                if tail_len > budget {
                    tail = tail.chars().skip(tail_len - budget).collect();
                }
                current = tail;
            }

            current.push_str(piece);
        }

        if !current.is_empty() {
            push_chunk(out, &current);
        }
    }

    /// Character-window cut for text with no usable separator.
    fn hard_split(&self, text: &str, out: &mut Vec<String>) {
        let chars: Vec<char> = text.chars().collect();
        let step = (self.chunk_size - self.chunk_overlap).max(1);

        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            push_chunk(out, &chunk);
            if end == chars.len() {
                break;
            }
            start += step;
        }
    }

    /// The last `chunk_overlap` characters of a finished chunk, used to
    /// seed the next one.
    fn overlap_tail(&self, chunk: &str) -> String {
        if self.chunk_overlap == 0 {
            return String::new();
        }
        let total = char_len(chunk);
        chunk
            .chars()
            .skip(total.saturating_sub(self.chunk_overlap))
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Chunks must never be empty; whitespace-only fragments are dropped.
fn push_chunk(out: &mut Vec<String>, chunk: &str) {
    if !chunk.trim().is_empty() {
        out.push(chunk.to_string());
    }
}
