//! Recursive character text splitter.
//!
//! Splits body text into overlapping chunks for embedding. The
//! splitter tries separators in order (paragraph break, line break,
//! space, then raw characters), recursing with finer separators for
//! pieces that still exceed the chunk size, then greedily merges
//! pieces back into chunks no larger than `chunk_size` characters
//! with roughly `chunk_overlap` characters carried between
//! consecutive chunks. All lengths are measured in characters, not
//! bytes — archive text is not ASCII.

const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Configurable overlapping-chunk splitter.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl TextSplitter {
    /// Create a splitter. `chunk_overlap` is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split `text` into overlapping chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        self.split_recursive(trimmed, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((sep, finer)) = separators.split_first() else {
            return self.split_chars(text);
        };

        let pieces: Vec<&str> = text.split(sep).filter(|p| !p.is_empty()).collect();
        if pieces.len() <= 1 {
            return self.split_recursive(text, finer);
        }

        // Pieces larger than a chunk recurse with finer separators so
        // every unit handed to merge() fits on its own.
        let mut units: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(piece) > self.chunk_size {
                units.extend(self.split_recursive(piece, finer));
            } else {
                units.push(piece.to_string());
            }
        }

        self.merge(units, sep)
    }

    /// Greedily pack units into chunks, carrying an overlap tail.
    fn merge(&self, units: Vec<String>, sep: &str) -> Vec<String> {
        let sep_len = char_len(sep);
        let mut chunks: Vec<String> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0usize;

        for unit in units {
            let unit_len = char_len(&unit);
            let extra = if current.is_empty() {
                unit_len
            } else {
                unit_len + sep_len
            };

            if !current.is_empty() && current_len + extra > self.chunk_size {
                chunks.push(current.join(sep));

                // Keep trailing units up to the configured overlap.
                let mut kept: Vec<String> = Vec::new();
                let mut kept_len = 0usize;
                for u in current.iter().rev() {
                    let ul = char_len(u) + if kept.is_empty() { 0 } else { sep_len };
                    if kept_len + ul > self.chunk_overlap {
                        break;
                    }
                    kept_len += ul;
                    kept.push(u.clone());
                }
                kept.reverse();
                current = kept;
                current_len = kept_len;
            }

            current_len += if current.is_empty() {
                unit_len
            } else {
                unit_len + sep_len
            };
            current.push(unit);
        }

        if !current.is_empty() {
            chunks.push(current.join(sep));
        }
        chunks
    }

    /// Last resort: fixed character windows with overlap.
    fn split_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = (self.chunk_size - self.chunk_overlap).max(1);
        let mut out = Vec::new();
        let mut start = 0usize;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            out.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        let splitter = TextSplitter::new(100, 20);
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n ").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = TextSplitter::new(100, 20);
        let chunks = splitter.split("just a short sentence");
        assert_eq!(chunks, vec!["just a short sentence"]);
    }

    #[test]
    fn long_text_splits_within_chunk_size() {
        let splitter = TextSplitter::new(50, 10);
        let text = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 60, "chunk too large: {chunk:?}");
        }
    }

    #[test]
    fn consecutive_chunks_share_overlap() {
        let splitter = TextSplitter::new(30, 12);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        // The tail words of chunk N reappear at the head of chunk N+1.
        let tail_word = chunks[0].split_whitespace().last().unwrap();
        assert!(chunks[1].contains(tail_word));
    }

    #[test]
    fn paragraphs_split_before_words() {
        let splitter = TextSplitter::new(20, 0);
        let text = "first paragraph\n\nsecond paragraph";
        let chunks = splitter.split(text);
        assert_eq!(chunks, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn non_ascii_text_splits_on_char_boundaries() {
        let splitter = TextSplitter::new(10, 2);
        let text = "съешь же ещё этих мягких французских булок";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // Reassembling proves no chars were mangled mid-boundary.
            assert!(text.contains(chunk.split_whitespace().next().unwrap()));
        }
    }

    #[test]
    fn unbroken_run_falls_back_to_char_windows() {
        let splitter = TextSplitter::new(10, 4);
        let text = "a".repeat(25);
        let chunks = splitter.split(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        // Full coverage: last chunk ends where the text ends.
        assert!(chunks.last().unwrap().ends_with('a'));
    }
}
