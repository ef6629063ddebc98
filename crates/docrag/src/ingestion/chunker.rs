//! Boundary-aware text chunking with fixed overlap

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkPosition, Document};

/// Text chunker with configurable size and overlap
///
/// Sizes are measured in characters. Consecutive chunks of one document
/// share exactly `chunk_overlap` characters of source text, so
/// concatenating chunk texts minus the overlap reconstructs the input.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    chunk_overlap: usize,
}

impl Chunker {
    /// Create a new chunker, rejecting parameters that cannot make progress
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than zero".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Split one document into chunks with dense positions
    ///
    /// Empty or whitespace-only text yields no chunks. All chunks are
    /// produced before positions are assigned, so every chunk carries the
    /// final total for this document.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let pieces = self.split_text(&document.text);
        let total = pieces.len();

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(document.document_id, text, index, total))
            .collect()
    }

    /// Re-assign dense positions across chunks that belong to one file
    ///
    /// Used when a multi-segment file produced several documents sharing a
    /// document id; the index/total invariant holds per file afterwards.
    pub fn renumber(chunks: &mut [Chunk]) {
        let total = chunks.len();
        for (index, chunk) in chunks.iter_mut().enumerate() {
            chunk.position = ChunkPosition { index, total };
        }
    }

    /// Split text into overlapping pieces at the best available boundary
    fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Byte offset of every char, so sizes can be counted in characters
        // while slicing stays on valid boundaries.
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let n_chars = offsets.len();
        let byte_at = |char_idx: usize| {
            if char_idx >= n_chars {
                text.len()
            } else {
                offsets[char_idx]
            }
        };

        let mut pieces = Vec::new();
        let mut start = 0usize;

        loop {
            let window_end = (start + self.chunk_size).min(n_chars);
            if window_end == n_chars {
                pieces.push(text[byte_at(start)..].to_string());
                break;
            }

            let window = &text[byte_at(start)..byte_at(window_end)];
            // A boundary must clear the overlapped prefix, otherwise the
            // next chunk would not advance.
            let min_cut = byte_at(start + self.chunk_overlap + 1) - byte_at(start);
            let cut = find_boundary(window, min_cut).unwrap_or(window.len());

            let piece = &window[..cut];
            pieces.push(piece.to_string());

            let end_char = start + piece.chars().count();
            start = end_char - self.chunk_overlap;
        }

        pieces
    }
}

/// Find the best cut point in `window`, at least `min_cut` bytes in
///
/// Boundary priority: paragraph break, line break, sentence boundary,
/// whitespace. Returns a byte offset where the chunk ends, or `None` when
/// no boundary qualifies and a hard cut is required.
fn find_boundary(window: &str, min_cut: usize) -> Option<usize> {
    // Paragraph break: cut after the blank line
    if let Some(pos) = window.rfind("\n\n") {
        let cut = pos + 2;
        if cut >= min_cut {
            return Some(cut);
        }
    }

    // Line break
    if let Some(pos) = window.rfind('\n') {
        let cut = pos + 1;
        if cut >= min_cut {
            return Some(cut);
        }
    }

    // Sentence boundary: indices ascend, so the last qualifying one wins
    let mut sentence_cut = None;
    for (idx, _) in window.split_sentence_bound_indices() {
        if idx > 0 && idx >= min_cut {
            sentence_cut = Some(idx);
        }
    }
    if let Some(cut) = sentence_cut {
        return Some(cut);
    }

    // Whitespace: cut after the last whitespace char that clears min_cut
    window
        .char_indices()
        .rev()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
        .find(|&cut| cut >= min_cut && cut < window.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Provenance, SourceKind};
    use uuid::Uuid;

    fn doc(text: &str) -> Document {
        Document::new(
            Uuid::new_v4(),
            text.to_string(),
            Provenance::from_path("/tmp/test.txt", SourceKind::Local),
        )
    }

    /// Reconstruct the source by dropping each chunk's leading overlap
    fn de_overlap(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                out.extend(chunk.text.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn rejects_overlap_not_below_size() {
        assert!(matches!(Chunker::new(100, 100), Err(Error::Config(_))));
        assert!(matches!(Chunker::new(100, 150), Err(Error::Config(_))));
        assert!(matches!(Chunker::new(0, 0), Err(Error::Config(_))));
        assert!(Chunker::new(100, 99).is_ok());
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let chunker = Chunker::new(1000, 200).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());
        assert!(chunker.chunk(&doc("   \n\t  \n")).is_empty());
    }

    #[test]
    fn short_document_yields_single_chunk() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let chunks = chunker.chunk(&doc("a short note"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a short note");
        assert_eq!(chunks[0].position, ChunkPosition { index: 0, total: 1 });
    }

    #[test]
    fn hard_cut_2500_chars_gives_three_chunks() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let text = "x".repeat(2500);
        let chunks = chunker.chunk(&doc(&text));

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position.index, i);
            assert_eq!(chunk.position.total, 3);
        }
        assert_eq!(chunks[0].text.chars().count(), 1000);
        assert_eq!(chunks[1].text.chars().count(), 1000);
        assert_eq!(chunks[2].text.chars().count(), 900);
    }

    #[test]
    fn consecutive_chunks_share_exact_overlap() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let text = "x".repeat(2500);
        let chunks = chunker.chunk(&doc(&text));

        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .text
                .chars()
                .skip(pair[0].text.chars().count() - 200)
                .collect();
            let head: String = pair[1].text.chars().take(200).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn de_overlap_reconstructs_source() {
        let chunker = Chunker::new(120, 30).unwrap();
        let text = "The quarterly review went well. Revenue grew in every region.\n\n\
                    Engineering shipped the new indexer ahead of schedule, and the \
                    migration finished without downtime. Support volume stayed flat.\n\n\
                    Next quarter the team will focus on retrieval quality, latency, \
                    and the long tail of unsupported formats that customers keep \
                    asking about. Budget is unchanged."
            .to_string();
        let chunks = chunker.chunk(&doc(&text));

        assert!(chunks.len() > 1);
        assert_eq!(de_overlap(&chunks, 30), text);
    }

    #[test]
    fn chunk_length_never_exceeds_size() {
        let chunker = Chunker::new(80, 20).unwrap();
        let text = "word ".repeat(200);
        for chunk in chunker.chunk(&doc(&text)) {
            assert!(chunk.text.chars().count() <= 80);
        }
    }

    #[test]
    fn prefers_paragraph_boundary() {
        let chunker = Chunker::new(100, 10).unwrap();
        let first = "a".repeat(60);
        let second = "b".repeat(80);
        let text = format!("{}\n\n{}", first, second);
        let chunks = chunker.chunk(&doc(&text));

        assert_eq!(chunks[0].text, format!("{}\n\n", first));
        assert!(chunks[1].text.ends_with(&second));
    }

    #[test]
    fn indivisible_run_falls_back_to_hard_cut() {
        let chunker = Chunker::new(50, 10).unwrap();
        let text = "y".repeat(130);
        let chunks = chunker.chunk(&doc(&text));

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].text.chars().count(), 50);
        assert_eq!(de_overlap(&chunks, 10), text);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let chunker = Chunker::new(40, 8).unwrap();
        let text = "Все счастливые семьи похожи друг на друга, каждая несчастливая \
                    семья несчастлива по-своему. Всё смешалось в доме Облонских."
            .to_string();
        let chunks = chunker.chunk(&doc(&text));

        assert!(chunks.len() > 1);
        assert_eq!(de_overlap(&chunks, 8), text);
    }

    #[test]
    fn renumber_assigns_dense_positions_across_segments() {
        let chunker = Chunker::new(1000, 200).unwrap();
        let id = Uuid::new_v4();
        let prov = Provenance::from_path("/tmp/multi.xlsx", SourceKind::Local);

        let mut all = Vec::new();
        for segment in ["sheet one content", "sheet two content"] {
            all.extend(chunker.chunk(&Document::new(id, segment.to_string(), prov.clone())));
        }
        Chunker::renumber(&mut all);

        assert_eq!(all.len(), 2);
        for (i, chunk) in all.iter().enumerate() {
            assert_eq!(chunk.position.index, i);
            assert_eq!(chunk.position.total, 2);
            assert_eq!(chunk.document_id, id);
        }
    }
}
