//! Word-bounded text chunking for the legacy chunked analysis mode.

/// A chunk of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// Whether chunked mode should actually split this text.
pub fn should_chunk(text: &str, threshold: usize) -> bool {
    text.chars().count() > threshold
}

/// Split text into whitespace-joined chunks of at most `max_chars` characters.
///
/// Words are never split; a single word longer than the budget becomes its
/// own chunk. Text that already fits is returned unchanged as one chunk.
pub fn chunk_words(text: &str, max_chars: usize) -> Vec<TextChunk> {
    if text.chars().count() <= max_chars {
        return finish(vec![text.to_string()]);
    }

    let mut raw_chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        // +1 for the joining space
        let word_len = word.chars().count() + 1;
        if current_len + word_len > max_chars && !current.is_empty() {
            raw_chunks.push(current.join(" "));
            current = vec![word];
            current_len = word_len;
        } else {
            current.push(word);
            current_len += word_len;
        }
    }

    if !current.is_empty() {
        raw_chunks.push(current.join(" "));
    }

    finish(raw_chunks)
}

fn finish(raw_chunks: Vec<String>) -> Vec<TextChunk> {
    let total_chunks = raw_chunks.len();
    raw_chunks
        .into_iter()
        .enumerate()
        .map(|(chunk_index, text)| TextChunk {
            text,
            chunk_index,
            total_chunks,
        })
        .collect()
}
