use serde::Serialize;

/// Largest document body, in characters, a single paste may carry.
pub const MAX_CHUNK_CHARS: usize = 390_000;

/// Splits `body` into contiguous slices of at most `max_chunk_chars` characters.
///
/// Every slice but the last holds exactly `max_chunk_chars` characters. Cuts
/// always land on `char` boundaries, so multi-byte text is never torn. Empty
/// input produces no slices.
pub fn split_into_chunks(body: &str, max_chunk_chars: usize) -> Vec<&str> {
    let max_chunk_chars = max_chunk_chars.max(1);
    let mut chunks = Vec::with_capacity(body.len() / max_chunk_chars + 1);
    let mut start = 0;
    let mut taken = 0;

    for (offset, _) in body.char_indices() {
        if taken == max_chunk_chars {
            chunks.push(&body[start..offset]);
            start = offset;
            taken = 0;
        }
        taken += 1;
    }

    if start < body.len() {
        chunks.push(&body[start..]);
    }

    chunks
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSpan {
    pub index: usize,
    pub chars: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkPlan {
    pub total_chars: usize,
    pub total_bytes: usize,
    pub max_chunk_chars: usize,
    pub chunks: Vec<ChunkSpan>,
}

/// Describes how `body` would be split without uploading anything.
pub fn chunk_plan(body: &str, max_chunk_chars: usize) -> ChunkPlan {
    let chunks = split_into_chunks(body, max_chunk_chars)
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| ChunkSpan {
            index,
            chars: chunk.chars().count(),
            bytes: chunk.len(),
        })
        .collect::<Vec<_>>();

    ChunkPlan {
        total_chars: chunks.iter().map(|span| span.chars).sum(),
        total_bytes: body.len(),
        max_chunk_chars: max_chunk_chars.max(1),
        chunks,
    }
}
