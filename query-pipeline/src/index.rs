/// A bounded slice of a document's text, the unit of indexing and retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub source_page: u32,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source_page: u32) -> Self {
        Self {
            text: text.into(),
            source_page,
        }
    }
}

/// A retrieved chunk together with its cosine similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

struct IndexEntry {
    embedding: Vec<f32>,
    chunk: Chunk,
}

/// In-memory similarity index over one document's chunks.
///
/// Search is brute-force cosine similarity over all entries; document sizes
/// here (hundreds of chunks) don't warrant an ANN structure. An index is
/// built once at ingestion time and replaced wholesale on the next upload.
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn from_pairs(pairs: Vec<(Vec<f32>, Chunk)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(embedding, chunk)| IndexEntry { embedding, chunk })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the `k` chunks most similar to the query embedding, best first.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with_three_chunks() -> SearchIndex {
        SearchIndex::from_pairs(vec![
            (vec![1.0, 0.0, 0.0], Chunk::new("about tokio runtimes", 1)),
            (vec![0.0, 1.0, 0.0], Chunk::new("about pdf parsing", 2)),
            (vec![0.9, 0.1, 0.0], Chunk::new("more about tokio", 3)),
        ])
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let index = index_with_three_chunks();
        let hits = index.search(&[1.0, 0.0, 0.0], 3);

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.text, "about tokio runtimes");
        assert_eq!(hits[1].chunk.text, "more about tokio");
        assert!(hits[0].score >= hits[1].score);
        assert!(hits[1].score >= hits[2].score);
    }

    #[test]
    fn test_search_truncates_to_k() {
        let index = index_with_three_chunks();
        let hits = index.search(&[1.0, 0.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_empty_index() {
        let index = SearchIndex::from_pairs(vec![]);
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 0.0], 4).is_empty());
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
