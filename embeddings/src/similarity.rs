//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;

use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors, or either vector has zero magnitude
/// - -1.0 means opposite vectors
///
/// Both vectors are normalized here rather than assumed to be unit length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (dot, norm_sq_a, norm_sq_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_sq_a == 0.0 || norm_sq_b == 0.0 {
        return Ok(0.0);
    }

    let score = dot / (norm_sq_a.sqrt() * norm_sq_b.sqrt());
    if !score.is_finite() {
        return Ok(0.0);
    }

    // Rounding can push the ratio a hair past the [-1, 1] bounds.
    Ok(score.clamp(-1.0, 1.0))
}

/// Euclidean norm of a vector.
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize an embedding to unit length. Zero vectors are left untouched.
pub fn normalize(embedding: &mut [f32]) {
    let magnitude = magnitude(embedding);
    if magnitude > 0.0 {
        for x in embedding.iter_mut() {
            *x /= magnitude;
        }
    }
}

/// Score every candidate against `query` and return the `k` best at or above
/// `min_score`, highest first. Equal scores keep their input order.
pub fn top_k<'a, T>(
    query: &[f32],
    candidates: impl IntoIterator<Item = (T, &'a [f32])>,
    k: usize,
    min_score: f32,
) -> Result<Vec<(T, f32)>> {
    let mut scores: Vec<(OrderedFloat<f32>, T)> = Vec::new();

    for (item, embedding) in candidates {
        let score = cosine_similarity(query, embedding)?;
        if score >= min_score {
            scores.push((OrderedFloat(score), item));
        }
    }

    // Stable sort, descending
    scores.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(scores
        .into_iter()
        .take(k)
        .map(|(score, item)| (item, score.0))
        .collect())
}
