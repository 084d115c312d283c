// Cosine similarity over name feature vectors.
// Sums are accumulated left to right in f64 so scores are reproducible across runs.

/// Added to the norm product so all-zero vectors score 0 instead of NaN
pub const EPSILON: f64 = 1e-8;

/// Dot product; 0 when lengths differ
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// Euclidean length
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc + x * x).sqrt()
}

/// `dot(a, b) / (|a| * |b| + EPSILON)`, or 0 for vectors of different length
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot_product = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    dot_product / (norm_a.sqrt() * norm_b.sqrt() + EPSILON)
}
