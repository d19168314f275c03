/// Cosine similarity with f64 accumulation, clamped to [-1, 1].
/// Mismatched lengths or empty vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let (mut dot, mut mag_a, mut mag_b) = (0.0_f64, 0.0_f64, 0.0_f64);

	for (x, y) in a.iter().zip(b.iter()) {
		let (x, y) = (*x as f64, *y as f64);

		dot += x * y;
		mag_a += x * x;
		mag_b += y * y;
	}

	let denom = mag_a.sqrt() * mag_b.sqrt();

	if denom < f64::EPSILON {
		return 0.0;
	}

	(dot / denom).clamp(-1.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identical_vectors_score_one() {
		let v = vec![0.5, 0.5, 0.5];

		assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn orthogonal_vectors_score_zero() {
		assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
	}

	#[test]
	fn mismatched_lengths_score_zero() {
		assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
	}
}
