//! Structure string → fixed-length feature vector.

/// Length of the vector the network consumes.
pub const FEATURE_LEN: usize = 10;

/// Map each character's code point into [0, 1]; zero-fill or truncate to
/// [`FEATURE_LEN`].
pub fn encode_structure(structure: &str) -> [f32; FEATURE_LEN] {
    let mut features = [0.0f32; FEATURE_LEN];
    for (slot, ch) in features.iter_mut().zip(structure.chars()) {
        *slot = (ch as u32 as f32 / 255.0).min(1.0);
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_zero_filled() {
        let v = encode_structure("ab");
        assert!((v[0] - 97.0 / 255.0).abs() < 1e-6);
        assert!((v[1] - 98.0 / 255.0).abs() < 1e-6);
        assert!(v[2..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_long_input_is_truncated() {
        let v = encode_structure("eniaffac-MOL");
        assert_eq!(v.len(), FEATURE_LEN);
        // 10th character is 'M'
        assert!((v[9] - 77.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_ascii_is_clamped() {
        let v = encode_structure("β");
        assert_eq!(v[0], 1.0);
    }

    #[test]
    fn test_values_stay_in_unit_interval() {
        let v = encode_structure("~~~~zzzz!!ÿ");
        assert!(v.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }
}
