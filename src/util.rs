pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Apply a signed step to `value` and keep it inside `min..=max`
pub fn step_clamped(value: u32, delta: i64, min: u32, max: u32) -> u32 {
    (value as i64 + delta).clamp(min as i64, max as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[30000., 40000.]), Some(35000.0));
        assert_eq!(mean(&[15., 7., 55., 12., 4.]), Some(18.6));
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_step_clamped() {
        assert_eq!(step_clamped(10, 5, 0, 100), 15);
        assert_eq!(step_clamped(3, -5, 0, 100), 0);
        assert_eq!(step_clamped(1, 1, 1, 2), 2);
        assert_eq!(step_clamped(2, 1, 1, 2), 2);
    }
}
