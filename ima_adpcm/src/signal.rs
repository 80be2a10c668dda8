/// Scales a 16-bit sample into float range. The divisor is `i16::MAX`, so `i16::MIN` lands just below -1.0.
#[inline]
pub fn int16_to_float(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}

/// Reassembles per-channel buffers into one interleaved frame sequence.
///
/// Channels shorter than the longest one are padded with silence.
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    let mut result = Vec::with_capacity(frames * channels.len());

    for frame in 0..frames {
        result.extend(channels.iter().map(|x| x.get(frame).copied().unwrap_or(0.0)));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int16_to_float_bounds() {
        assert_eq!(int16_to_float(0), 0.0);
        assert_eq!(int16_to_float(i16::MAX), 1.0);
        assert!(int16_to_float(i16::MIN) < -1.0);
    }

    #[test]
    fn test_interleave() {
        let left = vec![1.0, 2.0, 3.0];
        let right = vec![-1.0, -2.0];

        assert_eq!(interleave(&[left, right]), [1.0, -1.0, 2.0, -2.0, 3.0, 0.0]);
        assert!(interleave(&[]).is_empty());
    }
}
