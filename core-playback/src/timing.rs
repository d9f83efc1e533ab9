//! Byte offset to millisecond conversion.
//!
//! Sources are mono 16-bit, so a byte offset maps to time through the sample
//! rate alone. The factor is computed once in floating point; queries are a
//! single 64-bit multiply and shift so they stay cheap enough to call from the
//! tick path.

/// Fixed-point converter from raw byte counts to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteTiming {
    /// Milliseconds per byte, scaled by 2^32.
    factor: u32,
}

impl ByteTiming {
    /// Build a converter for the given sample rate in Hz.
    ///
    /// Rates rejected by [`ByteTiming::supports`] saturate the factor.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            factor: scaled_factor(sample_rate) as u32,
        }
    }

    /// Whether the factor for `sample_rate` fits in 32 bits.
    ///
    /// Holds for every rate above roughly 500 Hz.
    pub fn supports(sample_rate: f64) -> bool {
        sample_rate.is_finite()
            && sample_rate > 0.0
            && scaled_factor(sample_rate) <= u32::MAX as f64
    }

    /// The scaled milliseconds-per-byte factor.
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Convert a byte count to whole milliseconds, rounding down.
    ///
    /// Counts beyond `u32::MAX` saturate.
    pub fn millis(&self, bytes: u64) -> u32 {
        let bytes = bytes.min(u32::MAX as u64);
        ((bytes * self.factor as u64) >> 32) as u32
    }
}

fn scaled_factor(sample_rate: f64) -> f64 {
    4_294_967_296_000.0 / sample_rate / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;

    #[test]
    fn test_factor_at_cd_rate() {
        assert_eq!(ByteTiming::new(44_100.0).factor(), 48_695_774);
    }

    #[test]
    fn test_factor_for_teensy3_rate() {
        let timing = ByteTiming::new(PlayerConfig::teensy3().sample_rate);
        assert_eq!(timing.factor(), 48_676_296);
    }

    #[test]
    fn test_millis_rounds_down() {
        let timing = ByteTiming::new(44_100.0);

        assert_eq!(timing.millis(0), 0);
        assert_eq!(timing.millis(1), 0);
        assert_eq!(timing.millis(256), 2);
        assert_eq!(timing.millis(512), 5);
        assert_eq!(timing.millis(768), 8);
        assert_eq!(timing.millis(882), 9);
        // One second of audio lands just under 1000
        assert_eq!(timing.millis(88_200), 999);
        assert_eq!(timing.millis(882_000), 9_999);
    }

    #[test]
    fn test_millis_is_monotonic() {
        let timing = ByteTiming::new(44_100.0);
        let mut last = 0;
        for bytes in (0..200_000u64).step_by(97) {
            let ms = timing.millis(bytes);
            assert!(ms >= last);
            last = ms;
        }
    }

    #[test]
    fn test_supported_rates() {
        assert!(ByteTiming::supports(44_100.0));
        assert!(ByteTiming::supports(501.0));
        assert!(!ByteTiming::supports(500.0));
        assert!(!ByteTiming::supports(400.0));
        assert!(!ByteTiming::supports(0.0));
        assert!(!ByteTiming::supports(-44_100.0));
        assert!(!ByteTiming::supports(f64::NAN));

        // 800 bytes is one second at 400 Hz, which the factor cannot express
        assert_ne!(ByteTiming::new(400.0).millis(800), 1_000);
        assert_eq!(ByteTiming::new(1_000.0).millis(2_000), 1_000);
    }

    #[test]
    fn test_millis_saturates_large_counts() {
        let timing = ByteTiming::new(44_100.0);
        let max = timing.millis(u32::MAX as u64);
        assert_eq!(timing.millis(u64::MAX), max);
        assert_eq!(timing.millis(u32::MAX as u64 + 1_000), max);
    }
}
