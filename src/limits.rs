use crate::error::DecodeError;

/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for any single buffer: engine workspace, output
    /// pixels, and the engine's own chunk allocations.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), DecodeError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(DecodeError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(DecodeError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(DecodeError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), DecodeError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(DecodeError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// Byte budget for the engine's internal allocations.
    pub(crate) fn engine_bytes(&self) -> Option<usize> {
        self.max_memory_bytes
            .map(|b| usize::try_from(b).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_everything() {
        let limits = Limits::default();
        assert!(limits.check(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
        assert_eq!(limits.engine_bytes(), None);
    }

    #[test]
    fn each_dimension_limit_applies() {
        let limits = Limits {
            max_width: Some(10),
            max_height: Some(20),
            max_pixels: Some(150),
            ..Default::default()
        };
        assert!(limits.check(10, 15).is_ok());
        assert!(matches!(
            limits.check(11, 1),
            Err(DecodeError::LimitExceeded(_))
        ));
        assert!(matches!(
            limits.check(1, 21),
            Err(DecodeError::LimitExceeded(_))
        ));
        assert!(matches!(
            limits.check(10, 16),
            Err(DecodeError::LimitExceeded(_))
        ));
    }

    #[test]
    fn memory_limit_applies() {
        let limits = Limits {
            max_memory_bytes: Some(64),
            ..Default::default()
        };
        assert!(limits.check_memory(64).is_ok());
        assert!(limits.check_memory(65).is_err());
        assert_eq!(limits.engine_bytes(), Some(64));
    }
}
