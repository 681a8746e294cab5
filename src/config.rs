// src/config.rs
//! Construction-time configuration for hybrid buffers

/// Smallest accepted heap growth factor
pub const MIN_GROWTH_FACTOR: usize = 2;

/// How strictly element accessors validate indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// `get`/`set` trap when `index >= len`
    #[default]
    Checked,
    /// `get`/`set` skip the logical-length check.
    ///
    /// The active storage region still enforces its own physical bounds, so a
    /// bad index yields a stale element or a panic, never undefined behaviour.
    /// Use the `*_unchecked` methods to drop bounds checks entirely.
    Unchecked,
}

/// Configuration for buffer behavior.
///
/// Fixed when the buffer is built; the inline capacity itself is the const
/// generic `N` of [`HybridBuffer`](crate::HybridBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Index validation strictness
    pub check_mode: CheckMode,
    /// Multiplier applied to capacity on every forced reallocation
    pub growth_factor: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            check_mode: CheckMode::Checked,
            growth_factor: MIN_GROWTH_FACTOR,
        }
    }
}

impl BufferConfig {
    /// Checked indexing with 2x growth (the default).
    pub fn checked() -> Self {
        Self::default()
    }

    /// Unchecked indexing with 2x growth, for hot loops.
    pub fn unchecked() -> Self {
        Self {
            check_mode: CheckMode::Unchecked,
            ..Self::default()
        }
    }

    /// Returns this config with a different growth factor.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is below [`MIN_GROWTH_FACTOR`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::BufferConfig;
    ///
    /// let config = BufferConfig::default().with_growth_factor(4);
    /// assert_eq!(config.growth_factor, 4);
    /// ```
    pub fn with_growth_factor(self, factor: usize) -> Self {
        assert!(
            factor >= MIN_GROWTH_FACTOR,
            "Growth factor {} is below minimum {}",
            factor,
            MIN_GROWTH_FACTOR
        );
        Self {
            growth_factor: factor,
            ..self
        }
    }

    #[inline(always)]
    pub(crate) fn is_checked(&self) -> bool {
        self.check_mode == CheckMode::Checked
    }

    /// Capacity after one forced growth step from `current`, at least `required`.
    #[inline]
    pub(crate) fn grown_capacity(&self, current: usize, required: usize) -> usize {
        current.saturating_mul(self.growth_factor).max(required)
    }
}
