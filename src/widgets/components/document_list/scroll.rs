/// Measures the rendered list.
pub trait ViewportMetrics {
    fn list_height(&self, row_count: usize) -> u32;
}

/// Every row renders at the same height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRowHeight(pub u32);

impl ViewportMetrics for FixedRowHeight {
    fn list_height(&self, row_count: usize) -> u32 {
        let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
        self.0.saturating_mul(rows)
    }
}

/// Decides when a scroll position is close enough to the end of the list
/// to ask for the next page.
///
/// The distance from the end is the list height at first measurement and
/// is not recomputed when the list grows or the viewport resizes. A
/// zero-height first measurement is retaken on the next scroll.
#[derive(Debug, Clone, Default)]
pub struct ScrollTrigger {
    fixed: Option<u32>,
    measured: Option<u32>,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_threshold(threshold: u32) -> Self {
        Self {
            fixed: Some(threshold),
            measured: None,
        }
    }

    pub fn threshold(&self) -> Option<u32> {
        self.fixed.or(self.measured)
    }

    pub fn is_past_threshold(&mut self, scroll_offset: u32, list_height: u32) -> bool {
        let threshold = self.threshold_for(list_height);
        let past = i64::from(scroll_offset) > i64::from(list_height) - i64::from(threshold);
        tracing::trace!(scroll_offset, list_height, threshold, past, "scroll measured");
        past
    }

    pub fn should_fetch(
        &mut self,
        scroll_offset: u32,
        metrics: &impl ViewportMetrics,
        row_count: usize,
    ) -> bool {
        self.is_past_threshold(scroll_offset, metrics.list_height(row_count))
    }

    fn threshold_for(&mut self, list_height: u32) -> u32 {
        if let Some(fixed) = self.fixed {
            return fixed;
        }
        match self.measured {
            Some(measured) if measured > 0 => measured,
            _ => {
                self.measured = Some(list_height);
                list_height
            }
        }
    }
}
