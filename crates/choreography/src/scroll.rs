use catalog::DomainId;
use foundation::math::clamp01;
use serde::{Deserialize, Serialize};

use crate::error::RangeTableError;

/// Adjacent bounds closer than this are treated as touching.
pub const CONTIGUITY_EPS: f64 = 1e-9;

/// A half-open `[start, end)` slice of page scroll progress.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollRange {
    pub domain: DomainId,
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    pub fn new(domain: DomainId, start: f64, end: f64) -> Self {
        Self { domain, start, end }
    }

    pub fn contains(&self, p: f64) -> bool {
        p >= self.start && p < self.end
    }
}

/// Ordered, contiguous partition of `[0, 1)` into domain ranges.
///
/// Built only through [`RangeTable::new`], so a table in hand is always
/// anchored at 0, gap-free, overlap-free and closed at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    ranges: Vec<ScrollRange>,
}

impl RangeTable {
    pub fn new(mut ranges: Vec<ScrollRange>) -> Result<Self, RangeTableError> {
        if ranges.is_empty() {
            return Err(RangeTableError::Empty);
        }
        for (index, r) in ranges.iter().enumerate() {
            if !r.start.is_finite() || !r.end.is_finite() {
                return Err(RangeTableError::NonFinite { index });
            }
            if r.end <= r.start {
                return Err(RangeTableError::Inverted {
                    index,
                    start: r.start,
                    end: r.end,
                });
            }
        }
        let first = ranges[0].start;
        if first.abs() > CONTIGUITY_EPS {
            return Err(RangeTableError::NotAnchored { start: first });
        }
        for (index, pair) in ranges.windows(2).enumerate() {
            let (end, next_start) = (pair[0].end, pair[1].start);
            if next_start - end > CONTIGUITY_EPS {
                return Err(RangeTableError::Gap {
                    index,
                    end,
                    next_start,
                });
            }
            if end - next_start > CONTIGUITY_EPS {
                return Err(RangeTableError::Overlap {
                    index,
                    end,
                    next_start,
                });
            }
        }
        let last = ranges[ranges.len() - 1].end;
        if (last - 1.0).abs() > CONTIGUITY_EPS {
            return Err(RangeTableError::OpenEnded { end: last });
        }

        // Snap so boundaries compare exactly.
        ranges[0].start = 0.0;
        for i in 1..ranges.len() {
            ranges[i].start = ranges[i - 1].end;
        }
        if let Some(r) = ranges.last_mut() {
            r.end = 1.0;
        }
        Ok(Self { ranges })
    }

    /// The table the site ships with, in page order.
    pub fn site_default() -> Self {
        let bounds = [0.0, 0.15, 0.35, 0.55, 0.75, 1.0];
        let ranges = DomainId::ALL
            .iter()
            .zip(bounds.windows(2))
            .map(|(&domain, w)| ScrollRange::new(domain, w[0], w[1]))
            .collect();
        Self { ranges }
    }

    pub fn ranges(&self) -> &[ScrollRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Domain returned when no range contains the sample.
    pub fn fallback(&self) -> DomainId {
        self.ranges
            .last()
            .map(|r| r.domain)
            .unwrap_or(DomainId::Landing)
    }

    /// Linear scan; progress is clamped to `[0, 1]` first and NaN reads as 0.
    pub fn resolve(&self, progress: f64) -> DomainId {
        let p = clamp01(progress);
        self.ranges
            .iter()
            .find(|r| r.contains(p))
            .map(|r| r.domain)
            .unwrap_or_else(|| self.fallback())
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::site_default()
    }
}

pub fn resolve_domain(progress: f64, table: &RangeTable) -> DomainId {
    table.resolve(progress)
}
