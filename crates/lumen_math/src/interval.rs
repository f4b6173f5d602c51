/// A closed scalar range `[min, max]` on one axis.
///
/// The default interval is [`Interval::EMPTY`], which is the identity for
/// [`Interval::union_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the interval.
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if min > max.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f64) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Grow this interval so it also covers `other`.
    pub fn union_with(&mut self, other: &Interval) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
