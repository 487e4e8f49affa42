/// Closed parametric range `[min, max]` along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
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

    #[inline]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    #[inline]
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within `[min, max]`.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within `(min, max)`.
    #[inline]
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    #[inline]
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Same range with `max` lowered to `t`.
    #[inline]
    pub fn with_max(&self, t: f64) -> Interval {
        Interval::new(self.min, t)
    }

    /// Grows the interval by `delta` on each side.
    pub fn expand(&self, delta: f64) -> Interval {
        Interval::new(self.min - delta, self.max + delta)
    }
}
