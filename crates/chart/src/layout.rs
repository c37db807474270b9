use configuration::ChartSettings;

/// The plot area inside the padded surface, and the mapping of bucket indices
/// onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Layout {
    pub fn from_settings(settings: &ChartSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            padding: settings.padding,
        }
    }

    pub fn left(&self) -> f64 {
        self.padding
    }

    pub fn right(&self) -> f64 {
        self.width - self.padding
    }

    pub fn top(&self) -> f64 {
        self.padding
    }

    pub fn bottom(&self) -> f64 {
        self.height - self.padding
    }

    pub fn plot_width(&self) -> f64 {
        (self.right() - self.left()).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.bottom() - self.top()).max(0.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Horizontal position of bucket `index` out of `count` evenly spaced buckets.
    pub fn x_for(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.left() + self.plot_width() / 2.0;
        }
        self.left() + self.plot_width() * index as f64 / (count - 1) as f64
    }

    /// The bucket closest to a pointer position, or `None` outside the plot area.
    pub fn nearest_bucket(&self, x: f64, y: f64, count: usize) -> Option<usize> {
        if count == 0 || !x.is_finite() || !y.is_finite() || !self.contains(x, y) {
            return None;
        }
        if count == 1 {
            return Some(0);
        }
        let step = self.plot_width() / (count - 1) as f64;
        if step <= 0.0 {
            return Some(0);
        }
        let index = ((x - self.left()) / step).round() as usize;
        Some(index.min(count - 1))
    }

    pub fn y_for(&self, value: f64, scale: &ValueScale) -> f64 {
        self.bottom() - scale.normalize(value) * self.plot_height()
    }
}

/// Linear value range mapped onto the plot height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    /// Extent of the finite values, widened when every value is equal.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        if (max - min).abs() < f64::EPSILON {
            let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
            return Some(Self {
                min: min - pad,
                max: max + pad,
            });
        }
        Some(Self { min, max })
    }

    /// Position of `value` in `[0, 1]` across the range.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layout() -> Layout {
        Layout {
            width: 140.0,
            height: 120.0,
            padding: 20.0,
        }
    }

    #[test]
    fn buckets_span_the_plot_width() {
        let l = layout();
        assert_relative_eq!(l.x_for(0, 5), 20.0);
        assert_relative_eq!(l.x_for(4, 5), 120.0);
        assert_relative_eq!(l.x_for(2, 5), 70.0);
        assert_relative_eq!(l.x_for(0, 1), 70.0);
    }

    #[test]
    fn pointer_resolves_to_nearest_bucket() {
        let l = layout();
        assert_eq!(l.nearest_bucket(20.0, 50.0, 5), Some(0));
        assert_eq!(l.nearest_bucket(56.0, 50.0, 5), Some(1));
        assert_eq!(l.nearest_bucket(58.0, 50.0, 5), Some(2));
        assert_eq!(l.nearest_bucket(120.0, 50.0, 5), Some(4));
        assert_eq!(l.nearest_bucket(70.0, 50.0, 1), Some(0));
    }

    #[test]
    fn pointer_outside_plot_resolves_to_nothing() {
        let l = layout();
        assert_eq!(l.nearest_bucket(5.0, 50.0, 5), None);
        assert_eq!(l.nearest_bucket(50.0, 110.0, 5), None);
        assert_eq!(l.nearest_bucket(f64::NAN, 50.0, 5), None);
        assert_eq!(l.nearest_bucket(50.0, 50.0, 0), None);
    }

    #[test]
    fn scale_maps_extent_onto_plot_height() {
        let l = layout();
        let scale = ValueScale::from_values([-10.0, 10.0, f64::NAN]).unwrap();
        assert_relative_eq!(l.y_for(-10.0, &scale), 100.0);
        assert_relative_eq!(l.y_for(10.0, &scale), 20.0);
        assert_relative_eq!(l.y_for(0.0, &scale), 60.0);
    }

    #[test]
    fn flat_extent_is_widened() {
        let scale = ValueScale::from_values([0.0, 0.0]).unwrap();
        assert!(scale.max > scale.min);
        assert!(ValueScale::from_values(Vec::<f64>::new()).is_none());
    }
}
