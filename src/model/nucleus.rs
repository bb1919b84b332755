//! Nucleus markers and their in/out-of-fiber polarity.

use serde::{Deserialize, Serialize};

/// Whether a nucleus lies inside or outside the fiber regions of its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Enclosed by fiber tissue (a "positive" nucleus).
    In,
    /// Outside every fiber region.
    Out,
}

impl Polarity {
    /// Get the display name for this polarity.
    pub fn name(&self) -> &'static str {
        match self {
            Polarity::In => "In",
            Polarity::Out => "Out",
        }
    }

    /// The opposite polarity.
    pub fn toggled(self) -> Self {
        match self {
            Polarity::In => Polarity::Out,
            Polarity::Out => Polarity::In,
        }
    }

    /// Whether this counts towards the positive (in-fiber) tally.
    pub fn is_positive(self) -> bool {
        matches!(self, Polarity::In)
    }
}

/// A single nucleus marker: sub-pixel centroid plus polarity.
///
/// Nuclei have no persistent identity; two markers are the same nucleus
/// exactly when they compare equal. Removal and toggling match by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nucleus {
    /// Centroid X coordinate in image pixels.
    pub x: f64,
    /// Centroid Y coordinate in image pixels.
    pub y: f64,
    /// In/out-of-fiber classification.
    pub polarity: Polarity,
}

impl Nucleus {
    /// Create a new nucleus marker.
    pub fn new(x: f64, y: f64, polarity: Polarity) -> Self {
        Self { x, y, polarity }
    }

    /// Create an in-fiber nucleus.
    pub fn inside(x: f64, y: f64) -> Self {
        Self::new(x, y, Polarity::In)
    }

    /// Create an out-of-fiber nucleus.
    pub fn outside(x: f64, y: f64) -> Self {
        Self::new(x, y, Polarity::Out)
    }

    /// Flip the polarity in place.
    pub fn toggle(&mut self) {
        self.polarity = self.polarity.toggled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_toggle() {
        assert_eq!(Polarity::In.toggled(), Polarity::Out);
        assert_eq!(Polarity::Out.toggled(), Polarity::In);

        let mut nucleus = Nucleus::inside(10.0, 20.0);
        nucleus.toggle();
        assert_eq!(nucleus.polarity, Polarity::Out);
        nucleus.toggle();
        assert_eq!(nucleus.polarity, Polarity::In);
    }

    #[test]
    fn test_value_identity() {
        let a = Nucleus::inside(1.5, 2.5);
        let b = Nucleus::new(1.5, 2.5, Polarity::In);
        assert_eq!(a, b);
        assert_ne!(a, Nucleus::outside(1.5, 2.5));
    }

    #[test]
    fn test_serde_roundtrip() {
        let nucleus = Nucleus::outside(3.25, 7.75);
        let json = serde_json::to_string(&nucleus).unwrap();
        assert!(json.contains("\"out\""));
        let back: Nucleus = serde_json::from_str(&json).unwrap();
        assert_eq!(nucleus, back);
    }
}
