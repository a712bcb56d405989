use std::{fmt::Display, str::FromStr};

use crate::{constants::{WGS84_A, WGS84_F}, Error};

/// Largest |f| for which the 6th-order series keeps the round trip within
/// 1e-7 degrees.
pub const MAX_FLATTENING: f64 = 0.01;

/// Reference ellipsoid, defined by its semi-major axis and flattening. Every
/// projection call takes one, so non-WGS84 grids are projected on their own
/// ellipsoid rather than silently on WGS84.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub(crate) a: f64,
    /// Flattening
    pub(crate) f: f64,
}

#[allow(clippy::unreadable_literal)]
impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid { a: WGS84_A, f: WGS84_F };
    pub const GRS80: Ellipsoid = Ellipsoid { a: 6_378_137.0, f: 1.0 / 298.257222101 };
    pub const WGS72: Ellipsoid = Ellipsoid { a: 6_378_135.0, f: 1.0 / 298.26 };
    pub const INTERNATIONAL_1924: Ellipsoid = Ellipsoid { a: 6_378_388.0, f: 1.0 / 297.0 };
    pub const CLARKE_1866: Ellipsoid = Ellipsoid { a: 6_378_206.4, f: 1.0 / 294.9786982 };
    pub const AIRY_1830: Ellipsoid = Ellipsoid { a: 6_377_563.396, f: 1.0 / 299.3249646 };

    /// Creates an ellipsoid from its semi-major axis `a` (metres) and
    /// flattening `f`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEllipsoid`] if `a` is not a positive finite
    /// number or `|f|` is not finite or exceeds [`MAX_FLATTENING`].
    ///
    /// # Usage
    ///
    /// ```
    /// use utmconv::Ellipsoid;
    ///
    /// let grs80 = Ellipsoid::new(6_378_137.0, 1.0 / 298.257222101).unwrap();
    /// assert_eq!(grs80, Ellipsoid::GRS80);
    ///
    /// assert!(Ellipsoid::new(-1.0, 0.003).is_err());
    /// assert!(Ellipsoid::new(6_378_137.0, 0.01).is_ok());
    /// assert!(Ellipsoid::new(6_378_137.0, 0.3).is_err());
    /// ```
    pub fn new(a: f64, f: f64) -> Result<Ellipsoid, Error> {
        if !(a.is_finite() && a > 0.) {
            return Err(Error::InvalidEllipsoid(format!("Semi-major axis {a} must be a positive number of metres.")));
        }
        if !(f.is_finite() && f.abs() <= MAX_FLATTENING) {
            return Err(Error::InvalidEllipsoid(format!(
                "Flattening {f} outside of valid range [-{MAX_FLATTENING}, {MAX_FLATTENING}]."
            )));
        }

        Ok(Ellipsoid { a, f })
    }

    #[inline]
    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.a * (1. - self.f)
    }

    /// First eccentricity squared, `f(2 - f)`.
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2. - self.f)
    }

    /// Third flattening, `f / (2 - f)`. The transverse Mercator series are
    /// expanded in this quantity.
    pub fn third_flattening(&self) -> f64 {
        self.f / (2. - self.f)
    }

    /// Signed eccentricity: negative for a prolate ellipsoid.
    pub(crate) fn signed_eccentricity(&self) -> f64 {
        self.eccentricity_squared().abs().sqrt().copysign(self.f)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

const NAMED: &[(&str, Ellipsoid)] = &[
    ("WGS84", Ellipsoid::WGS84),
    ("GRS80", Ellipsoid::GRS80),
    ("WGS72", Ellipsoid::WGS72),
    ("INTL", Ellipsoid::INTERNATIONAL_1924),
    ("INTERNATIONAL1924", Ellipsoid::INTERNATIONAL_1924),
    ("CLARKE1866", Ellipsoid::CLARKE_1866),
    ("AIRY1830", Ellipsoid::AIRY_1830),
];

impl FromStr for Ellipsoid {
    type Err = Error;

    /// Looks up a well-known ellipsoid by name. Case, `-`, `_` and spaces are
    /// ignored, so `"wgs-84"` and `"Clarke 1866"` both resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        NAMED
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, ellipsoid)| *ellipsoid)
            .ok_or_else(|| Error::InvalidEllipsoid(format!("Unknown ellipsoid name {s:?}")))
    }
}

impl Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match NAMED.iter().find(|(_, ellipsoid)| ellipsoid == self) {
            Some((name, _)) => write!(f, "{name}"),
            None => write!(f, "a={} 1/f={}", self.a, 1. / self.f),
        }
    }
}
