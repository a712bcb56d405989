#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

use thiserror::Error;

pub mod batch;
pub mod ellipsoid;
pub mod latlon;
pub mod utm;
pub mod zone;

pub use batch::{forward_batch, inverse_batch, ForwardBatch, InverseBatch, ZoneArg};
pub use ellipsoid::Ellipsoid;
pub use latlon::LatLon;
pub use projections::transverse_mercator::Distortion;
pub use utm::UtmCoordinate;
pub use zone::{ForcedZone, Hemisphere, UtmZone, ZoneBand};

pub(crate) mod projections {
    pub mod transverse_mercator;
}

pub(crate) mod constants;
pub(crate) mod utility;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
    #[error("UTM zone is invalid: {0}")]
    InvalidZone(String),
    #[error("Latitude {0} outside of the UTM range [-80, 84]")]
    LatitudeOutOfRange(f64),
    #[error("UTM coords are invalid: {0}")]
    InvalidUtmCoords(String),
    #[error("Ellipsoid is invalid: {0}")]
    InvalidEllipsoid(String),
    #[error("Mismatched lengths ({context}): expected {expected}, found {found}")]
    MismatchedLength {
        context: &'static str,
        expected: usize,
        found: usize,
    },
}

pub trait ParseCoord {
    /// Parses a value from its textual form.
    ///
    /// # Errors
    ///
    /// Returns the [`Error`] variant matching the value being parsed when the
    /// text is malformed or out of range.
    fn parse_coord(value: &str) -> Result<Self, Error>
    where Self: Sized;
}

/// Parses any [`ParseCoord`] value.
///
/// # Errors
///
/// See [`ParseCoord::parse_coord`].
///
/// # Usage
///
/// ```
/// use utmconv::{LatLon, UtmCoordinate, UtmZone};
///
/// let point: LatLon = utmconv::from_str("50 -5").unwrap();
/// let zone: UtmZone = utmconv::from_str("30U").unwrap();
/// let coord: UtmCoordinate = utmconv::from_str("30U 356670.876 5540547.37").unwrap();
///
/// assert_eq!(point.to_utm().unwrap().zone(), zone);
/// assert!((coord.easting() - 356670.876).abs() < 1e-9);
/// ```
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }

    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T,
    {
        if *self { r#true() } else { r#false() }
    }
}
