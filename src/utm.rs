use std::{fmt::Display, str::FromStr};

use tracing::debug;

use crate::{
    constants::{UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_MAX_LAT, UTM_MIN_LAT},
    latlon::LatLon,
    projections::transverse_mercator::{utm_projector, Distortion, TransverseMercator},
    zone::{natural_zone, ForcedZone, UtmZone},
    Ellipsoid, Error, ParseCoord, ThisOrThat,
};

/// Representation of a
/// [UTM](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system)
/// point: zone, easting and northing in metres. Eastings carry a 500km false
/// easting; northings carry a 10000km false northing when the zone is southern.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmCoordinate {
    pub(crate) zone: UtmZone,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
}

impl UtmCoordinate {
    /// Internal-only constructor that doesn't check the coordinate
    pub(crate) fn new(zone: UtmZone, easting: f64, northing: f64) -> UtmCoordinate {
        Self {
            zone,
            easting,
            northing,
        }
    }

    /// Tries to create a UTM point from its constituent parts.
    ///
    /// Easting and northing are not range checked beyond being finite: a point
    /// projected into a forced zone can legitimately sit far outside the
    /// nominal 6 degree strip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtmCoords`] if the easting or northing is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use utmconv::{UtmCoordinate, UtmZone};
    ///
    /// let zone = UtmZone::parse_str("18T").unwrap();
    /// let coord = UtmCoordinate::create(zone, 585664.121, 4511315.422).unwrap();
    ///
    /// assert_eq!(coord.zone().number(), 18);
    /// assert!(coord.zone().is_north());
    /// assert!((coord.easting() - 585664.121).abs() < 1e-3);
    /// assert!((coord.northing() - 4511315.422).abs() < 1e-3);
    ///
    /// assert!(UtmCoordinate::create(zone, f64::NAN, 4511315.422).is_err());
    /// ```
    pub fn create(zone: UtmZone, easting: f64, northing: f64) -> Result<UtmCoordinate, Error> {
        check_coords(easting, northing)?;

        Ok(UtmCoordinate::new(zone, easting, northing))
    }

    #[inline]
    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    #[inline]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    #[inline]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Converts from [`LatLon`] to [`UtmCoordinate`] in the point's natural zone
    /// on the WGS84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LatitudeOutOfRange`] if the latitude is outside `[-80, 84]`.
    pub fn from_latlon(value: &LatLon) -> Result<UtmCoordinate, Error> {
        Self::from_latlon_on(value, &Ellipsoid::WGS84)
    }

    /// Converts from [`LatLon`] to [`UtmCoordinate`] in the point's natural zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LatitudeOutOfRange`] if the latitude is outside `[-80, 84]`.
    pub fn from_latlon_on(value: &LatLon, ellipsoid: &Ellipsoid) -> Result<UtmCoordinate, Error> {
        forward_point(&utm_projector(ellipsoid), value.latitude, value.longitude, None)
    }

    /// Converts from [`UtmCoordinate`] to [`LatLon`] on the WGS84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtmCoords`] if the easting or northing is not
    /// finite, or the easting is too far from the zone's central meridian.
    ///
    /// # Usage
    ///
    /// ```
    /// use utmconv::UtmCoordinate;
    ///
    /// let coord: UtmCoordinate = "18T 585664.121 4511315.422".parse().unwrap();
    /// let converted = coord.to_latlon().unwrap();
    ///
    /// // Check if the converted coordinate is accurate to 6 decimals (same as reference)
    /// assert!((converted.latitude() - 40.748333).abs() < 1e-6);
    /// assert!((converted.longitude() - -73.985278).abs() < 1e-6);
    /// ```
    pub fn to_latlon(&self) -> Result<LatLon, Error> {
        self.to_latlon_on(&Ellipsoid::WGS84)
    }

    /// Converts from [`UtmCoordinate`] to [`LatLon`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUtmCoords`] if the easting or northing is not
    /// finite, or the easting is too far from the zone's central meridian.
    pub fn to_latlon_on(&self, ellipsoid: &Ellipsoid) -> Result<LatLon, Error> {
        inverse_point(&utm_projector(ellipsoid), self.easting, self.northing, &self.zone)
    }
}

/// Projects a point into `zone` and returns `(easting, northing)` in metres.
/// The zone's hemisphere decides the false northing.
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] if lat/lon are outside `[-90, 90]` x
/// `[-180, 180]` (or not finite) or the point lies too far from the zone's
/// central meridian (about 4000 km), [`Error::LatitudeOutOfRange`] if the
/// latitude is outside UTM's `[-80, 84]`.
///
/// # Usage
///
/// ```
/// use utmconv::{utm::project, zone::natural_zone, Ellipsoid};
///
/// let zone = natural_zone(50.0, -5.0);
/// let (easting, northing) = project(50.0, -5.0, &zone, &Ellipsoid::WGS84).unwrap();
///
/// assert_eq!(zone.to_string(), "30U");
/// assert!((easting - 356670.876).abs() < 1e-3);
/// assert!((northing - 5540547.370).abs() < 1e-3);
/// ```
pub fn project(lat: f64, lon: f64, zone: &UtmZone, ellipsoid: &Ellipsoid) -> Result<(f64, f64), Error> {
    project_with_scale(lat, lon, zone, ellipsoid).map(|(easting, northing, _)| (easting, northing))
}

/// Same as [`project`], also returning the meridian convergence and point
/// scale factor at the point.
///
/// # Errors
///
/// See [`project`].
pub fn project_with_scale(lat: f64, lon: f64, zone: &UtmZone, ellipsoid: &Ellipsoid) -> Result<(f64, f64, Distortion), Error> {
    project_point(&utm_projector(ellipsoid), lat, lon, zone)
}

/// Inverse of [`project`]: recovers `(lat, lon)` in degrees from an easting
/// and northing in `zone`.
///
/// # Errors
///
/// Returns [`Error::InvalidUtmCoords`] if the easting or northing is not
/// finite, or the easting is too far from the zone's central meridian.
///
/// # Usage
///
/// ```
/// use utmconv::{utm::unproject, UtmZone, Ellipsoid};
///
/// let zone = UtmZone::parse_str("56H").unwrap();
/// let (lat, lon) = unproject(334368.634, 6250948.345, &zone, &Ellipsoid::WGS84).unwrap();
///
/// assert!((lat - -33.8688).abs() < 1e-7);
/// assert!((lon - 151.2093).abs() < 1e-7);
/// ```
pub fn unproject(easting: f64, northing: f64, zone: &UtmZone, ellipsoid: &Ellipsoid) -> Result<(f64, f64), Error> {
    unproject_with_scale(easting, northing, zone, ellipsoid).map(|(lat, lon, _)| (lat, lon))
}

/// Same as [`unproject`], also returning the meridian convergence and point
/// scale factor at the point.
///
/// # Errors
///
/// See [`unproject`].
pub fn unproject_with_scale(easting: f64, northing: f64, zone: &UtmZone, ellipsoid: &Ellipsoid) -> Result<(f64, f64, Distortion), Error> {
    unproject_point(&utm_projector(ellipsoid), easting, northing, zone)
}

/// Converts one point to UTM, into its natural zone or the forced one.
/// Shares its code path with [`crate::batch::forward_batch`], so a length-1
/// batch gives bit-identical results.
///
/// # Errors
///
/// Returns [`Error::InvalidZone`] for a malformed `forced_zone`, plus the
/// errors of [`project`].
///
/// # Usage
///
/// ```
/// use utmconv::{utm, Ellipsoid};
///
/// let coord = utm::forward(55.0, 10.0, Some("30N"), &Ellipsoid::WGS84).unwrap();
/// assert_eq!(coord.zone().to_string(), "30N");
/// // Far east of zone 30's strip
/// assert!(coord.easting() > 1_000_000.0);
/// ```
pub fn forward(lat: f64, lon: f64, forced_zone: Option<&str>, ellipsoid: &Ellipsoid) -> Result<UtmCoordinate, Error> {
    let forced = forced_zone.map(ForcedZone::parse_str).transpose()?;

    forward_point(&utm_projector(ellipsoid), lat, lon, forced.as_ref())
}

/// Converts one UTM point back to lat/lon. Shares its code path with
/// [`crate::batch::inverse_batch`].
///
/// # Errors
///
/// Returns [`Error::InvalidUtmCoords`] if the easting or northing is not
/// finite, or the easting is too far from the zone's central meridian.
pub fn inverse(easting: f64, northing: f64, zone: &UtmZone, ellipsoid: &Ellipsoid) -> Result<LatLon, Error> {
    inverse_point(&utm_projector(ellipsoid), easting, northing, zone)
}

/// Checks that a point can be projected: inside the lat/lon domain and
/// within UTM's latitude limits.
pub(crate) fn check_latlon(lat: f64, lon: f64) -> Result<(), Error> {
    LatLon::create(lat, lon)?;

    if !(UTM_MIN_LAT..=UTM_MAX_LAT).contains(&lat) {
        return Err(Error::LatitudeOutOfRange(lat));
    }

    Ok(())
}

pub(crate) fn check_coords(easting: f64, northing: f64) -> Result<(), Error> {
    if !easting.is_finite() {
        return Err(Error::InvalidUtmCoords(format!("Easting {easting} is not a finite number of metres")));
    }
    if !northing.is_finite() {
        return Err(Error::InvalidUtmCoords(format!("Northing {northing} is not a finite number of metres")));
    }

    Ok(())
}

pub(crate) fn forward_point(
    tm: &TransverseMercator,
    lat: f64,
    lon: f64,
    forced: Option<&ForcedZone>,
) -> Result<UtmCoordinate, Error> {
    let zone = forced.map_or_else(|| natural_zone(lat, lon), |forced| forced.bind(lat));
    let (easting, northing, _) = project_point(tm, lat, lon, &zone)?;

    Ok(UtmCoordinate::new(zone, easting, northing))
}

pub(crate) fn inverse_point(
    tm: &TransverseMercator,
    easting: f64,
    northing: f64,
    zone: &UtmZone,
) -> Result<LatLon, Error> {
    let (lat, lon, _) = unproject_point(tm, easting, northing, zone)?;

    Ok(LatLon::new(lat, lon))
}

fn project_point(tm: &TransverseMercator, lat: f64, lon: f64, zone: &UtmZone) -> Result<(f64, f64, Distortion), Error> {
    check_latlon(lat, lon)?;

    if !zone.is_within_strip(lon) {
        debug!(lat, lon, %zone, "point lies outside the zone's strip, accuracy is reduced");
    }

    let (x, y, distortion) = tm
        .forward(zone.central_meridian(), lat, lon)
        .ok_or_else(|| Error::InvalidCoord(format!("Point ({lat}, {lon}) is too far from the central meridian of zone {zone}")))?;

    let easting = x + UTM_FALSE_EASTING;
    let northing = y + zone.is_north().ternary(0., UTM_FALSE_NORTHING_SOUTH);

    Ok((easting, northing, distortion))
}

fn unproject_point(tm: &TransverseMercator, easting: f64, northing: f64, zone: &UtmZone) -> Result<(f64, f64, Distortion), Error> {
    check_coords(easting, northing)?;

    let x = easting - UTM_FALSE_EASTING;
    let y = northing - zone.is_north().ternary(0., UTM_FALSE_NORTHING_SOUTH);

    let (lat, lon, distortion) = tm
        .reverse(zone.central_meridian(), x, y)
        .ok_or_else(|| Error::InvalidUtmCoords(format!("Easting {easting} is too far from the central meridian of zone {zone}")))?;

    if !(lat.is_finite() && lon.is_finite()) {
        return Err(Error::InvalidUtmCoords(format!("Easting {easting}, northing {northing} do not map to a point in zone {zone}")));
    }

    Ok((lat, lon, distortion))
}

impl ParseCoord for UtmCoordinate {
    /// Parses `"<zone> <easting> <northing>"`, e.g. `"30U 356670.876 5540547.37"`.
    fn parse_coord(value: &str) -> Result<UtmCoordinate, Error> {
        let mut pieces = value.split_whitespace();

        let zone = pieces
            .next()
            .ok_or_else(|| Error::InvalidUtmCoords(format!("Missing zone in {value:?}")))
            .and_then(UtmZone::parse_str)?;

        let mut next_value = |name: &str| -> Result<f64, Error> {
            let piece = pieces
                .next()
                .ok_or_else(|| Error::InvalidUtmCoords(format!("Missing {name} in {value:?}")))?;
            piece
                .parse::<f64>()
                .map_err(|_| Error::InvalidUtmCoords(format!("Invalid {name} {piece:?}")))
        };

        let easting = next_value("easting")?;
        let northing = next_value("northing")?;

        if pieces.next().is_some() {
            return Err(Error::InvalidUtmCoords(format!("Trailing characters in {value:?}")));
        }

        UtmCoordinate::create(zone, easting, northing)
    }
}

impl FromStr for UtmCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UtmCoordinate::parse_coord(s)
    }
}

impl Display for UtmCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(
            f,
            "{} {easting} {northing}",
            self.zone,
        )
    }
}
