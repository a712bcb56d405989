//! Element-wise conversion of index-aligned coordinate sequences.
//!
//! Every element goes through the same per-point code as the scalar functions
//! in [`crate::utm`], so a length-1 batch is bit-identical to a scalar call.
//! Inputs are validated in full before any projection work starts; a single
//! bad element fails the whole call. Elements are converted in parallel and
//! collected back in input order.

use rayon::prelude::*;
use tracing::debug;

use crate::{
    latlon::LatLon,
    projections::transverse_mercator::utm_projector,
    utm::{check_coords, check_latlon, forward_point, inverse_point},
    zone::{ForcedZone, UtmZone},
    Ellipsoid, Error,
};

/// Output of [`forward_batch`], index-aligned with its input.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForwardBatch {
    pub zones: Vec<UtmZone>,
    pub eastings: Vec<f64>,
    pub northings: Vec<f64>,
}

impl ForwardBatch {
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Textual zone identifiers, e.g. `["30U", "32U"]`.
    pub fn zone_ids(&self) -> Vec<String> {
        self.zones.iter().map(ToString::to_string).collect()
    }
}

/// Output of [`inverse_batch`], index-aligned with its input.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InverseBatch {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl InverseBatch {
    pub fn len(&self) -> usize {
        self.lats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lats.is_empty()
    }
}

/// Zones for an inverse batch: one zone shared by every element, or one per
/// element.
#[derive(Clone, Debug, PartialEq)]
pub enum ZoneArg<'a> {
    Shared(UtmZone),
    PerElement(&'a [UtmZone]),
}

impl ZoneArg<'_> {
    /// Parses a single zone id shared by every element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] if the zone id is malformed.
    pub fn parse_shared(zone: &str) -> Result<ZoneArg<'static>, Error> {
        UtmZone::parse_str(zone).map(ZoneArg::Shared)
    }

    /// Parses one zone id per element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] if any zone id is malformed.
    pub fn parse_each<S: AsRef<str>>(zones: &[S]) -> Result<Vec<UtmZone>, Error> {
        zones
            .iter()
            .map(|zone| UtmZone::parse_str(zone.as_ref()))
            .collect()
    }

    fn get(&self, index: usize) -> &UtmZone {
        match self {
            ZoneArg::Shared(zone) => zone,
            ZoneArg::PerElement(zones) => &zones[index],
        }
    }
}

impl From<UtmZone> for ZoneArg<'_> {
    fn from(zone: UtmZone) -> Self {
        ZoneArg::Shared(zone)
    }
}

impl<'a> From<&'a [UtmZone]> for ZoneArg<'a> {
    fn from(zones: &'a [UtmZone]) -> Self {
        ZoneArg::PerElement(zones)
    }
}

impl<'a> From<&'a Vec<UtmZone>> for ZoneArg<'a> {
    fn from(zones: &'a Vec<UtmZone>) -> Self {
        ZoneArg::PerElement(zones.as_slice())
    }
}

fn check_lengths(context: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::MismatchedLength { context, expected, found })
    }
}

/// Converts index-aligned latitudes and longitudes to UTM. With
/// `forced_zone`, every point is projected into that zone (parsed once; a bare
/// zone number takes each point's hemisphere from its latitude); otherwise
/// each point goes into its natural zone.
///
/// # Errors
///
/// Returns [`Error::MismatchedLength`] if `lats` and `lons` differ in length,
/// [`Error::InvalidZone`] for a malformed forced zone, and
/// [`Error::InvalidCoord`] / [`Error::LatitudeOutOfRange`] if any point is
/// invalid. Nothing is projected unless every input is valid.
///
/// # Usage
///
/// ```
/// use utmconv::{batch::forward_batch, Ellipsoid, Error};
///
/// let out = forward_batch(&[50.0, 55.0], &[-5.0, 10.0], None, &Ellipsoid::WGS84).unwrap();
/// assert_eq!(out.zone_ids(), vec!["30U", "32U"]);
///
/// let err = forward_batch(&[50.0, 55.0, 60.0], &[-5.0, -20.0], None, &Ellipsoid::WGS84).unwrap_err();
/// assert!(matches!(err, Error::MismatchedLength { expected: 3, found: 2, .. }));
/// ```
pub fn forward_batch(
    lats: &[f64],
    lons: &[f64],
    forced_zone: Option<&str>,
    ellipsoid: &Ellipsoid,
) -> Result<ForwardBatch, Error> {
    check_lengths("longitudes vs latitudes", lats.len(), lons.len())?;

    let forced = forced_zone.map(ForcedZone::parse_str).transpose()?;
    debug!(count = lats.len(), forced_zone, %ellipsoid, "forward batch");

    lats
        .iter()
        .zip(lons)
        .try_for_each(|(&lat, &lon)| check_latlon(lat, lon))?;

    let tm = utm_projector(ellipsoid);
    let coords = lats
        .par_iter()
        .zip(lons.par_iter())
        .map(|(&lat, &lon)| forward_point(&tm, lat, lon, forced.as_ref()))
        .collect::<Result<Vec<_>, Error>>()?;

    let mut out = ForwardBatch {
        zones: Vec::with_capacity(coords.len()),
        eastings: Vec::with_capacity(coords.len()),
        northings: Vec::with_capacity(coords.len()),
    };
    for coord in coords {
        out.zones.push(coord.zone);
        out.eastings.push(coord.easting);
        out.northings.push(coord.northing);
    }

    Ok(out)
}

/// Converts index-aligned eastings and northings back to lat/lon, in a shared
/// zone or one zone per element.
///
/// # Errors
///
/// Returns [`Error::MismatchedLength`] if `eastings` and `northings` differ in
/// length, or if per-element `zones` don't match them, and
/// [`Error::InvalidUtmCoords`] if any easting or northing is not finite or
/// any easting is too far from its zone's central meridian.
///
/// # Usage
///
/// ```
/// use utmconv::{batch::{inverse_batch, ZoneArg}, Ellipsoid};
///
/// let zones = ZoneArg::parse_shared("30U").unwrap();
/// let out = inverse_batch(&[356670.876], &[5540547.370], zones, &Ellipsoid::WGS84).unwrap();
///
/// assert!((out.lats[0] - 50.0).abs() < 1e-6);
/// assert!((out.lons[0] - -5.0).abs() < 1e-6);
/// ```
pub fn inverse_batch<'a, Z>(
    eastings: &[f64],
    northings: &[f64],
    zones: Z,
    ellipsoid: &Ellipsoid,
) -> Result<InverseBatch, Error>
where
    Z: Into<ZoneArg<'a>>,
{
    let zones = zones.into();

    check_lengths("northings vs eastings", eastings.len(), northings.len())?;
    if let ZoneArg::PerElement(per_element) = &zones {
        check_lengths("zones vs eastings", eastings.len(), per_element.len())?;
    }
    debug!(count = eastings.len(), %ellipsoid, "inverse batch");

    eastings
        .iter()
        .zip(northings)
        .try_for_each(|(&easting, &northing)| check_coords(easting, northing))?;

    let tm = utm_projector(ellipsoid);
    let points = eastings
        .par_iter()
        .zip(northings.par_iter())
        .enumerate()
        .map(|(i, (&easting, &northing))| inverse_point(&tm, easting, northing, zones.get(i)))
        .collect::<Result<Vec<LatLon>, Error>>()?;

    Ok(InverseBatch {
        lats: points.iter().map(LatLon::latitude).collect(),
        lons: points.iter().map(LatLon::longitude).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batches() {
        let out = forward_batch(&[], &[], None, &Ellipsoid::WGS84).unwrap();
        assert!(out.is_empty());

        let zones: Vec<UtmZone> = Vec::new();
        let out = inverse_batch(&[], &[], &zones, &Ellipsoid::WGS84).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn forward_length_mismatch() {
        let err = forward_batch(&[50., 55., 60.], &[-5., -20.], None, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { expected: 3, found: 2, .. }));
    }

    #[test]
    fn length_checked_before_zone() {
        let err = forward_batch(&[50.], &[], Some("99Z"), &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { .. }));
    }

    #[test]
    fn inverse_length_mismatch() {
        let zone = UtmZone::parse_str("30U").unwrap();
        let err = inverse_batch(&[1., 2.], &[1.], zone, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { expected: 2, found: 1, .. }));

        let zones = vec![zone];
        let err = inverse_batch(&[1., 2.], &[1., 2.], &zones, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::MismatchedLength { context: "zones vs eastings", expected: 2, found: 1 }));
    }

    #[test]
    fn one_bad_element_fails_the_batch() {
        let err = forward_batch(&[50., 88., 10.], &[-5., 0., 10.], None, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::LatitudeOutOfRange(lat) if lat == 88.));

        let err = forward_batch(&[50., 10.], &[-5., 200.], None, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::InvalidCoord(_)));

        let zone = UtmZone::parse_str("30U").unwrap();
        let err = inverse_batch(&[1., f64::NAN], &[1., 2.], zone, &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::InvalidUtmCoords(_)));
    }

    #[test]
    fn per_point_zones_and_forced_zone() {
        let lats = [50., -33.8688, 60.];
        let lons = [-5., 151.2093, 5.];

        let natural = forward_batch(&lats, &lons, None, &Ellipsoid::WGS84).unwrap();
        assert_eq!(natural.zone_ids(), vec!["30U", "56H", "32V"]);

        let forced = forward_batch(&lats, &lons, Some("31"), &Ellipsoid::WGS84).unwrap();
        assert_eq!(forced.zone_ids(), vec!["31n", "31s", "31n"]);

        let err = forward_batch(&lats, &lons, Some("99Z"), &Ellipsoid::WGS84).unwrap_err();
        assert!(matches!(err, Error::InvalidZone(_)));
    }

    #[test]
    fn parse_each_zone() {
        let zones = ZoneArg::parse_each(&["30U", "56H"]).unwrap();
        assert_eq!(zones.len(), 2);
        assert!(matches!(ZoneArg::parse_each(&["30U", "30"]), Err(Error::InvalidZone(_))));
        assert!(matches!(ZoneArg::parse_shared("61U"), Err(Error::InvalidZone(_))));
    }
}
