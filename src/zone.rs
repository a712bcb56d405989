use std::{fmt::Display, str::FromStr};

use tracing::trace;

use crate::{utility::{dms, GeoMath}, Error, ParseCoord, ThisOrThat, constants::UTM_HALF_WIDTH};

pub const MIN_ZONE: u8 = 1;
pub const MAX_ZONE: u8 = 60;

/// Latitude bands, 8 degrees each from 80S, except X which spans 72N to 84N.
pub(crate) const LATBAND: &str = "CDEFGHJKLMNPQRSTUVWX";

/// Irregular zones of southern Norway and Svalbard, as
/// (band index, first integer longitude, last integer longitude, zone).
/// Band index 7 is V (56N to 64N), 9 is X (72N to 84N).
const ZONE_EXCEPTIONS: [(i32, i32, i32, u8); 5] = [
    // Norway
    (7, 3, 5, 32),
    // Svalbard
    (9, 0, 8, 31),
    (9, 9, 20, 33),
    (9, 21, 32, 35),
    (9, 33, 41, 37),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn of_latitude(lat: f64) -> Hemisphere {
        (lat >= 0.).ternary(Hemisphere::North, Hemisphere::South)
    }
}

/// The second half of a zone identifier: either a latitude band letter or a
/// bare hemisphere flag. Both determine which false northing applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneBand {
    Letter(char),
    Hemisphere(Hemisphere),
}

impl ZoneBand {
    pub fn hemisphere(&self) -> Hemisphere {
        match self {
            ZoneBand::Letter(letter) => (*letter >= 'N').ternary(Hemisphere::North, Hemisphere::South),
            ZoneBand::Hemisphere(hemisphere) => *hemisphere,
        }
    }

    fn parse(value: char) -> Option<ZoneBand> {
        match value {
            'n' => Some(ZoneBand::Hemisphere(Hemisphere::North)),
            's' => Some(ZoneBand::Hemisphere(Hemisphere::South)),
            letter if LATBAND.contains(letter) => Some(ZoneBand::Letter(letter)),
            _ => None,
        }
    }
}

impl Display for ZoneBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneBand::Letter(letter) => write!(f, "{letter}"),
            ZoneBand::Hemisphere(hemisphere) => {
                write!(f, "{}", (*hemisphere == Hemisphere::North).ternary('n', 's'))
            }
        }
    }
}

/// A UTM zone: number in `[1, 60]` plus band letter or hemisphere flag.
///
/// Written as `"30U"` when it carries a band letter and `"30n"` / `"30s"`
/// when it only carries a hemisphere.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmZone {
    pub(crate) number: u8,
    pub(crate) band: ZoneBand,
}

impl UtmZone {
    /// Tries to create a zone from its number and band.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] if the number is outside `[1, 60]` or the
    /// band letter is not one of `C..X` (skipping `I` and `O`).
    ///
    /// # Usage
    ///
    /// ```
    /// use utmconv::{UtmZone, ZoneBand, Hemisphere};
    ///
    /// let zone = UtmZone::create(30, ZoneBand::Letter('U')).unwrap();
    /// assert_eq!(zone.central_meridian(), -3.0);
    ///
    /// let zone = UtmZone::create(56, ZoneBand::Hemisphere(Hemisphere::South)).unwrap();
    /// assert_eq!(zone.to_string(), "56s");
    ///
    /// assert!(UtmZone::create(61, ZoneBand::Letter('U')).is_err());
    /// assert!(UtmZone::create(30, ZoneBand::Letter('O')).is_err());
    /// ```
    pub fn create(number: u8, band: ZoneBand) -> Result<UtmZone, Error> {
        if !(MIN_ZONE..=MAX_ZONE).contains(&number) {
            return Err(Error::InvalidZone(format!("Zone number {number} not in range [{MIN_ZONE}, {MAX_ZONE}]")));
        }
        if let ZoneBand::Letter(letter) = band {
            if !LATBAND.contains(letter) {
                return Err(Error::InvalidZone(format!("Latitude band {letter:?} is not one of {LATBAND}")));
            }
        }

        Ok(UtmZone { number, band })
    }

    /// Parses a complete zone identifier such as `"30U"` or `"56s"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] if the string is malformed, the zone
    /// number is out of range, or the band is missing or unrecognized.
    pub fn parse_str(zone_str: &str) -> Result<UtmZone, Error> {
        Self::from_str(zone_str)
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }

    #[inline]
    pub fn band(&self) -> ZoneBand {
        self.band
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.band.hemisphere()
    }

    pub fn is_north(&self) -> bool {
        self.hemisphere() == Hemisphere::North
    }

    /// Longitude of the zone's central meridian, in degrees.
    pub fn central_meridian(&self) -> f64 {
        6.0 * f64::from(self.number) - 183.
    }

    /// Whether `lon` lies within the zone's nominal 6 degree strip, where the
    /// projection keeps its full accuracy.
    pub fn is_within_strip(&self, lon: f64) -> bool {
        self.central_meridian().ang_diff(lon).abs() <= UTM_HALF_WIDTH
    }
}

impl ParseCoord for UtmZone {
    fn parse_coord(value: &str) -> Result<UtmZone, Error> {
        let forced = ForcedZone::parse_str(value)?;
        forced.band.map_or_else(
            || Err(Error::InvalidZone(format!("Zone {value:?} is missing a latitude band or hemisphere"))),
            |band| Ok(UtmZone { number: forced.number, band }),
        )
    }
}

impl FromStr for UtmZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UtmZone::parse_coord(s)
    }
}

impl Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.number, self.band)
    }
}

/// A caller-forced zone, parsed but not yet bound to a point. A bare zone
/// number leaves the band open; the hemisphere is then taken from each point's
/// latitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForcedZone {
    pub(crate) number: u8,
    pub(crate) band: Option<ZoneBand>,
}

impl ForcedZone {
    /// Parses `<1-60>`, `<1-60><band letter>` or `<1-60><n|s>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] on malformed input or an out-of-range
    /// zone number or band.
    pub fn parse_str(zone_str: &str) -> Result<ForcedZone, Error> {
        let trimmed = zone_str.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, suffix) = trimmed.split_at(split);

        if digits.is_empty() || digits.len() > 2 {
            return Err(Error::InvalidZone(format!("Zone {zone_str:?} must start with a zone number in [{MIN_ZONE}, {MAX_ZONE}]")));
        }
        // Two ASCII digits at most, cannot overflow
        let number = digits
            .parse::<u8>()
            .map_err(|_| Error::InvalidZone(format!("Invalid zone number {digits:?}")))?;

        let mut chars = suffix.chars();
        let band = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) => Some(ZoneBand::parse(c).ok_or_else(|| {
                Error::InvalidZone(format!("Latitude band {c:?} is not one of {LATBAND} or a hemisphere (n/s)"))
            })?),
            (Some(_), Some(_)) => {
                return Err(Error::InvalidZone(format!("Zone {zone_str:?} has trailing characters after the band")));
            }
        };

        match band {
            Some(band) => UtmZone::create(number, band).map(|zone| ForcedZone { number: zone.number, band: Some(zone.band) }),
            None => UtmZone::create(number, ZoneBand::Hemisphere(Hemisphere::North)).map(|zone| ForcedZone { number: zone.number, band: None }),
        }
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Binds the forced zone to a point, filling in the hemisphere from its
    /// latitude if the zone string didn't carry one.
    pub fn bind(&self, lat: f64) -> UtmZone {
        UtmZone {
            number: self.number,
            band: self
                .band
                .unwrap_or_else(|| ZoneBand::Hemisphere(Hemisphere::of_latitude(lat))),
        }
    }
}

impl FromStr for ForcedZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForcedZone::parse_str(s)
    }
}

/// Index of the latitude band for `lat`, in `[-10, 9]` (0 is band N).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_latitude_band(lat: f64) -> i32 {
    let lat_int = lat.floor() as i32;
    (-10).max(9.min((lat_int + 80).div_euclid(8) - 10))
}

/// Natural UTM zone of a point: the standard 6 degree strip, its 8 degree
/// latitude band, and the Norway/Svalbard exceptions. Defined for every
/// finite lat/lon; latitudes outside the UTM range clamp to bands C and X.
///
/// # Usage
///
/// ```
/// use utmconv::zone::natural_zone;
///
/// assert_eq!(natural_zone(50.0, -5.0).to_string(), "30U");
/// assert_eq!(natural_zone(-33.8688, 151.2093).to_string(), "56H");
/// // Southern Norway belongs to zone 32 although it's west of 6E
/// assert_eq!(natural_zone(60.0, 5.0).to_string(), "32V");
/// // The antimeridian wraps into zone 1
/// assert_eq!(natural_zone(0.0, 180.0).to_string(), "1N");
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn natural_zone(lat: f64, lon: f64) -> UtmZone {
    let mut lon_int = lon.ang_normalize().floor() as i32;
    if lon_int == dms::HD {
        lon_int = -dms::HD;
    }

    let band_idx = to_latitude_band(lat);
    // lon_int in [-180, 179] so this is in [1, 60]
    let standard = ((lon_int + 186) / 6) as u8;

    let number = ZONE_EXCEPTIONS
        .iter()
        .find(|(band, first, last, _)| {
            *band == band_idx && (*first..=*last).contains(&lon_int)
        })
        .map_or(standard, |exception| exception.3);

    let letter = LATBAND
        .as_bytes()[(band_idx + 10) as usize] as char;

    UtmZone {
        number,
        band: ZoneBand::Letter(letter),
    }
}

/// Resolves the zone a point is projected into. Without `forced` this is the
/// point's [`natural_zone`]; otherwise the forced zone string is parsed and
/// bound to the point, even if the point lies outside it. Forcing lets a set of
/// points straddling a zone boundary share one planar grid, at the cost of
/// distortion away from that zone's central meridian.
///
/// # Errors
///
/// Returns [`Error::InvalidZone`] if `forced` is malformed or out of range.
///
/// # Usage
///
/// ```
/// use utmconv::zone::resolve_zone;
///
/// assert_eq!(resolve_zone(55.0, 10.0, None).unwrap().to_string(), "32U");
/// assert_eq!(resolve_zone(55.0, 10.0, Some("30N")).unwrap().to_string(), "30N");
/// assert_eq!(resolve_zone(-10.0, 10.0, Some("30")).unwrap().to_string(), "30s");
/// assert!(resolve_zone(55.0, 10.0, Some("99Z")).is_err());
/// ```
pub fn resolve_zone(lat: f64, lon: f64, forced: Option<&str>) -> Result<UtmZone, Error> {
    let zone = match forced {
        Some(forced) => ForcedZone::parse_str(forced)?.bind(lat),
        None => natural_zone(lat, lon),
    };
    trace!(lat, lon, forced, %zone, "resolved zone");

    Ok(zone)
}
