use std::{fmt::Display, str::FromStr};

use crate::{Error, ParseCoord, utm::UtmCoordinate, Ellipsoid};

/// Representation of a geographic latitude/longitude point, in degrees. Can be
/// converted to/from [`UtmCoordinate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
}

impl LatLon {
    /// Internal-only constructor that doesn't check the bounds of lat/lon
    pub(crate) fn new(lat: f64, lon: f64) -> LatLon {
        Self {
            latitude: lat,
            longitude: lon,
        }
    }

    /// Tries to create a latitude/longitude point from a lat/lon pair. First checks if the
    /// values are valid:
    /// * Latitude must be in range [-90,90]
    /// * Longitude must be in range [-180,180]
    ///
    /// A longitude of exactly 180 is kept as given; it falls in UTM zone 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if either latitude or longitude are invalid.
    ///
    /// # Usage
    ///
    /// ```
    /// use utmconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278);
    ///
    /// assert!(coord.is_ok());
    ///
    /// let coord = coord.unwrap();
    ///
    /// assert_eq!(coord.latitude(), 40.748333);
    /// assert_eq!(coord.longitude(), -73.985278);
    ///
    /// let invalid_coord_lat = LatLon::create(100.0, 0.0);
    /// assert!(invalid_coord_lat.is_err());
    ///
    /// let invalid_coord_lon = LatLon::create(0.0, -200.0);
    /// assert!(invalid_coord_lon.is_err());
    ///
    /// let invalid_coord_nan = LatLon::create(f64::NAN, 0.0);
    /// assert!(invalid_coord_nan.is_err());
    /// ```
    pub fn create(lat: f64, lon: f64) -> Result<LatLon, Error> {
        if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")))
        } else if !(-180_f64..=180_f64).contains(&lon) {
            Err(Error::InvalidCoord(format!("Longitude {lon} outside of valid range [-180, 180].")))
        } else {
            Ok(LatLon::new(lat, lon))
        }
    }

    /// Returns the latitude value.
    ///
    /// # Example
    /// ```
    /// use utmconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// assert_eq!(coord.latitude(), 40.748333);
    /// ```
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude value.
    ///
    /// # Example
    /// ```
    /// use utmconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// assert_eq!(coord.longitude(), -73.985278);
    /// ```
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns whether the current point is in the northern hemisphere. The
    /// equator counts as north.
    ///
    /// # Example
    ///
    /// ```
    /// use utmconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// assert!(coord.is_north());
    ///
    /// let coord = LatLon::create(-40.748333, -73.985278).unwrap();
    /// assert!(!coord.is_north());
    /// ```
    pub fn is_north(&self) -> bool {
        self.latitude >= 0.
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
    /// use utmconv::{LatLon, UtmCoordinate};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let coord_utm: UtmCoordinate = "18T 585664.121 4511315.422".parse().unwrap();
    ///
    /// let converted = LatLon::from_utm(&coord_utm).unwrap();
    ///
    /// // Check if the converted coordinate is accurate to 6 decimals (same as reference)
    /// assert!((converted.latitude() - coord.latitude()).abs() < 1e-6);
    /// assert!((converted.longitude() - coord.longitude()).abs() < 1e-6);
    /// ```
    pub fn from_utm(value: &UtmCoordinate) -> Result<LatLon, Error> {
        value.to_latlon()
    }

    /// Converts from [`LatLon`] to [`UtmCoordinate`] in the point's natural
    /// zone, on the WGS84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LatitudeOutOfRange`] outside UTM's `[-80, 84]` latitude range.
    ///
    /// # Usage
    ///
    /// ```
    /// use utmconv::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    ///
    /// let converted = coord.to_utm().unwrap();
    ///
    /// assert_eq!(converted.zone().to_string(), "18T");
    /// // Check if the converted coordinate is accurate to 3 decimals (same as reference)
    /// assert!((converted.easting() - 585664.121).abs() < 1e-3);
    /// assert!((converted.northing() - 4511315.422).abs() < 1e-3);
    /// ```
    pub fn to_utm(&self) -> Result<UtmCoordinate, Error> {
        UtmCoordinate::from_latlon(self)
    }

    /// Same as [`LatLon::to_utm`] on an arbitrary ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LatitudeOutOfRange`] outside UTM's `[-80, 84]` latitude range.
    pub fn to_utm_on(&self, ellipsoid: &Ellipsoid) -> Result<UtmCoordinate, Error> {
        UtmCoordinate::from_latlon_on(self, ellipsoid)
    }
}

impl ParseCoord for LatLon {
    /// Parses `"<lat> <lon>"`, separated by whitespace and/or a comma.
    fn parse_coord(value: &str) -> Result<LatLon, Error> {
        let mut pieces = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty());

        let mut next_value = |name: &str| -> Result<f64, Error> {
            let piece = pieces
                .next()
                .ok_or_else(|| Error::InvalidCoord(format!("Missing {name} in {value:?}")))?;
            piece
                .parse::<f64>()
                .map_err(|_| Error::InvalidCoord(format!("Invalid {name} {piece:?}")))
        };

        let lat = next_value("latitude")?;
        let lon = next_value("longitude")?;

        if pieces.next().is_some() {
            return Err(Error::InvalidCoord(format!("Trailing characters in {value:?}")));
        }

        LatLon::create(lat, lon)
    }
}

impl FromStr for LatLon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LatLon::parse_coord(s)
    }
}

impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(
            f,
            "{lat} {lon}",
        )
    }
}
