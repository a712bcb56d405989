use approx::assert_abs_diff_eq;

use utmconv::{
    batch::{forward_batch, inverse_batch, ZoneArg},
    utm::{self, project, unproject},
    zone::natural_zone,
    Ellipsoid, Error, LatLon, UtmZone,
};

const IN_ZONE_TOLERANCE: f64 = 1e-7;
const FORCED_ZONE_TOLERANCE: f64 = 1e-4;

fn lon_error(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.);
    diff.min(360. - diff)
}

/// Points from 80S to 84N, up to 3 degrees either side of every 6th central meridian.
fn in_zone_points() -> Vec<(f64, f64)> {
    let offsets = [-3., -2.5, -1., -0.1, 0., 0.3, 1.7, 2.999, 3.];
    let mut points = Vec::new();

    for lat_step in 0..=164 {
        let lat = -80. + f64::from(lat_step);
        for zone in (1..=60).step_by(6) {
            let cm = 6. * f64::from(zone) - 183.;
            for offset in offsets {
                let lon = cm + offset;
                let lon = if lon >= 180. { lon - 360. } else if lon < -180. { lon + 360. } else { lon };
                points.push((lat, lon));
            }
        }
    }

    points
}

#[test]
fn roundtrip_within_zone() {
    let mut max_error = 0_f64;

    for (lat, lon) in in_zone_points() {
        // Project into the zone of the strip, not the natural one, so the
        // Norway/Svalbard exceptions don't move the central meridian
        let zone_number = ((lon + 180.) / 6.).floor() as u8 % 60 + 1;
        let zone = utm::forward(lat, lon, Some(&zone_number.to_string()), &Ellipsoid::WGS84).unwrap();
        let back = utm::inverse(zone.easting(), zone.northing(), &zone.zone(), &Ellipsoid::WGS84).unwrap();

        max_error = max_error
            .max((back.latitude() - lat).abs())
            .max(lon_error(back.longitude(), lon));
    }

    assert!(max_error < IN_ZONE_TOLERANCE, "max round-trip error {max_error}");
}

#[test]
fn roundtrip_natural_zones() {
    let lats = in_zone_points().iter().map(|p| p.0).collect::<Vec<_>>();
    let lons = in_zone_points().iter().map(|p| p.1).collect::<Vec<_>>();

    let out = forward_batch(&lats, &lons, None, &Ellipsoid::WGS84).unwrap();
    let back = inverse_batch(&out.eastings, &out.northings, &out.zones, &Ellipsoid::WGS84).unwrap();

    assert_eq!(back.len(), lats.len());
    for i in 0..lats.len() {
        assert_abs_diff_eq!(back.lats[i], lats[i], epsilon = IN_ZONE_TOLERANCE);
        assert!(lon_error(back.lons[i], lons[i]) < IN_ZONE_TOLERANCE, "({}, {})", lats[i], lons[i]);
    }
}

#[test]
fn roundtrip_other_ellipsoids() {
    for ellipsoid in [Ellipsoid::GRS80, Ellipsoid::WGS72, Ellipsoid::INTERNATIONAL_1924, Ellipsoid::CLARKE_1866, Ellipsoid::AIRY_1830] {
        for (lat, lon) in [(50., -5.), (-33.8688, 151.2093), (83.9, 100.), (-79.9, -70.), (0., -177.)] {
            let zone = natural_zone(lat, lon);
            let (easting, northing) = project(lat, lon, &zone, &ellipsoid).unwrap();
            let (lat2, lon2) = unproject(easting, northing, &zone, &ellipsoid).unwrap();
            assert_abs_diff_eq!(lat2, lat, epsilon = IN_ZONE_TOLERANCE);
            assert!(lon_error(lon2, lon) < IN_ZONE_TOLERANCE);
        }
    }
}

#[test]
fn roundtrip_at_flattening_limits() {
    for f in [utmconv::ellipsoid::MAX_FLATTENING, -utmconv::ellipsoid::MAX_FLATTENING] {
        let ellipsoid = Ellipsoid::new(6_378_137.0, f).unwrap();
        let lats = in_zone_points().iter().map(|p| p.0).collect::<Vec<_>>();
        let lons = in_zone_points().iter().map(|p| p.1).collect::<Vec<_>>();

        let out = forward_batch(&lats, &lons, None, &ellipsoid).unwrap();
        let back = inverse_batch(&out.eastings, &out.northings, &out.zones, &ellipsoid).unwrap();
        for i in 0..lats.len() {
            assert_abs_diff_eq!(back.lats[i], lats[i], epsilon = IN_ZONE_TOLERANCE);
            assert!(lon_error(back.lons[i], lons[i]) < IN_ZONE_TOLERANCE, "f = {f}: ({}, {})", lats[i], lons[i]);
        }
    }

    for f in [0.0101, -0.0101, 0.1, 0.3, 0.9, -0.5] {
        assert!(matches!(Ellipsoid::new(6_378_137.0, f), Err(Error::InvalidEllipsoid(_))));
    }
}

#[test]
fn scalar_matches_length_one_batch() {
    for (lat, lon, forced) in [(50., -5., None), (-33.8688, 151.2093, None), (55., 10., Some("30N")), (-12., 44., Some("37"))] {
        let scalar = utm::forward(lat, lon, forced, &Ellipsoid::WGS84).unwrap();
        let batch = forward_batch(&[lat], &[lon], forced, &Ellipsoid::WGS84).unwrap();

        assert_eq!(batch.zones, vec![scalar.zone()]);
        assert_eq!(batch.eastings[0].to_bits(), scalar.easting().to_bits());
        assert_eq!(batch.northings[0].to_bits(), scalar.northing().to_bits());

        let scalar_back = utm::inverse(scalar.easting(), scalar.northing(), &scalar.zone(), &Ellipsoid::WGS84).unwrap();
        let batch_back = inverse_batch(&batch.eastings, &batch.northings, scalar.zone(), &Ellipsoid::WGS84).unwrap();

        assert_eq!(batch_back.lats[0].to_bits(), scalar_back.latitude().to_bits());
        assert_eq!(batch_back.lons[0].to_bits(), scalar_back.longitude().to_bits());
    }
}

#[test]
fn batch_keeps_input_order() {
    let lats = (0..1000).map(|i| -79. + f64::from(i) * 0.16).collect::<Vec<_>>();
    let lons = (0..1000).map(|i| -179. + f64::from(i) * 0.35).collect::<Vec<_>>();

    let out = forward_batch(&lats, &lons, None, &Ellipsoid::WGS84).unwrap();

    for i in 0..lats.len() {
        let scalar = utm::forward(lats[i], lons[i], None, &Ellipsoid::WGS84).unwrap();
        assert_eq!(out.zones[i], scalar.zone());
        assert_eq!(out.eastings[i].to_bits(), scalar.easting().to_bits());
        assert_eq!(out.northings[i].to_bits(), scalar.northing().to_bits());
    }
}

#[test]
fn mismatched_lengths() {
    let err = forward_batch(&[50., 55., 60.], &[-5., -20.], None, &Ellipsoid::WGS84).unwrap_err();
    assert!(matches!(err, Error::MismatchedLength { expected: 3, found: 2, .. }));

    let zones = ZoneArg::parse_each(&["30U", "30U", "30U"]).unwrap();
    let err = inverse_batch(&[1., 2.], &[1., 2.], &zones, &Ellipsoid::WGS84).unwrap_err();
    assert!(matches!(err, Error::MismatchedLength { expected: 2, found: 3, .. }));
}

#[test]
fn forced_zone_degrades_gracefully() {
    let coord = utm::forward(55., 10., Some("30N"), &Ellipsoid::WGS84).unwrap();
    assert_eq!(coord.zone().to_string(), "30N");
    // 13 degrees east of zone 30's central meridian, far outside the strip
    assert_abs_diff_eq!(coord.easting(), 1_329_100.400, epsilon = 1e-2);
    assert_abs_diff_eq!(coord.northing(), 6_172_392.733, epsilon = 1e-2);

    let back = coord.to_latlon().unwrap();
    assert_abs_diff_eq!(back.latitude(), 55., epsilon = FORCED_ZONE_TOLERANCE);
    assert_abs_diff_eq!(back.longitude(), 10., epsilon = FORCED_ZONE_TOLERANCE);

    // The natural zone gives a different grid for the same point
    let natural = utm::forward(55., 10., None, &Ellipsoid::WGS84).unwrap();
    assert_eq!(natural.zone().to_string(), "32U");
    assert!((natural.easting() - coord.easting()).abs() > 100_000.);
}

#[test]
fn forced_zone_spanning_boundary() {
    // Points on both sides of the 30/31 boundary share zone 31's grid
    let lats = [48.8, 48.8, 48.8];
    let lons = [-1., 0., 1.];

    let out = forward_batch(&lats, &lons, Some("31U"), &Ellipsoid::WGS84).unwrap();
    assert!(out.zones.iter().all(|zone| zone.to_string() == "31U"));
    assert!(out.eastings[0] < out.eastings[1] && out.eastings[1] < out.eastings[2]);

    let back = inverse_batch(&out.eastings, &out.northings, ZoneArg::parse_shared("31U").unwrap(), &Ellipsoid::WGS84).unwrap();
    for i in 0..lats.len() {
        assert_abs_diff_eq!(back.lats[i], lats[i], epsilon = IN_ZONE_TOLERANCE);
        assert_abs_diff_eq!(back.lons[i], lons[i], epsilon = IN_ZONE_TOLERANCE);
    }
}

#[test]
fn reference_values() {
    let coord = LatLon::create(50., -5.).unwrap().to_utm().unwrap();
    assert_eq!(coord.zone().to_string(), "30U");
    assert_abs_diff_eq!(coord.easting(), 356_670.88, epsilon = 1e-2);
    assert_abs_diff_eq!(coord.northing(), 5_540_547.37, epsilon = 1e-2);

    let back = LatLon::from_utm(&coord).unwrap();
    assert_abs_diff_eq!(back.latitude(), 50., epsilon = 1e-6);
    assert_abs_diff_eq!(back.longitude(), -5., epsilon = 1e-6);
}

#[test]
fn southern_hemisphere() {
    let out = forward_batch(&[-33.8688], &[151.2093], None, &Ellipsoid::WGS84).unwrap();
    assert_eq!(out.zone_ids(), vec!["56H"]);
    assert!(!out.zones[0].is_north());
    assert!(out.northings[0] > 5_000_000.);

    let back = inverse_batch(&out.eastings, &out.northings, &out.zones, &Ellipsoid::WGS84).unwrap();
    assert_abs_diff_eq!(back.lats[0], -33.8688, epsilon = IN_ZONE_TOLERANCE);
    assert_abs_diff_eq!(back.lons[0], 151.2093, epsilon = IN_ZONE_TOLERANCE);
}

#[test]
fn invalid_zone() {
    assert!(matches!(
        forward_batch(&[55.], &[10.], Some("99Z"), &Ellipsoid::WGS84),
        Err(Error::InvalidZone(_))
    ));
    assert!(matches!(UtmZone::parse_str("99Z"), Err(Error::InvalidZone(_))));
    assert!(matches!(ZoneArg::parse_shared("99Z"), Err(Error::InvalidZone(_))));
}

#[test]
fn results_too_far_from_the_zone_are_errors() {
    let err = forward_batch(&[50., 1e-9], &[-5., 93.], Some("31"), &Ellipsoid::WGS84).unwrap_err();
    assert!(matches!(err, Error::InvalidCoord(_)));

    let zones = ZoneArg::parse_each(&["30U", "30U"]).unwrap();
    let err = inverse_batch(&[356_670.876, 1e9], &[5_540_547.37, 5e6], &zones, &Ellipsoid::WGS84).unwrap_err();
    assert!(matches!(err, Error::InvalidUtmCoords(_)));
}

#[test]
fn latitude_out_of_range() {
    for lat in [84.01, 90., -80.01, -90.] {
        assert!(matches!(
            utm::forward(lat, 0., None, &Ellipsoid::WGS84),
            Err(Error::LatitudeOutOfRange(_))
        ));
    }
}
