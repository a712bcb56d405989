//! Transverse Mercator on an ellipsoid, via Krüger's series in the third
//! flattening n (6th order), summed with Clenshaw's method in complex
//! arithmetic. Accurate to a few nanometres within 4000 km of the central
//! meridian.

use std::{borrow::Cow, f64::consts::PI};

use lazy_static::lazy_static;
use num::Complex;

use crate::{utility::{polyval, GeoMath, dms}, ThisOrThat, constants::UTM_K0, Ellipsoid};

// ================================
// Transverse Mercator Constants
// ================================

const B1_COEFF: [f64; 5] = [
    // b1*(n+1), polynomial in n2 of order 3
    1., 4., 64., 256., 256.,
];  // count = 5

#[allow(clippy::unreadable_literal)]
const ALP_COEFF: [f64; 27] = [
    // alp[1]/n^1, polynomial in n of order 5
    31564., -66675., 34440., 47250., -100800., 75600., 151200.,
    // alp[2]/n^2, polynomial in n of order 4
    -1983433., 863232., 748608., -1161216., 524160., 1935360.,
    // alp[3]/n^3, polynomial in n of order 3
    670412., 406647., -533952., 184464., 725760.,
    // alp[4]/n^4, polynomial in n of order 2
    6601661., -7732800., 2230245., 7257600.,
    // alp[5]/n^5, polynomial in n of order 1
    -13675556., 3438171., 7983360.,
    // alp[6]/n^6, polynomial in n of order 0
    212378941., 319334400.,
];  // count = 27

#[allow(clippy::unreadable_literal)]
const BET_COEFF: [f64; 27] = [
    // bet[1]/n^1, polynomial in n of order 5
    384796., -382725., -6720., 932400., -1612800., 1209600., 2419200.,
    // bet[2]/n^2, polynomial in n of order 4
    -1118711., 1695744., -1174656., 258048., 80640., 3870720.,
    // bet[3]/n^3, polynomial in n of order 3
    22276., -16929., -15984., 12852., 362880.,
    // bet[4]/n^4, polynomial in n of order 2
    -830251., -158400., 197865., 7257600.,
    // bet[5]/n^5, polynomial in n of order 1
    -435388., 453717., 15966720.,
    // bet[6]/n^6, polynomial in n of order 0
    20648693., 638668800.,
];  // count = 27

const MAXPOW: usize = 6;

/// Largest eta on the conformal sphere accepted by [`TransverseMercator::forward`],
/// about 4000 km from the central meridian on the earth. It keeps points clear
/// of the singularity at the equator a quarter turn away.
const FORWARD_MAX_ETA: f64 = 0.63;
/// Largest scaled easting `x / (k0 * a1)` accepted by [`TransverseMercator::reverse`].
/// Anything the forward projection produces is well inside it.
const REVERSE_MAX_ETA: f64 = 1.0;

lazy_static! {
    static ref WGS84_UTM: TransverseMercator = TransverseMercator::utm(&Ellipsoid::WGS84);
}

/// Local distortion of the projection at a point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distortion {
    /// Meridian convergence in degrees: the angle, clockwise, from true north
    /// to grid north.
    pub convergence: f64,
    /// Point scale factor (grid distance over ellipsoidal distance).
    pub scale: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct TransverseMercator {
    k0: f64,
    es: f64,
    e2: f64,
    e2m: f64,
    c: f64,
    a1: f64,
    b1: f64,
    alp: [f64; MAXPOW + 1],
    bet: [f64; MAXPOW + 1],
}

/// Projector for UTM on `ellipsoid`. The WGS84 projector is built once and
/// shared; any other ellipsoid gets its series coefficients computed here.
pub(crate) fn utm_projector(ellipsoid: &Ellipsoid) -> Cow<'static, TransverseMercator> {
    if *ellipsoid == Ellipsoid::WGS84 {
        Cow::Borrowed(&*WGS84_UTM)
    } else {
        Cow::Owned(TransverseMercator::utm(ellipsoid))
    }
}

#[allow(clippy::cast_precision_loss, clippy::many_single_char_names)]
impl TransverseMercator {
    pub fn utm(ellipsoid: &Ellipsoid) -> TransverseMercator {
        Self::new(ellipsoid, UTM_K0)
    }

    pub fn new(ellipsoid: &Ellipsoid, k0: f64) -> TransverseMercator {
        let n = ellipsoid.third_flattening();
        let e2 = ellipsoid.eccentricity_squared();
        let e2m = 1. - e2;
        let es = ellipsoid.signed_eccentricity();
        let c = e2m.sqrt() * 1_f64.eatanhe(es).exp();

        let m = MAXPOW / 2;
        let b1 = polyval(&B1_COEFF[0..=m], n.powi(2)) / (B1_COEFF[m + 1] * (1. + n));
        // a1 is the equivalent radius for computing the circumference of
        // ellipse.
        let a1 = b1 * ellipsoid.semi_major_axis();

        let mut alp = [0_f64; MAXPOW + 1];
        let mut bet = [0_f64; MAXPOW + 1];

        let mut o = 0;
        let mut d = n;

        for l in 1..=MAXPOW {
            let m = MAXPOW - l;
            alp[l] = d * polyval(&ALP_COEFF[o..=o + m], n) / ALP_COEFF[o + m + 1];
            bet[l] = d * polyval(&BET_COEFF[o..=o + m], n) / BET_COEFF[o + m + 1];
            o += m + 2;
            d *= n;
        }

        Self {
            k0,
            es,
            e2,
            e2m,
            c,
            a1,
            b1,
            alp,
            bet,
        }
    }

    /// Projects `(lat, lon)` relative to the central meridian `lon0`. Returns
    /// `(x, y)` in metres with no false easting/northing applied, or `None`
    /// if the point is too far from the central meridian.
    pub fn forward(&self, lon0: f64, lat: f64, lon: f64) -> Option<(f64, f64, Distortion)> {
        let lon = lon0.ang_diff(lon);

        let mut latsign = lat.is_sign_negative().ternary(-1., 1.);
        let lonsign = lon.is_sign_negative().ternary(-1., 1.);
        let lat = lat * latsign;
        let mut lon = lon * lonsign;

        // More than a quarter turn from the central meridian is folded onto
        // the back side of the projection.
        let backside = lon > f64::from(dms::QD);
        if backside {
            if lat.is_zero() {
                latsign = -1.;
            }
            lon = f64::from(dms::HD) - lon;
        }

        let (sphi, cphi) = lat.sincosd();
        let (slam, clam) = lon.sincosd();

        let (xip, etap, mut gamma, mut k) = if lat.eps_eq(f64::from(dms::QD)) {
            (PI / 2., 0., lon, self.c)
        } else {
            let tau = sphi / cphi;
            let taup = tau.taupf(self.es);
            let xip = taup.atan2(clam);
            let etap = (slam / taup.hypot(clam)).asinh();
            let gamma = (slam * taup).atan2(clam * 1_f64.hypot(taup)).to_degrees();
            let k = (self.e2m + self.e2 * cphi.powi(2)).sqrt() * 1_f64.hypot(tau) / taup.hypot(clam);

            (xip, etap, gamma, k)
        };

        if etap.is_nan() || etap > FORWARD_MAX_ETA {
            return None;
        }

        let c0 = (2. * xip).cos();
        let ch0 = (2. * etap).cosh();
        let s0 = (2. * xip).sin();
        let sh0 = (2. * etap).sinh();

        let mut a = Complex::new(2. * c0 * ch0, -2. * s0 * sh0);
        let mut n = MAXPOW;

        let mut y0 = Complex::new((n % 2 == 1).ternary(self.alp[n], 0.), 0.);
        let mut y1 = Complex::default();
        let mut z0 = Complex::new((n % 2 == 1).ternary(2. * n as f64 * self.alp[n], 0.), 0.);
        let mut z1 = Complex::default();

        if n % 2 == 1 {
            n -= 1;
        }

        while n > 0 {
            y1 = a * y0 - y1 + self.alp[n];
            z1 = a * z0 - z1 + 2. * (n as f64) * self.alp[n];
            n -= 1;

            y0 = a * y1 - y0 + self.alp[n];
            z0 = a * z1 - z0 + 2. * (n as f64) * self.alp[n];
            n -= 1;
        }

        a /= 2.;
        z1 = 1. - z1 + a * z0;
        a = Complex::new(s0 * ch0, c0 * sh0);
        y1 = Complex::new(xip, etap) + a * y0;

        gamma -= z1.im.atan2(z1.re).to_degrees();
        k *= self.b1 * z1.norm();

        let xi = y1.re;
        let eta = y1.im;

        let y = self.a1 * self.k0 * backside.ternary(PI - xi, xi) * latsign;
        let x = self.a1 * self.k0 * eta * lonsign;

        if backside {
            gamma = f64::from(dms::HD) - gamma;
        }
        gamma *= latsign * lonsign;

        let distortion = Distortion {
            convergence: gamma.ang_normalize(),
            scale: k * self.k0,
        };

        Some((x, y, distortion))
    }

    /// Inverse of [`TransverseMercator::forward`]: `(x, y)` in metres relative
    /// to the central meridian `lon0`, with no false easting/northing. `None`
    /// if `x` is too far from the central meridian for the series.
    pub fn reverse(&self, lon0: f64, x: f64, y: f64) -> Option<(f64, f64, Distortion)> {
        let mut xi = y / (self.a1 * self.k0);
        let mut eta = x / (self.a1 * self.k0);

        let xi_sign = xi.is_sign_negative().ternary(-1., 1.);
        let eta_sign = eta.is_sign_negative().ternary(-1., 1.);

        xi *= xi_sign;
        eta *= eta_sign;

        if eta.is_nan() || eta > REVERSE_MAX_ETA {
            return None;
        }

        let backside = xi > PI / 2.;
        if backside {
            xi = PI - xi;
        }

        let c0 = (2. * xi).cos();
        let ch0 = (2. * eta).cosh();
        let s0 = (2. * xi).sin();
        let sh0 = (2. * eta).sinh();

        let mut a = Complex::new(2. * c0 * ch0, -2. * s0 * sh0);
        let mut n = MAXPOW;

        let mut y0 = Complex::new((n % 2 == 1).ternary(-self.bet[n], 0.), 0.);
        let mut y1 = Complex::default();
        let mut z0 = Complex::new((n % 2 == 1).ternary(-2. * n as f64 * self.bet[n], 0.), 0.);
        let mut z1 = Complex::default();

        if n % 2 == 1 {
            n -= 1;
        }

        while n > 0 {
            y1 = a * y0 - y1 - self.bet[n];
            z1 = a * z0 - z1 - 2. * (n as f64) * self.bet[n];
            n -= 1;

            y0 = a * y1 - y0 - self.bet[n];
            z0 = a * z1 - z0 - 2. * (n as f64) * self.bet[n];
            n -= 1;
        }

        a /= 2.;
        z1 = 1. - z1 + a * z0;
        a = Complex::new(s0 * ch0, c0 * sh0);
        y1 = Complex::new(xi, eta) + a * y0;

        let mut gamma = z1.im.atan2(z1.re).to_degrees();
        let mut k = self.b1 / z1.norm();

        // Footpoint on the conformal sphere
        let xip = y1.re;
        let etap = y1.im;
        let s = etap.sinh();
        let c = 0_f64.max(xip.cos());
        let r = s.hypot(c);

        let (mut lat, mut lon) = if r.is_zero() {
            k *= self.c;
            (f64::from(dms::QD), 0.)
        } else {
            let lon = s.atan2(c).to_degrees();
            let sxip = xip.sin();
            let tau = (sxip / r).tauf(self.es);
            gamma += (sxip * etap.tanh()).atan2(c).to_degrees();
            k *= (self.e2m + self.e2 / (1. + tau.powi(2))).sqrt() * 1_f64.hypot(tau) * r;

            (tau.atan().to_degrees(), lon)
        };

        lat *= xi_sign;
        if backside {
            lon = f64::from(dms::HD) - lon;
            gamma = f64::from(dms::HD) - gamma;
        }
        lon *= eta_sign;
        lon = (lon + lon0).ang_normalize();
        gamma *= xi_sign * eta_sign;

        let distortion = Distortion {
            convergence: gamma.ang_normalize(),
            scale: k * self.k0,
        };

        Some((lat, lon, distortion))
    }
}
