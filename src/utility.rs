use crate::ThisOrThat;

pub(crate) mod dms {
    /// Degrees per quarter turn
    pub const QD: i32 = 90;
    /// Degrees per half turn
    pub const HD: i32 = 2 * QD;
    /// Degrees per turn
    pub const TD: i32 = 2 * HD;
}

/// Evaluate a polynomial, highest order coefficient first
pub(crate) fn polyval(p: &[f64], x: f64) -> f64 {
    p
        .iter()
        .fold(0_f64, |acc, val| acc*x + val)
}

pub(crate) trait GeoMath {
    fn is_zero(&self) -> bool;
    fn eps_eq(&self, other: Self) -> bool;
    fn ang_normalize(&self) -> Self;
    fn ang_diff(&self, other: Self) -> Self;
    fn eatanhe(&self, es: Self) -> Self;
    fn remainder(&self, denom: Self) -> Self;
    fn taupf(&self, es: Self) -> Self;
    fn tauf(&self, es: Self) -> Self;
    fn sincosd(&self) -> (Self, Self) where Self: Sized;
}

impl GeoMath for f64 {
    fn is_zero(&self) -> bool {
        self.abs() < f64::EPSILON
    }

    fn eps_eq(&self, other: f64) -> bool {
        (*self - other).abs() < f64::EPSILON
    }

    /// Reduce an angle in degrees to [-180, 180], keeping the sign of +/-180.
    fn ang_normalize(&self) -> f64 {
        let value = self.remainder(f64::from(dms::TD));
        let hd = f64::from(dms::HD);

        if value.abs().eps_eq(hd) {
            hd.copysign(*self)
        }
        else {
            value
        }
    }

    /// `other - self`, reduced to [-180, 180].
    fn ang_diff(&self, other: f64) -> f64 {
        (other - *self).ang_normalize()
    }

    fn eatanhe(&self, es: f64) -> f64 {
        if es.is_sign_positive() {
            es * (es * *self).atanh()
        } else {
            -es * (es * *self).atan()
        }
    }

    fn remainder(&self, denom: Self) -> Self {
        *self - (*self / denom).round() * denom
    }

    /// tan(chi) of the conformal latitude chi, given tan(phi)
    fn taupf(&self, es: f64) -> f64 {
        let tau1 = 1.0_f64.hypot(*self);
        let sig = (*self / tau1).eatanhe(es).sinh();

        1.0_f64.hypot(sig) * *self - sig * tau1
    }

    /// Inverse of [`GeoMath::taupf`] by Newton's method
    #[allow(clippy::similar_names)]
    fn tauf(&self, es: f64) -> f64 {
        let numit = 5;
        let tol = f64::EPSILON.sqrt() / 10.0;

        // es carries the sign of f, so this is 1 - e2 on prolate ellipsoids too
        let e2m = 1.0 - es * es.abs();
        let mut tau = (self.abs() > 70.0).ternary_lazy(
            || self * 1_f64.eatanhe(es).exp(),
            || self / e2m,
        );

        let stol = tol * self.abs().max(1.0);
        for _ in 0..numit {
            let taupa = tau.taupf(es);
            let dtau = (self - taupa) * (1.0 + e2m * tau.powi(2))
                / (e2m * 1.0_f64.hypot(tau) * 1.0_f64.hypot(taupa));
            tau += dtau;
            if dtau.abs() < stol {
                break;
            }
        }
        tau
    }

    /// Sine and cosine of an angle in degrees, exact at multiples of 90.
    #[allow(clippy::cast_possible_truncation)]
    fn sincosd(&self) -> (f64, f64) {
        let qd = f64::from(dms::QD);
        // Reduce to [-45, 45] and remember the quadrant
        let r = *self % f64::from(dms::TD);
        let q = (r / qd).round();
        let (s, c) = (r - qd * q).to_radians().sin_cos();

        let (sinx, cosx) = match (q as i32).rem_euclid(4) {
            0 => (s, c),
            1 => (c, -s),
            2 => (-s, -c),
            _ => (-c, s),
        };

        // Avoid -0 cosines
        (sinx, cosx + 0.)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn polyval_evaluates_highest_order_first() {
        // 2x^2 + 3x + 4
        assert_abs_diff_eq!(polyval(&[2., 3., 4.], 2.), 18.);
        assert_abs_diff_eq!(polyval(&[], 5.), 0.);
    }

    #[test]
    fn ang_normalize_wraps() {
        assert_abs_diff_eq!(190_f64.ang_normalize(), -170.);
        assert_abs_diff_eq!((-190_f64).ang_normalize(), 170.);
        assert_abs_diff_eq!(180_f64.ang_normalize(), 180.);
        assert_abs_diff_eq!((-180_f64).ang_normalize(), -180.);
        assert_abs_diff_eq!(540_f64.ang_normalize(), 180.);
    }

    #[test]
    fn ang_diff_crosses_antimeridian() {
        assert_abs_diff_eq!(177_f64.ang_diff(-179.), 4., epsilon = 1e-12);
        assert_abs_diff_eq!((-3_f64).ang_diff(-5.), -2., epsilon = 1e-12);
    }

    #[test]
    fn sincosd_exact_quadrants() {
        assert_eq!(90_f64.sincosd(), (1., 0.));
        assert_eq!(180_f64.sincosd(), (0., -1.));
        assert_eq!((-90_f64).sincosd(), (-1., 0.));
        assert_eq!(450_f64.sincosd(), (1., 0.));
        let (s, c) = 30_f64.sincosd();
        assert_abs_diff_eq!(s, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(c, 3_f64.sqrt() / 2., epsilon = 1e-15);
    }

    #[test]
    fn tauf_inverts_taupf() {
        let es = (crate::constants::WGS84_F * (2. - crate::constants::WGS84_F)).sqrt();
        for tau in [-50., -1.5, -0.2, 0., 0.3, 1., 7.5, 100.] {
            let taup = f64::taupf(&tau, es);
            assert_abs_diff_eq!(taup.tauf(es), tau, epsilon = 1e-12 * f64::max(1., tau.abs()));
        }
    }

    #[test]
    fn tauf_converges_on_prolate_ellipsoid() {
        // f = -0.01
        let e2 = -0.01 * (2. + 0.01);
        let es = -f64::sqrt(-e2);
        for tau in [-3., -0.5, 0.577, 1.7, 40.] {
            let taup = f64::taupf(&tau, es);
            assert_abs_diff_eq!(taup.tauf(es), tau, epsilon = 1e-12 * f64::max(1., tau.abs()));
        }
    }
}
