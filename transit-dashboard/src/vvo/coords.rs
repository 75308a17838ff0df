//! Gauss-Krüger zone 4 to WGS84 conversion.
//!
//! VVO reports positions as GK4 grid coordinates on the Bessel ellipsoid
//! (Potsdam datum). Converting is an inverse transverse Mercator projection
//! followed by a seven-parameter Helmert datum shift.

use std::f64::consts::PI;

use crate::domain::Coords;

// Bessel 1841
const BESSEL_A: f64 = 6_377_397.155;
const BESSEL_F: f64 = 1.0 / 299.152_812_8;

// WGS84
const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;

const CENTRAL_MERIDIAN_DEG: f64 = 12.0;
const FALSE_EASTING: f64 = 4_500_000.0;

// Potsdam → WGS84, position vector convention.
const SHIFT_M: [f64; 3] = [598.1, 73.7, 418.2];
const ROTATION_ARCSEC: [f64; 3] = [0.202, 0.045, -2.455];
const SCALE_PPM: f64 = 6.7;

/// Convert a GK4 position (`high` = northing, `right` = easting) to
/// WGS84. All-zero input means "no position" and yields `(0, 0)`.
pub fn gk4_to_wgs84(high: f64, right: f64) -> Coords {
    if high == 0.0 && right == 0.0 {
        return Coords::default();
    }

    let (lat, lon) = inverse_transverse_mercator(high, right - FALSE_EASTING);
    let (x, y, z) = geodetic_to_ecef(lat, lon, BESSEL_A, BESSEL_F);
    let (x, y, z) = helmert(x, y, z);
    let (lat, lon) = ecef_to_geodetic(x, y, z, WGS84_A, WGS84_F);

    Coords::new(lon.to_degrees(), lat.to_degrees())
}

/// Inverse Gauss-Krüger projection on the Bessel ellipsoid. Returns
/// latitude and longitude in radians.
fn inverse_transverse_mercator(northing: f64, easting: f64) -> (f64, f64) {
    let a = BESSEL_A;
    let b = a * (1.0 - BESSEL_F);
    let e2 = BESSEL_F * (2.0 - BESSEL_F);
    let ep2 = (a * a - b * b) / (b * b);
    let n = (a - b) / (a + b);

    // Footpoint latitude
    let alpha = (a + b) / 2.0 * (1.0 + n.powi(2) / 4.0 + n.powi(4) / 64.0);
    let beta = 3.0 * n / 2.0 - 27.0 * n.powi(3) / 32.0 + 269.0 * n.powi(5) / 512.0;
    let gamma = 21.0 * n.powi(2) / 16.0 - 55.0 * n.powi(4) / 32.0;
    let delta = 151.0 * n.powi(3) / 96.0 - 417.0 * n.powi(5) / 128.0;
    let epsilon = 1097.0 * n.powi(4) / 512.0;
    let y0 = northing / alpha;
    let phi = y0
        + beta * (2.0 * y0).sin()
        + gamma * (4.0 * y0).sin()
        + delta * (6.0 * y0).sin()
        + epsilon * (8.0 * y0).sin();

    let cos = phi.cos();
    let nf = a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
    let t = phi.tan();
    let t2 = t * t;
    let eta2 = ep2 * cos * cos;
    let y = easting;

    let lat = phi + t / (2.0 * nf.powi(2)) * (-1.0 - eta2) * y.powi(2)
        + t / (24.0 * nf.powi(4))
            * (5.0 + 3.0 * t2 + 6.0 * eta2 - 6.0 * t2 * eta2 - 3.0 * eta2.powi(2)
                - 9.0 * t2 * eta2.powi(2))
            * y.powi(4)
        + t / (720.0 * nf.powi(6))
            * (-61.0 - 90.0 * t2 - 45.0 * t2 * t2 - 107.0 * eta2 + 162.0 * t2 * eta2
                + 45.0 * t2 * t2 * eta2)
            * y.powi(6);

    let lon = CENTRAL_MERIDIAN_DEG.to_radians()
        + y / (nf * cos)
        + (-1.0 - 2.0 * t2 - eta2) * y.powi(3) / (6.0 * nf.powi(3) * cos)
        + (5.0 + 28.0 * t2 + 24.0 * t2 * t2 + 6.0 * eta2 + 8.0 * t2 * eta2) * y.powi(5)
            / (120.0 * nf.powi(5) * cos);

    (lat, lon)
}

fn geodetic_to_ecef(lat: f64, lon: f64, a: f64, f: f64) -> (f64, f64, f64) {
    let e2 = f * (2.0 - f);
    let n = a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
    (
        n * lat.cos() * lon.cos(),
        n * lat.cos() * lon.sin(),
        n * (1.0 - e2) * lat.sin(),
    )
}

fn helmert(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let arcsec = PI / (180.0 * 3600.0);
    let [rx, ry, rz] = ROTATION_ARCSEC.map(|r| r * arcsec);
    let [dx, dy, dz] = SHIFT_M;
    let s = 1.0 + SCALE_PPM * 1e-6;

    (
        dx + s * (x - rz * y + ry * z),
        dy + s * (rz * x + y - rx * z),
        dz + s * (-ry * x + rx * y + z),
    )
}

fn ecef_to_geodetic(x: f64, y: f64, z: f64, a: f64, f: f64) -> (f64, f64) {
    let e2 = f * (2.0 - f);
    let lon = y.atan2(x);
    let p = x.hypot(y);
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..6 {
        let n = a / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        let h = p / lat.cos() - n;
        lat = z.atan2(p * (1.0 - e2 * n / (n + h)));
    }
    (lat, lon)
}
