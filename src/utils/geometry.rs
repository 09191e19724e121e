// src/utils/geometry.rs
//! Spherical geometry on a mean-radius Earth.
//!
//! All functions are pure and total for validated coordinates. Angles come in
//! and go out in degrees; distances are metres.

use crate::map::Coordinate;
use crate::utils::util::clamp;
use std::f64::consts::PI;

/// Mean Earth radius in metres, as used by web map libraries.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Central angles below this (radians) are treated as coincident points.
const COINCIDENT_EPSILON: f64 = 1e-12;

/// Central angles this close to PI (radians) are treated as antipodal.
const ANTIPODAL_EPSILON: f64 = 1e-7;

/// A point on the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    fn from_coordinate(c: &Coordinate) -> Self {
        let lat = c.lat.to_radians();
        let lng = c.lng.to_radians();
        Vector3 {
            x: lat.cos() * lng.cos(),
            y: lat.cos() * lng.sin(),
            z: lat.sin(),
        }
    }

    fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn scale(&self, k: f64) -> Vector3 {
        Vector3 {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }

    fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Angle to `other` in radians; well conditioned near 0 and PI alike.
    fn angle_to(&self, other: &Vector3) -> f64 {
        self.cross(other).length().atan2(self.dot(other))
    }

    fn add(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    fn normalize(&self) -> Vector3 {
        let length = self.length();
        if length == 0.0 {
            return *self;
        }
        self.scale(1.0 / length)
    }

    /// Raw latitude/longitude, longitude in `(-180, 180]` via atan2.
    fn to_lat_lng(self) -> (f64, f64) {
        let lat = self.z.atan2((self.x * self.x + self.y * self.y).sqrt());
        let lng = self.y.atan2(self.x);
        (lat.to_degrees(), lng.to_degrees())
    }
}

/// Central angle between two coordinates in radians (haversine form).
pub fn central_angle(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let h = clamp(h, 0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Great-circle distance in metres. Symmetric, zero for coincident points.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    EARTH_RADIUS_M * central_angle(a, b)
}

/// Initial bearing (forward azimuth) from `a` towards `b`, degrees in `[0, 360)`.
pub fn initial_bearing(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Bearing on arrival at `b` when travelling from `a`, degrees in `[0, 360)`.
pub fn final_bearing(a: &Coordinate, b: &Coordinate) -> f64 {
    normalize_bearing(initial_bearing(b, a) + 180.0)
}

fn normalize_bearing(degrees: f64) -> f64 {
    let bearing = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Position at `fraction` (0 = `a`, 1 = `b`) along the minor great-circle arc.
pub fn intermediate_point(a: &Coordinate, b: &Coordinate, fraction: f64) -> Coordinate {
    let va = Vector3::from_coordinate(a);
    let vb = Vector3::from_coordinate(b);
    let d = va.angle_to(&vb);
    if d < COINCIDENT_EPSILON {
        return *a;
    }
    let p = if PI - d < ANTIPODAL_EPSILON {
        along_meridian(a, PI * fraction)
    } else {
        slerp(&va, &vb, d, fraction)
    };
    let (lat, lng) = p.to_lat_lng();
    Coordinate::new(lat, lng)
}

/// Samples `n` points along the minor great-circle arc from `a` to `b`,
/// both endpoints included. `n` below 2 is raised to 2, since an arc needs
/// both of its endpoints.
///
/// Longitudes are unwrapped point by point: each sample takes the multiple of
/// 360° that keeps it closest to the previous sample, so an arc crossing the
/// antimeridian stays continuous instead of jumping across the map. As a
/// consequence the last point may equal `b` shifted by a multiple of 360° in
/// longitude.
///
/// Coincident endpoints yield the single point `a`. Antipodal endpoints have
/// no unique minor arc; the fallback follows the meridian through `a` over
/// the nearer pole.
pub fn interpolate_arc(a: &Coordinate, b: &Coordinate, n: usize) -> Vec<Coordinate> {
    let va = Vector3::from_coordinate(a);
    let vb = Vector3::from_coordinate(b);
    let d = va.angle_to(&vb);
    if d < COINCIDENT_EPSILON {
        return vec![*a];
    }
    let n = n.max(2);
    let antipodal = PI - d < ANTIPODAL_EPSILON;

    let mut points = Vec::with_capacity(n);
    points.push(*a);

    let mut previous_lng = a.lng;
    for i in 1..n - 1 {
        let fraction = i as f64 / (n - 1) as f64;
        let p = if antipodal {
            along_meridian(a, PI * fraction)
        } else {
            slerp(&va, &vb, d, fraction)
        };
        let (lat, raw_lng) = p.to_lat_lng();
        let lng = unwrap_longitude(raw_lng, previous_lng);
        points.push(Coordinate::unwrapped(lat, lng));
        previous_lng = lng;
    }

    points.push(Coordinate::unwrapped(b.lat, unwrap_longitude(b.lng, previous_lng)));
    points
}

/// Slerp between unit vectors `va` and `vb`, `d` being the angle between them.
fn slerp(va: &Vector3, vb: &Vector3, d: f64, fraction: f64) -> Vector3 {
    let sin_d = d.sin();
    let ka = ((1.0 - fraction) * d).sin() / sin_d;
    let kb = (fraction * d).sin() / sin_d;
    va.scale(ka).add(&vb.scale(kb))
}

/// The point `angle` radians from `a` along its meridian, heading for the
/// nearer pole.
fn along_meridian(a: &Coordinate, angle: f64) -> Vector3 {
    let start = Vector3::from_coordinate(a);
    let tangent = meridian_tangent(a);
    start.scale(angle.cos()).add(&tangent.scale(angle.sin()))
}

/// Unit tangent at `a` along its meridian, towards the nearer pole.
fn meridian_tangent(a: &Coordinate) -> Vector3 {
    let va = Vector3::from_coordinate(a);
    let north = Vector3 {
        x: 0.0,
        y: 0.0,
        z: if a.lat >= 0.0 { 1.0 } else { -1.0 },
    };
    let tangent = north.add(&va.scale(-north.dot(&va)));
    if tangent.length() > 1e-12 {
        return tangent.normalize();
    }
    // `a` is a pole: any equatorial direction is a meridian.
    Vector3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    }
}

/// Picks `raw + 360k` closest to `previous`.
fn unwrap_longitude(raw: f64, previous: f64) -> f64 {
    raw + 360.0 * ((previous - raw) / 360.0).round()
}
