//! Geographic coordinates projected onto a sphere centered at the origin.
//!
//! Convention: +Y is north, and longitude is offset by 180° so that the prime
//! meridian lands on -X and the antimeridian on +X.

use thiserror::Error;

use super::Vec3;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate is not finite")]
    NotFinite,
}

/// Validated latitude/longitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    lat_deg: f64,
    lng_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lng_deg: f64) -> Result<Self, GeoError> {
        if !lat_deg.is_finite() || !lng_deg.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat_deg) {
            return Err(GeoError::LatitudeOutOfRange(lat_deg));
        }
        if !(-180.0..=180.0).contains(&lng_deg) {
            return Err(GeoError::LongitudeOutOfRange(lng_deg));
        }
        Ok(Self { lat_deg, lng_deg })
    }

    pub fn lat_deg(self) -> f64 {
        self.lat_deg
    }

    pub fn lng_deg(self) -> f64 {
        self.lng_deg
    }

    pub fn to_sphere(self, radius: f64) -> Vec3 {
        project(self.lat_deg, self.lng_deg, radius)
    }
}

/// Clamp latitude into [-90, 90] and wrap longitude into [-180, 180].
///
/// In-range values pass through untouched, so ±180 stay distinct inputs.
pub fn normalize_lat_lng(lat_deg: f64, lng_deg: f64) -> (f64, f64) {
    let lat = lat_deg.clamp(-90.0, 90.0);
    let lng = if (-180.0..=180.0).contains(&lng_deg) {
        lng_deg
    } else {
        (lng_deg + 180.0).rem_euclid(360.0) - 180.0
    };
    (lat, lng)
}

/// Project a latitude/longitude (degrees) onto a sphere of `radius`.
///
/// Out-of-range input is normalized first (see [`normalize_lat_lng`]), so the
/// result always lies on the sphere. Non-finite input yields non-finite output.
pub fn project(lat_deg: f64, lng_deg: f64, radius: f64) -> Vec3 {
    let (lat, lng) = normalize_lat_lng(lat_deg, lng_deg);
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

#[cfg(test)]
mod tests {
    use super::{GeoError, GeoPoint, normalize_lat_lng, project};
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert_close(a.x, b.x, eps);
        assert_close(a.y, b.y, eps);
        assert_close(a.z, b.z, eps);
    }

    #[test]
    fn projected_points_lie_on_the_sphere() {
        for &radius in &[0.5, 1.0, 5.0, 5.2, 6_378_137.0] {
            let mut lat = -90.0;
            while lat <= 90.0 {
                let mut lng = -180.0;
                while lng <= 180.0 {
                    let p = project(lat, lng, radius);
                    let rel = (p.length() - radius).abs() / radius;
                    assert!(rel <= 1e-6, "lat {lat} lng {lng} r {radius}: norm {}", p.length());
                    lng += 7.5;
                }
                lat += 7.5;
            }
        }
    }

    #[test]
    fn prime_meridian_and_antimeridian_are_antipodal() {
        let r = 5.0;
        let front = project(0.0, 0.0, r);
        let west = project(0.0, -180.0, r);
        let east = project(0.0, 180.0, r);

        assert_vec_close(front, Vec3::new(-r, 0.0, 0.0), 1e-9);
        assert_vec_close(west, Vec3::new(r, 0.0, 0.0), 1e-9);
        assert_vec_close(east, west, 1e-9);
        assert_vec_close(front + east, Vec3::ZERO, 1e-9);
    }

    #[test]
    fn poles_map_to_y_axis() {
        assert_vec_close(project(90.0, 42.0, 2.0), Vec3::new(0.0, 2.0, 0.0), 1e-9);
        assert_vec_close(project(-90.0, -13.0, 2.0), Vec3::new(0.0, -2.0, 0.0), 1e-9);
    }

    #[test]
    fn projection_is_deterministic() {
        assert_eq!(project(20.5937, 78.9629, 5.2), project(20.5937, 78.9629, 5.2));
    }

    #[test]
    fn out_of_range_input_is_normalized() {
        assert_eq!(normalize_lat_lng(95.0, 190.0), (90.0, -170.0));
        assert_eq!(normalize_lat_lng(-100.0, -540.0), (-90.0, -180.0));
        assert_eq!(normalize_lat_lng(12.0, 180.0), (12.0, 180.0));

        let wrapped = project(10.0, 370.0, 3.0);
        assert_vec_close(wrapped, project(10.0, 10.0, 3.0), 1e-9);
        assert_close(project(120.0, 720.5, 3.0).length(), 3.0, 1e-9);
    }

    #[test]
    fn non_finite_input_is_not_repaired() {
        let p = project(f64::NAN, 0.0, 5.0);
        assert!(!p.x.is_finite() && !p.y.is_finite());
        assert!(!project(0.0, f64::INFINITY, 5.0).length().is_finite());
    }

    #[test]
    fn geo_point_rejects_invalid_coordinates() {
        assert_eq!(GeoPoint::new(91.0, 0.0), Err(GeoError::LatitudeOutOfRange(91.0)));
        assert_eq!(GeoPoint::new(0.0, -181.0), Err(GeoError::LongitudeOutOfRange(-181.0)));
        assert_eq!(GeoPoint::new(f64::NAN, 0.0), Err(GeoError::NotFinite));

        let p = GeoPoint::new(51.5074, -0.1278).unwrap();
        assert_eq!(p.to_sphere(5.0), project(51.5074, -0.1278, 5.0));
    }
}
