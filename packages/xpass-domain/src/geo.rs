//! Coarse geographic helpers used by the proximity strategy.
//!
//! The bounding box is a small-angle approximation: it is symmetric about the center and is
//! tested per axis, so a point counts as near when both its latitude and longitude fall inside
//! the rectangle. No true-distance post filter is applied.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
	pub latitude: f64,
	pub longitude: f64,
}
impl Coordinates {
	pub fn new(latitude: f64, longitude: f64) -> Self {
		Self { latitude, longitude }
	}

	pub fn is_valid(&self) -> bool {
		self.latitude.is_finite()
			&& self.longitude.is_finite()
			&& (-90.0..=90.0).contains(&self.latitude)
			&& (-180.0..=180.0).contains(&self.longitude)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
	pub min: Coordinates,
	pub max: Coordinates,
}
impl BoundingBox {
	pub fn around(center: Coordinates, radius_km: f64) -> Self {
		let delta_lat = (radius_km / EARTH_RADIUS_KM).to_degrees();
		let delta_lon =
			(radius_km / EARTH_RADIUS_KM / center.latitude.to_radians().cos()).to_degrees();

		Self {
			min: Coordinates::new(center.latitude - delta_lat, center.longitude - delta_lon),
			max: Coordinates::new(center.latitude + delta_lat, center.longitude + delta_lon),
		}
	}

	pub fn contains(&self, point: Coordinates) -> bool {
		point.latitude >= self.min.latitude
			&& point.latitude <= self.max.latitude
			&& point.longitude >= self.min.longitude
			&& point.longitude <= self.max.longitude
	}
}

/// Great-circle distance using the haversine formula.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
	let lat_from = from.latitude.to_radians();
	let lat_to = to.latitude.to_radians();
	let d_lat = (to.latitude - from.latitude).to_radians();
	let d_lon = (to.longitude - from.longitude).to_radians();
	let a = (d_lat / 2.0).sin().powi(2) + lat_from.cos() * lat_to.cos() * (d_lon / 2.0).sin().powi(2);
	let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

	EARTH_RADIUS_KM * c
}
