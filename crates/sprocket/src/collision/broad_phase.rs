//! Broad-phase culling using one bounding sphere per body

use glam::DVec3;

use crate::geometry::GearPinGeometry;
use crate::types::Pose;

/// Bounding sphere radii for the gear and a shoe.
///
/// The gear sphere is centered on the gear body origin and the shoe sphere
/// on the pin center, i.e. the shoe-frame point `(pin_x, pin_y, 0)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSpheres {
    pub gear_radius: f64,
    pub shoe_radius: f64,
}

impl BoundingSpheres {
    #[must_use]
    pub fn from_geometry(geom: &GearPinGeometry) -> Self {
        Self {
            gear_radius: gear_bounding_radius(geom),
            shoe_radius: shoe_bounding_radius(geom),
        }
    }

    /// Radius sum both centers must be within for the pair to pass.
    #[must_use]
    pub fn reach(&self) -> f64 {
        self.gear_radius + self.shoe_radius
    }

    /// Returns `true` if the shoe may touch the gear this step.
    ///
    /// `slack` widens the test by the narrow phase's contact tolerance so a
    /// pair the narrow phase would accept is never culled.
    #[must_use]
    pub fn overlaps(&self, gear: &Pose, shoe: &Pose, geom: &GearPinGeometry, slack: f64) -> bool {
        let pin = pin_center_world(shoe, geom);
        gear.position.distance(pin) <= self.reach() + slack
    }
}

/// Circumscribes the tooth tips and every seat cylinder.
#[must_use]
pub fn gear_bounding_radius(geom: &GearPinGeometry) -> f64 {
    let half_len = geom.tooth_len() * 0.5;
    let tooth_tip = (geom.tooth_mid().length_squared() + half_len * half_len).sqrt();

    let half_seat = geom.gear_seat_width_max() * 0.5;
    let base = geom.gear_base_radius();
    let seat = (base * base + half_seat * half_seat).sqrt() + geom.gear_tooth_radius();

    tooth_tip.max(seat)
}

/// Circumscribes the outer rim of both pin ends, around the pin center.
#[must_use]
pub fn shoe_bounding_radius(geom: &GearPinGeometry) -> f64 {
    let offset = geom.pin_offset();
    let half_width = geom.pin_width_max() * 0.5;
    let rim = DVec3::new(offset.x + geom.pin_radius(), offset.y, half_width).length();

    rim.max(half_width + geom.pin_radius())
}

/// World-space center of the shoe's pin.
#[must_use]
pub fn pin_center_world(shoe: &Pose, geom: &GearPinGeometry) -> DVec3 {
    shoe.transform_point(geom.pin_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_radii_enclose_seats_and_pin() {
        let geom = GearPinGeometry::default();
        let spheres = BoundingSpheres::from_geometry(&geom);

        let layout = geom.layout();
        for seat in &layout.seats {
            assert!(seat.outer.length() + layout.seat_radius <= spheres.gear_radius + 1e-12);
        }
        let half = geom.pin_width_max() * 0.5;
        assert!(half + geom.pin_radius() <= spheres.shoe_radius + 1e-12);
        assert!(spheres.gear_radius < 1.0 && spheres.shoe_radius < 1.0);
    }

    #[test]
    fn rejects_distant_shoe() {
        let geom = GearPinGeometry::default();
        let spheres = BoundingSpheres::from_geometry(&geom);
        let shoe = Pose::from_position(DVec3::new(10.0, 0.0, 0.0));
        assert!(!spheres.overlaps(&Pose::IDENTITY, &shoe, &geom, 0.0));
    }

    #[test]
    fn accepts_touching_spheres() {
        let geom = GearPinGeometry::default();
        let spheres = BoundingSpheres::from_geometry(&geom);
        // place the pin center exactly on the combined reach
        let pin = DVec3::new(0.0, spheres.reach(), 0.0);
        let shoe = Pose::from_position(pin - geom.pin_offset());
        assert!(spheres.overlaps(&Pose::IDENTITY, &shoe, &geom, 1e-12));
    }
}
