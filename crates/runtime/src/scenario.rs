//! Kinematic gear and track-shoe scene.
//!
//! The gear spins about +z at a constant rate. The first `wrapped` shoes ride
//! in consecutive seats and turn with the gear; the rest run along a straight
//! lower span well clear of it. Poses are prescribed, not integrated.

use glam::{DQuat, DVec3};
use sprocket::{BodyHandle, GearPinGeometry, Pose};

pub struct TrackScene {
    geometry: GearPinGeometry,
    omega: f64,
    wrapped: usize,
    seat_penetration: f64,
    bodies: Vec<Pose>,
}

impl TrackScene {
    /// Body 0 is the gear; bodies `1..=num_shoes` are the shoes.
    #[must_use]
    pub fn new(
        geometry: GearPinGeometry,
        num_shoes: usize,
        wrapped: usize,
        seat_penetration: f64,
        omega: f64,
    ) -> Self {
        let mut scene = Self {
            geometry,
            omega,
            wrapped: wrapped.min(num_shoes),
            seat_penetration,
            bodies: vec![Pose::IDENTITY; num_shoes + 1],
        };
        scene.set_time(0.0);
        scene
    }

    pub fn gear(&self) -> BodyHandle {
        BodyHandle(0)
    }

    pub fn shoes(&self) -> Vec<BodyHandle> {
        (1..self.bodies.len()).map(BodyHandle).collect()
    }

    pub fn bodies(&self) -> &[Pose] {
        &self.bodies
    }

    pub fn wrapped(&self) -> usize {
        self.wrapped
    }

    /// Places every body at its pose for time `t`.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_time(&mut self, t: f64) {
        let geom = &self.geometry;
        let gear_rotation = DQuat::from_rotation_z(-self.omega * t);
        self.bodies[0] = Pose::new(DVec3::ZERO, gear_rotation);

        let seated = geom.gear_base_radius() + geom.gear_tooth_radius() + geom.pin_radius()
            - self.seat_penetration;
        let pitch = 2.0 * seated * (std::f64::consts::PI / geom.num_teeth() as f64).sin();
        let run_speed = self.omega * seated;

        for (i, body) in self.bodies.iter_mut().skip(1).enumerate() {
            *body = if i < self.wrapped {
                let tooth = i % geom.num_teeth();
                let rotation = gear_rotation * DQuat::from_rotation_z(-geom.seat_angle(tooth));
                let pin = rotation * DVec3::new(0.0, seated, 0.0);
                Pose::new(pin - rotation * geom.pin_offset(), rotation)
            } else {
                let along = (i - self.wrapped) as f64 * pitch - run_speed * t;
                let pin = DVec3::new(along, -4.0 * seated, 0.0);
                Pose::from_position(pin - geom.pin_offset())
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_shoes_stay_on_seat_circle() {
        let geom = GearPinGeometry::default();
        let mut scene = TrackScene::new(geom.clone(), 6, 3, 0.001, 2.0);
        scene.set_time(0.37);
        let seated = geom.gear_base_radius() + geom.gear_tooth_radius() + geom.pin_radius() - 0.001;

        for shoe in &scene.bodies()[1..=3] {
            let pin = shoe.transform_point(geom.pin_offset());
            assert!((pin.length() - seated).abs() < 1e-9);
        }
        for shoe in &scene.bodies()[4..] {
            let pin = shoe.transform_point(geom.pin_offset());
            assert!(pin.length() > 1.0);
        }
    }

    #[test]
    fn wrap_count_is_clamped() {
        let scene = TrackScene::new(GearPinGeometry::default(), 2, 5, 0.0, 1.0);
        assert_eq!(scene.wrapped(), 2);
        assert_eq!(scene.shoes().len(), 2);
    }
}
