//! # Gear and Pin Geometry
//!
//! Immutable description of the drive gear's tooth seats and the track shoe
//! pins, plus the cylinder endpoints derived from it. All lengths are in
//! meters and all angles in radians.
//!
//! Both the pin and the seat geometry are symmetric about the local XY plane,
//! so only the positive-z half is stored; the negative half is its mirror.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::error::GeometryError;

/// Gear seat and shoe pin dimensions for one sprocket/track design.
///
/// Values are validated once by [`GearPinGeometryBuilder::build`] and never
/// change afterward, so a single instance can be shared read-only by every
/// stage of the collision pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct GearPinGeometry {
    gear_base_radius: f64,
    gear_pitch_radius: f64,
    gear_tooth_radius: f64,
    gear_seat_width_max: f64,
    gear_seat_width_min: f64,
    num_teeth: usize,
    key_angle: f64,
    tooth_mid: DVec3,
    tooth_len: f64,
    tooth_width: f64,
    pin_radius: f64,
    pin_width_max: f64,
    pin_width_min: f64,
    pin_x_offset: f64,
    pin_y_offset: f64,
}

impl GearPinGeometry {
    #[must_use]
    pub fn builder() -> GearPinGeometryBuilder {
        GearPinGeometryBuilder::default()
    }

    /// Gear base circle radius; the seat cylinder axes lie on this circle.
    #[must_use]
    pub fn gear_base_radius(&self) -> f64 {
        self.gear_base_radius
    }

    #[must_use]
    pub fn gear_pitch_radius(&self) -> f64 {
        self.gear_pitch_radius
    }

    /// Radius of the seat cylinder, `pitch - base`.
    #[must_use]
    pub fn gear_tooth_radius(&self) -> f64 {
        self.gear_tooth_radius
    }

    #[must_use]
    pub fn gear_seat_width_max(&self) -> f64 {
        self.gear_seat_width_max
    }

    #[must_use]
    pub fn gear_seat_width_min(&self) -> f64 {
        self.gear_seat_width_min
    }

    #[must_use]
    pub fn num_teeth(&self) -> usize {
        self.num_teeth
    }

    /// Rotation of the first seat away from the gear's +y axis.
    #[must_use]
    pub fn key_angle(&self) -> f64 {
        self.key_angle
    }

    /// Center of the top of a gear tooth, in the gear frame.
    #[must_use]
    pub fn tooth_mid(&self) -> DVec3 {
        self.tooth_mid
    }

    #[must_use]
    pub fn tooth_len(&self) -> f64 {
        self.tooth_len
    }

    #[must_use]
    pub fn tooth_width(&self) -> f64 {
        self.tooth_width
    }

    #[must_use]
    pub fn pin_radius(&self) -> f64 {
        self.pin_radius
    }

    #[must_use]
    pub fn pin_width_max(&self) -> f64 {
        self.pin_width_max
    }

    #[must_use]
    pub fn pin_width_min(&self) -> f64 {
        self.pin_width_min
    }

    /// Pin axis offset from the shoe body origin, in the shoe frame (z = 0).
    #[must_use]
    pub fn pin_offset(&self) -> DVec3 {
        DVec3::new(self.pin_x_offset, self.pin_y_offset, 0.0)
    }

    /// Angle of the seat for tooth `tooth`, measured from the gear's +y axis.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn seat_angle(&self, tooth: usize) -> f64 {
        self.key_angle + TAU * tooth as f64 / self.num_teeth as f64
    }

    /// Computes the pin and per-tooth seat cylinder endpoints.
    #[must_use]
    pub fn layout(&self) -> PinSeatLayout {
        let pin = HalfSegment {
            inner: self.pin_offset() + DVec3::Z * (self.pin_width_min * 0.5),
            outer: self.pin_offset() + DVec3::Z * (self.pin_width_max * 0.5),
        };

        let seats = (0..self.num_teeth)
            .map(|tooth| {
                let (sin, cos) = self.seat_angle(tooth).sin_cos();
                let axis = DVec3::new(
                    self.gear_base_radius * sin,
                    self.gear_base_radius * cos,
                    0.0,
                );
                HalfSegment {
                    inner: axis + DVec3::Z * (self.gear_seat_width_min * 0.5),
                    outer: axis + DVec3::Z * (self.gear_seat_width_max * 0.5),
                }
            })
            .collect();

        PinSeatLayout {
            pin,
            pin_radius: self.pin_radius,
            seats,
            seat_radius: self.gear_tooth_radius,
        }
    }
}

impl Default for GearPinGeometry {
    /// The calibrated M113 sprocket and shoe pin.
    fn default() -> Self {
        let b = GearPinGeometryBuilder::default();
        Self {
            gear_base_radius: b.gear_base_radius,
            gear_pitch_radius: b.gear_pitch_radius,
            gear_tooth_radius: b.gear_pitch_radius - b.gear_base_radius,
            gear_seat_width_max: b.gear_seat_width_max,
            gear_seat_width_min: b.gear_seat_width_min,
            num_teeth: b.num_teeth,
            key_angle: b.key_angle,
            tooth_mid: b.tooth_mid,
            tooth_len: b.tooth_len,
            tooth_width: b.tooth_width,
            pin_radius: b.pin_radius,
            pin_width_max: b.pin_width_max,
            pin_width_min: b.pin_width_min,
            pin_x_offset: b.pin_x_offset,
            pin_y_offset: b.pin_y_offset,
        }
    }
}

/// Builder for [`GearPinGeometry`], pre-filled with the M113 calibration.
#[derive(Clone, Debug)]
pub struct GearPinGeometryBuilder {
    gear_base_radius: f64,
    gear_pitch_radius: f64,
    gear_seat_width_max: f64,
    gear_seat_width_min: f64,
    tooth_mid: DVec3,
    tooth_len: f64,
    tooth_width: f64,
    num_teeth: usize,
    key_angle: f64,
    pin_radius: f64,
    pin_width_max: f64,
    pin_width_min: f64,
    pin_x_offset: f64,
    pin_y_offset: f64,
}

impl Default for GearPinGeometryBuilder {
    fn default() -> Self {
        Self {
            gear_base_radius: 0.211,
            gear_pitch_radius: 0.267,
            gear_seat_width_max: 0.626,
            gear_seat_width_min: 0.458,
            tooth_mid: DVec3::new(0.079_815, 0.247_19, 0.2712),
            tooth_len: 0.013_119,
            tooth_width: 0.0840,
            num_teeth: 10,
            key_angle: 0.0,
            pin_radius: 0.0232,
            pin_width_max: 0.531,
            pin_width_min: 0.38,
            pin_x_offset: -0.075_81,
            pin_y_offset: 0.0,
        }
    }
}

impl GearPinGeometryBuilder {
    #[must_use]
    pub fn gear_radii(mut self, base: f64, pitch: f64) -> Self {
        self.gear_base_radius = base;
        self.gear_pitch_radius = pitch;
        self
    }

    #[must_use]
    pub fn seat_width(mut self, max: f64, min: f64) -> Self {
        self.gear_seat_width_max = max;
        self.gear_seat_width_min = min;
        self
    }

    #[must_use]
    pub fn tooth(mut self, mid: DVec3, len: f64, width: f64) -> Self {
        self.tooth_mid = mid;
        self.tooth_len = len;
        self.tooth_width = width;
        self
    }

    #[must_use]
    pub fn num_teeth(mut self, num_teeth: usize) -> Self {
        self.num_teeth = num_teeth;
        self
    }

    #[must_use]
    pub fn key_angle(mut self, key_angle: f64) -> Self {
        self.key_angle = key_angle;
        self
    }

    #[must_use]
    pub fn pin_radius(mut self, radius: f64) -> Self {
        self.pin_radius = radius;
        self
    }

    #[must_use]
    pub fn pin_width(mut self, max: f64, min: f64) -> Self {
        self.pin_width_max = max;
        self.pin_width_min = min;
        self
    }

    #[must_use]
    pub fn pin_offset(mut self, x: f64, y: f64) -> Self {
        self.pin_x_offset = x;
        self.pin_y_offset = y;
        self
    }

    /// Validates the dimensions and freezes them.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] when any parameter is non-finite, a
    /// max/min width pair is not strictly increasing, the pitch radius does
    /// not exceed the base radius, or the gear has no teeth.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn build(self) -> Result<GearPinGeometry, GeometryError> {
        let scalars = [
            ("gear_base_radius", self.gear_base_radius),
            ("gear_pitch_radius", self.gear_pitch_radius),
            ("gear_seat_width_max", self.gear_seat_width_max),
            ("gear_seat_width_min", self.gear_seat_width_min),
            ("tooth_len", self.tooth_len),
            ("tooth_width", self.tooth_width),
            ("key_angle", self.key_angle),
            ("pin_radius", self.pin_radius),
            ("pin_width_max", self.pin_width_max),
            ("pin_width_min", self.pin_width_min),
            ("pin_x_offset", self.pin_x_offset),
            ("pin_y_offset", self.pin_y_offset),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GeometryError::NonFinite(*name));
        }
        if !self.tooth_mid.is_finite() {
            return Err(GeometryError::NonFinite("tooth_mid"));
        }

        if !(self.gear_seat_width_max - self.gear_seat_width_min > 0.0) {
            return Err(GeometryError::SeatWidth {
                max: self.gear_seat_width_max,
                min: self.gear_seat_width_min,
            });
        }
        if !(self.pin_width_max - self.pin_width_min > 0.0) {
            return Err(GeometryError::PinWidth {
                max: self.pin_width_max,
                min: self.pin_width_min,
            });
        }
        if !(self.gear_pitch_radius - self.gear_base_radius > 0.0) {
            return Err(GeometryError::ToothRadius {
                pitch: self.gear_pitch_radius,
                base: self.gear_base_radius,
            });
        }
        if self.num_teeth == 0 {
            return Err(GeometryError::NoTeeth);
        }

        Ok(GearPinGeometry {
            gear_base_radius: self.gear_base_radius,
            gear_pitch_radius: self.gear_pitch_radius,
            gear_tooth_radius: self.gear_pitch_radius - self.gear_base_radius,
            gear_seat_width_max: self.gear_seat_width_max,
            gear_seat_width_min: self.gear_seat_width_min,
            num_teeth: self.num_teeth,
            key_angle: self.key_angle,
            tooth_mid: self.tooth_mid,
            tooth_len: self.tooth_len,
            tooth_width: self.tooth_width,
            pin_radius: self.pin_radius,
            pin_width_max: self.pin_width_max,
            pin_width_min: self.pin_width_min,
            pin_x_offset: self.pin_x_offset,
            pin_y_offset: self.pin_y_offset,
        })
    }
}

/// Positive-z half of a cylinder axis, inner (mid-plane side) to outer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfSegment {
    pub inner: DVec3,
    pub outer: DVec3,
}

impl HalfSegment {
    /// The same half reflected through the local XY plane.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let flip = DVec3::new(1.0, 1.0, -1.0);
        Self {
            inner: self.inner * flip,
            outer: self.outer * flip,
        }
    }
}

/// Cylinder endpoints derived from a [`GearPinGeometry`].
///
/// The pin is expressed in the shoe frame and each seat in the gear frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PinSeatLayout {
    pub pin: HalfSegment,
    pub pin_radius: f64,
    pub seats: Vec<HalfSegment>,
    pub seat_radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_validated_build() {
        let built = GearPinGeometry::builder().build().unwrap();
        assert_eq!(built, GearPinGeometry::default());
        assert!((built.gear_tooth_radius() - 0.056).abs() < 1e-12);
    }

    #[test]
    fn rejects_each_broken_invariant() {
        let seat = GearPinGeometry::builder().seat_width(0.4, 0.4).build();
        assert!(matches!(seat, Err(GeometryError::SeatWidth { .. })));

        let pin = GearPinGeometry::builder().pin_width(0.3, 0.38).build();
        assert!(matches!(pin, Err(GeometryError::PinWidth { .. })));

        let radius = GearPinGeometry::builder().gear_radii(0.3, 0.267).build();
        assert!(matches!(radius, Err(GeometryError::ToothRadius { .. })));

        let teeth = GearPinGeometry::builder().num_teeth(0).build();
        assert_eq!(teeth, Err(GeometryError::NoTeeth));
    }

    #[test]
    fn rejects_nan() {
        let result = GearPinGeometry::builder().pin_radius(f64::NAN).build();
        assert_eq!(result, Err(GeometryError::NonFinite("pin_radius")));
    }

    #[test]
    fn first_seat_sits_above_center() {
        let layout = GearPinGeometry::default().layout();
        assert_eq!(layout.seats.len(), 10);
        let seat = layout.seats[0];
        assert!(seat.inner.x.abs() < 1e-12);
        assert!((seat.inner.y - 0.211).abs() < 1e-12);
        assert!((seat.inner.z - 0.229).abs() < 1e-12);
        assert!((seat.outer.z - 0.313).abs() < 1e-12);
    }

    #[test]
    fn seats_are_evenly_spaced() {
        let geom = GearPinGeometry::builder().num_teeth(4).build().unwrap();
        let layout = geom.layout();
        // quarter turn moves the seat from +y to +x
        assert!((layout.seats[1].inner.x - 0.211).abs() < 1e-12);
        assert!(layout.seats[1].inner.y.abs() < 1e-12);
        for seat in &layout.seats {
            let r = seat.inner.truncate().length();
            assert!((r - geom.gear_base_radius()).abs() < 1e-12);
        }
    }

    #[test]
    fn pin_half_is_mirrored_through_mid_plane() {
        let layout = GearPinGeometry::default().layout();
        let mirrored = layout.pin.mirrored();
        assert!((mirrored.inner.z + 0.19).abs() < 1e-12);
        assert!((mirrored.outer.z + 0.2655).abs() < 1e-12);
        assert_eq!(mirrored.inner.x, layout.pin.inner.x);
    }
}
