//! Narrow-phase test between a shoe pin and the gear seat cylinders
//!
//! Each cylinder is reduced to its axis segment plus a radius. A pin half and
//! a seat half are in contact when their axes come within the radius sum.

use glam::DVec3;

use super::segment::{closest_points, Segment};
use crate::geometry::{HalfSegment, PinSeatLayout};
use crate::types::Pose;

/// Axis separation below which the contact normal is undefined.
const MIN_AXIS_SEPARATION: f64 = 1e-12;

/// Which mirrored half of the pin produced a contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Local +z half
    Positive,
    /// Local -z half
    Negative,
}

/// One pin-seat contact, in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinSeatContact {
    pub tooth: usize,
    pub side: Side,
    /// Contact point on the gear seat surface
    pub point_on_gear: DVec3,
    /// Contact point on the pin surface
    pub point_on_pin: DVec3,
    /// Unit normal from the gear toward the pin
    pub normal: DVec3,
    /// Overlap depth, never negative
    pub penetration: f64,
}

/// Tests the shoe's pin against every seat of the gear.
///
/// Each pin half is checked against both halves of each seat and the deepest
/// pairing is reported, so at most one contact is produced per tooth.
/// Contacts for several teeth are all returned; choosing between them is left
/// to the solver.
#[must_use]
pub fn detect_pin_seat_contacts(
    layout: &PinSeatLayout,
    gear: &Pose,
    shoe: &Pose,
    tolerance: f64,
) -> Vec<PinSeatContact> {
    let sides = [
        (Side::Positive, layout.pin),
        (Side::Negative, layout.pin.mirrored()),
    ];
    let pins = sides.map(|(side, half)| (side, to_world(shoe, &half)));

    let mut contacts = Vec::new();
    for (tooth, seat) in layout.seats.iter().enumerate() {
        let seat_halves = [*seat, seat.mirrored()].map(|half| to_world(gear, &half));

        // a pose flipped about x or y faces a pin half toward the opposite
        // seat half, so every pairing is tested
        let deepest = pins
            .iter()
            .flat_map(|pin| seat_halves.iter().map(move |seat| (pin, seat)))
            .filter_map(|((side, pin), seat)| {
                cylinder_contact(seat, layout.seat_radius, pin, layout.pin_radius, tolerance)
                    .map(|c| (*side, c))
            })
            .fold(None, |best: Option<(Side, CylinderContact)>, candidate| match best {
                Some(b) if b.1.penetration >= candidate.1.penetration => Some(b),
                _ => Some(candidate),
            });

        if let Some((side, c)) = deepest {
            contacts.push(PinSeatContact {
                tooth,
                side,
                point_on_gear: c.point_a,
                point_on_pin: c.point_b,
                normal: c.normal,
                penetration: c.penetration,
            });
        }
    }
    contacts
}

/// Contact between two finite cylinders given by axis segment and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CylinderContact {
    pub point_a: DVec3,
    pub point_b: DVec3,
    /// Unit normal from cylinder A toward cylinder B
    pub normal: DVec3,
    pub penetration: f64,
}

/// Returns the contact between cylinder A and cylinder B, if any.
///
/// Touching cylinders (axis distance equal to the radius sum within
/// `tolerance`) count as contact with zero penetration. Degenerate or
/// coincident axes yield `None`.
#[must_use]
pub fn cylinder_contact(
    axis_a: &Segment,
    radius_a: f64,
    axis_b: &Segment,
    radius_b: f64,
    tolerance: f64,
) -> Option<CylinderContact> {
    let closest = closest_points(axis_a, axis_b)?;
    let reach = radius_a + radius_b;
    if closest.distance > reach + tolerance || closest.distance < MIN_AXIS_SEPARATION {
        return None;
    }

    let normal = (closest.on_second - closest.on_first) / closest.distance;
    if !normal.is_finite() {
        return None;
    }
    Some(CylinderContact {
        point_a: closest.on_first + normal * radius_a,
        point_b: closest.on_second - normal * radius_b,
        normal,
        penetration: (reach - closest.distance).max(0.0),
    })
}

fn to_world(pose: &Pose, half: &HalfSegment) -> Segment {
    Segment::new(pose.transform_point(half.inner), pose.transform_point(half.outer))
}
