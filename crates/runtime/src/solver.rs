//! Stand-in contact solver.
//!
//! Collects gear-pin contacts for a step, turns each into a penalty force
//! blended with its warm start, and hands the result back to the collision
//! driver's cache for the next step.

use sprocket::{ContactRecord, ContactSink, GearPinCollision, Reactions};

pub struct PenaltySolver {
    stiffness: f64,
    warm_start_weight: f32,
    contacts: Vec<ContactRecord>,
}

impl PenaltySolver {
    #[must_use]
    pub fn new(stiffness: f64, warm_start_weight: f32) -> Self {
        Self {
            stiffness,
            warm_start_weight,
            contacts: Vec::new(),
        }
    }

    /// Solves the collected contacts and writes reactions back.
    ///
    /// Returns the largest normal force magnitude produced this step.
    #[allow(clippy::cast_possible_truncation)]
    pub fn solve(&mut self, collision: &mut GearPinCollision) -> f32 {
        let mut peak = 0.0_f32;
        for contact in self.contacts.drain(..) {
            let force = contact.normal * (self.stiffness * contact.penetration);
            let fresh = [force.x as f32, force.y as f32, force.z as f32, 0.0, 0.0, 0.0];

            let mut blended = [0.0_f32; Reactions::SLOTS];
            let pairs = fresh.iter().zip(contact.warm_start.0.iter());
            for (slot, (new, old)) in blended.iter_mut().zip(pairs) {
                *slot = (1.0 - self.warm_start_weight) * new + self.warm_start_weight * old;
            }
            let reactions = Reactions::new(blended);
            let [fx, fy, fz] = reactions.force();
            peak = peak.max((fx * fx + fy * fy + fz * fz).sqrt());

            collision.store_reactions(contact.shoe, reactions);
        }
        peak
    }
}

impl ContactSink for PenaltySolver {
    fn add_contact(&mut self, contact: ContactRecord) {
        self.contacts.push(contact);
    }
}
