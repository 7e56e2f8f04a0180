//! # Gear-Pin Collision Callback
//!
//! Per-step driver invoked by the host simulation after body poses are
//! updated and before its contact solver runs. For every shoe it runs the
//! broad phase, then the narrow phase on survivors, submits the resulting
//! contacts with their warm-start reactions attached, and advances the
//! shoe's persistence state.
//!
//! The contact cache is keyed by shoe only, so a shoe engaging two teeth in
//! the same step shares one warm-start record between both contacts. In
//! normal operation only one seat carries a given pin at a time.

use glam::DVec3;

use crate::cache::ContactCache;
use crate::collision::{
    detect_pin_seat_contacts, BoundingSpheres, CollisionConfig, PinSeatContact, Side,
};
use crate::error::CollisionError;
use crate::geometry::{GearPinGeometry, PinSeatLayout};
use crate::persistence::{PersistenceTracker, ShoeEngagement};
use crate::types::{BodyHandle, Pose, Reactions, ShoeId};

/// Read-only access to body poses owned by the host simulation.
pub trait BodyRegistry: Sync {
    /// Current world pose of `body`, or `None` if the handle is stale.
    fn pose(&self, body: BodyHandle) -> Option<Pose>;
}

impl BodyRegistry for [Pose] {
    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.get(body.index()).copied()
    }
}

impl BodyRegistry for Vec<Pose> {
    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.as_slice().pose(body)
    }
}

/// Destination for contacts, usually the host solver's contact container.
pub trait ContactSink {
    fn add_contact(&mut self, contact: ContactRecord);
}

impl ContactSink for Vec<ContactRecord> {
    fn add_contact(&mut self, contact: ContactRecord) {
        self.push(contact);
    }
}

/// A gear-pin contact as handed to the contact solver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactRecord {
    /// The gear
    pub body_a: BodyHandle,
    /// The shoe
    pub body_b: BodyHandle,
    pub point_a: DVec3,
    pub point_b: DVec3,
    /// Unit normal from body A toward body B
    pub normal: DVec3,
    /// Overlap depth, never negative
    pub penetration: f64,
    /// Reactions cached for this shoe at the start of the step
    pub warm_start: Reactions,
    pub shoe: ShoeId,
    pub tooth: usize,
    pub side: Side,
    /// Consecutive engaged steps of the shoe before this one
    pub persistent_steps: usize,
}

impl ContactRecord {
    /// Signed separation, negative while penetrating.
    #[must_use]
    pub fn distance(&self) -> f64 {
        -self.penetration
    }
}

/// Summary of one collision pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub shoes_tested: usize,
    pub broad_phase_passed: usize,
    pub contacts: usize,
    pub engaged_shoes: usize,
}

/// Result of the pure detection stage for one shoe.
struct ShoeOutcome {
    passed_broad_phase: bool,
    contacts: Vec<PinSeatContact>,
}

impl ShoeOutcome {
    const MISS: Self = Self {
        passed_broad_phase: false,
        contacts: Vec::new(),
    };
}

pub struct GearPinCollision {
    gear: BodyHandle,
    shoes: Vec<BodyHandle>,
    geometry: GearPinGeometry,
    layout: PinSeatLayout,
    bounds: BoundingSpheres,
    config: CollisionConfig,
    cache: ContactCache,
    persistence: PersistenceTracker,
    contacts_last_step: usize,
    total_contacts: u64,
    steps: u64,
}

impl GearPinCollision {
    /// Sets up collision between `gear` and the shoe chain `shoes`.
    ///
    /// Shoe ids are positions in `shoes`.
    ///
    /// # Errors
    ///
    /// Fails if `config` cannot serve `shoes.len()` shoes.
    pub fn new(
        gear: BodyHandle,
        shoes: Vec<BodyHandle>,
        geometry: GearPinGeometry,
        config: CollisionConfig,
    ) -> Result<Self, CollisionError> {
        config.validate(shoes.len())?;

        let layout = geometry.layout();
        let bounds = BoundingSpheres::from_geometry(&geometry);
        let cache = ContactCache::new(config.cache_capacity)?;
        let persistence = PersistenceTracker::new(shoes.len());

        tracing::info!(
            "Gear-pin collision ready: {} shoes, {} teeth, \
             bounding radii gear={:.4} shoe={:.4}, cache capacity {}",
            shoes.len(),
            geometry.num_teeth(),
            bounds.gear_radius,
            bounds.shoe_radius,
            config.cache_capacity
        );

        Ok(Self {
            gear,
            shoes,
            geometry,
            layout,
            bounds,
            config,
            cache,
            persistence,
            contacts_last_step: 0,
            total_contacts: 0,
            steps: 0,
        })
    }

    /// Runs one collision pass and submits every contact to `sink`.
    ///
    /// A shoe or gear whose pose cannot be resolved is treated as out of
    /// contact for this step.
    pub fn perform_collision<R, S>(&mut self, bodies: &R, sink: &mut S) -> StepReport
    where
        R: BodyRegistry + ?Sized,
        S: ContactSink + ?Sized,
    {
        self.steps += 1;
        let outcomes = match bodies.pose(self.gear) {
            Some(gear_pose) => self.detect_all(&gear_pose, bodies),
            None => {
                tracing::warn!(
                    "Gear body {} has no pose, skipping collision pass",
                    self.gear.index()
                );
                std::iter::repeat_with(|| ShoeOutcome::MISS)
                    .take(self.shoes.len())
                    .collect()
            }
        };

        let mut report = StepReport {
            shoes_tested: self.shoes.len(),
            ..StepReport::default()
        };

        for (index, outcome) in outcomes.into_iter().enumerate() {
            let shoe = ShoeId(index);
            let in_contact = !outcome.contacts.is_empty();
            if outcome.passed_broad_phase {
                report.broad_phase_passed += 1;
            }

            if in_contact {
                let persistent_steps = self.persistence.persistent_steps(index);
                // copy before the solver writes this step's reactions back
                let warm_start = *self.cache.get_or_create(shoe);

                for contact in &outcome.contacts {
                    let record = ContactRecord {
                        body_a: self.gear,
                        body_b: self.shoes[index],
                        point_a: contact.point_on_gear,
                        point_b: contact.point_on_pin,
                        normal: contact.normal,
                        penetration: contact.penetration,
                        warm_start,
                        shoe,
                        tooth: contact.tooth,
                        side: contact.side,
                        persistent_steps,
                    };
                    tracing::trace!(
                        "shoe {} tooth {} {:?}: penetration {:.6}",
                        index,
                        contact.tooth,
                        contact.side,
                        contact.penetration
                    );
                    sink.add_contact(record);
                    report.contacts += 1;
                    self.total_contacts += 1;
                }
                report.engaged_shoes += 1;
            }

            self.persistence.advance(index, in_contact);
        }

        self.contacts_last_step = report.contacts;
        tracing::debug!(
            "Collision step {}: {} of {} shoes passed broad phase, {} contacts, {} shoes engaged",
            self.steps,
            report.broad_phase_passed,
            report.shoes_tested,
            report.contacts,
            report.engaged_shoes
        );
        report
    }

    #[cfg(not(feature = "parallel"))]
    fn detect_all<R>(&self, gear: &Pose, bodies: &R) -> Vec<ShoeOutcome>
    where
        R: BodyRegistry + ?Sized,
    {
        (0..self.shoes.len())
            .map(|index| self.detect_shoe(index, gear, bodies))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn detect_all<R>(&self, gear: &Pose, bodies: &R) -> Vec<ShoeOutcome>
    where
        R: BodyRegistry + ?Sized,
    {
        use rayon::prelude::*;

        (0..self.shoes.len())
            .into_par_iter()
            .map(|index| self.detect_shoe(index, gear, bodies))
            .collect()
    }

    fn detect_shoe<R>(&self, index: usize, gear: &Pose, bodies: &R) -> ShoeOutcome
    where
        R: BodyRegistry + ?Sized,
    {
        let handle = self.shoes[index];
        let Some(shoe) = bodies.pose(handle) else {
            tracing::warn!("Shoe body {} has no pose, treating as free", handle.index());
            return ShoeOutcome::MISS;
        };

        let tolerance = self.config.contact_tolerance;
        if !self.bounds.overlaps(gear, &shoe, &self.geometry, tolerance) {
            return ShoeOutcome::MISS;
        }

        ShoeOutcome {
            passed_broad_phase: true,
            contacts: detect_pin_seat_contacts(&self.layout, gear, &shoe, tolerance),
        }
    }

    /// Records the reactions the solver computed for `shoe` this step, to be
    /// used as its warm start next step.
    ///
    /// # Panics
    ///
    /// Panics if `shoe` is not one of the shoes this driver was built with.
    pub fn store_reactions(&mut self, shoe: ShoeId, reactions: Reactions) {
        assert!(
            shoe.index() < self.shoes.len(),
            "shoe index {} out of range for {} shoes",
            shoe.index(),
            self.shoes.len()
        );
        *self.cache.get_or_create(shoe) = reactions;
    }

    /// Cached reactions for `shoe`, if it has ever been in contact.
    #[must_use]
    pub fn reactions(&self, shoe: ShoeId) -> Option<Reactions> {
        self.cache.find(shoe).copied()
    }

    /// Contacts submitted by the most recent pass.
    #[must_use]
    pub fn contacts_last_step(&self) -> usize {
        self.contacts_last_step
    }

    /// Contacts submitted since construction.
    #[must_use]
    pub fn total_contacts(&self) -> u64 {
        self.total_contacts
    }

    /// Number of collision passes performed.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// # Panics
    ///
    /// Panics if `shoe` is not a valid shoe index.
    #[must_use]
    pub fn contact_prev_step(&self, shoe: usize) -> bool {
        self.persistence.contact_prev_step(shoe)
    }

    /// # Panics
    ///
    /// Panics if `shoe` is not a valid shoe index.
    #[must_use]
    pub fn persistent_contact_steps(&self, shoe: usize) -> usize {
        self.persistence.persistent_steps(shoe)
    }

    /// # Panics
    ///
    /// Panics if `shoe` is not a valid shoe id.
    #[must_use]
    pub fn engagement(&self, shoe: ShoeId) -> ShoeEngagement {
        self.persistence.engagement(shoe.index())
    }

    #[must_use]
    pub fn cache(&self) -> &ContactCache {
        &self.cache
    }

    #[must_use]
    pub fn geometry(&self) -> &GearPinGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn bounding_spheres(&self) -> BoundingSpheres {
        self.bounds
    }

    #[must_use]
    pub fn gear(&self) -> BodyHandle {
        self.gear
    }

    #[must_use]
    pub fn shoes(&self) -> &[BodyHandle] {
        &self.shoes
    }
}
