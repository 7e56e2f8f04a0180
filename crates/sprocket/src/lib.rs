#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Sprocket: Gear-Pin Contact Detection
//!
//! Custom collision detection between a tracked vehicle's drive gear and the
//! pins of its track shoes. The concave seat at the base of each gear tooth
//! cannot be captured by convex hulls or meshes, so this crate reasons
//! directly about the analytic pin and seat cylinders and feeds the contacts
//! it finds to an external contact solver.
//!
//! ## Key Components
//!
//! -   **Geometry:** [`GearPinGeometry`] holds the validated gear and pin
//!     dimensions and derives the cylinder endpoints used by the tests.
//! -   **Detection:** the [`collision`] module provides the bounding-sphere
//!     broad phase and the cylinder-cylinder narrow phase.
//! -   **Persistence:** [`ContactCache`] keeps each shoe's last solver
//!     reactions for warm starting, and [`PersistenceTracker`] counts how
//!     long each shoe has stayed seated.
//! -   **Driver:** [`GearPinCollision`] runs all of the above once per step
//!     and submits contacts to any [`ContactSink`].
//!
//! ## Usage
//!
//! ```rust
//! use sprocket::{
//!     BodyHandle, CollisionConfig, ContactRecord, GearPinCollision, GearPinGeometry, Pose,
//! };
//!
//! let mut collision = GearPinCollision::new(
//!     BodyHandle(0),
//!     vec![BodyHandle(1)],
//!     GearPinGeometry::default(),
//!     CollisionConfig::default(),
//! )?;
//!
//! let bodies = vec![Pose::IDENTITY, Pose::from_position(glam::DVec3::new(5.0, 0.0, 0.0))];
//! let mut contacts: Vec<ContactRecord> = Vec::new();
//! let report = collision.perform_collision(&bodies, &mut contacts);
//! assert_eq!(report.contacts, 0);
//! # Ok::<(), sprocket::CollisionError>(())
//! ```

pub mod cache;
pub mod callback;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod persistence;
pub mod types;

pub use cache::ContactCache;
pub use callback::{BodyRegistry, ContactRecord, ContactSink, GearPinCollision, StepReport};
pub use collision::{BoundingSpheres, CollisionConfig, PinSeatContact, Side};
pub use error::{CollisionError, GeometryError};
pub use geometry::{GearPinGeometry, GearPinGeometryBuilder, HalfSegment, PinSeatLayout};
pub use persistence::{EngagementState, PersistenceTracker, ShoeEngagement};
pub use types::{BodyHandle, Pose, Reactions, ShoeId};
