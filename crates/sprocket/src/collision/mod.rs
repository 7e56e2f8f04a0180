//! # Gear-Pin Collision Detection
//!
//! Broad-phase culling and narrow-phase cylinder proximity between a track
//! shoe's pin and the seats of a drive gear.

mod broad_phase;
mod narrow_phase;
mod segment;

pub use broad_phase::*;
pub use narrow_phase::*;
pub use segment::*;

use crate::error::CollisionError;

/// Collision driver configuration
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionConfig {
    /// Number of shoe records the persistent contact cache can hold
    pub cache_capacity: usize,
    /// Slack added to the radius sum so exactly touching cylinders still
    /// count as in contact after rounding
    pub contact_tolerance: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            contact_tolerance: DEFAULT_CONTACT_TOLERANCE,
        }
    }
}

impl CollisionConfig {
    /// Checks the configuration against the number of shoes it will serve.
    ///
    /// # Errors
    ///
    /// Fails when the cache is empty or its capacity does not exceed the
    /// shoe count, or when the contact tolerance is negative or not finite.
    pub fn validate(&self, num_shoes: usize) -> Result<(), CollisionError> {
        if self.cache_capacity == 0 {
            return Err(CollisionError::ZeroCapacity);
        }
        if self.cache_capacity <= num_shoes {
            return Err(CollisionError::CacheCapacity {
                capacity: self.cache_capacity,
                shoes: num_shoes,
            });
        }
        if !self.contact_tolerance.is_finite() || self.contact_tolerance < 0.0 {
            return Err(CollisionError::InvalidTolerance(self.contact_tolerance));
        }
        Ok(())
    }
}

pub const DEFAULT_CONTACT_TOLERANCE: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_small_cache() {
        let config = CollisionConfig {
            cache_capacity: 4,
            ..CollisionConfig::default()
        };
        assert_eq!(
            config.validate(5),
            Err(CollisionError::CacheCapacity { capacity: 4, shoes: 5 })
        );
        assert_eq!(
            config.validate(4),
            Err(CollisionError::CacheCapacity { capacity: 4, shoes: 4 })
        );
        assert!(config.validate(3).is_ok());
    }

    #[test]
    fn config_rejects_bad_tolerance() {
        let config = CollisionConfig {
            contact_tolerance: -1.0,
            ..CollisionConfig::default()
        };
        assert!(matches!(
            config.validate(1),
            Err(CollisionError::InvalidTolerance(_))
        ));
    }
}
