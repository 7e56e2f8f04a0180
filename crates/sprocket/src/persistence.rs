//! Per-shoe contact persistence.
//!
//! Tracks whether each shoe touched the gear last step and for how many
//! consecutive steps it has stayed engaged.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngagementState {
    Free,
    Engaged,
}

/// Engagement of one shoe after the most recent step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShoeEngagement {
    pub contact_prev_step: bool,
    pub persistent_steps: usize,
}

impl ShoeEngagement {
    #[must_use]
    pub fn state(&self) -> EngagementState {
        if self.contact_prev_step {
            EngagementState::Engaged
        } else {
            EngagementState::Free
        }
    }

    /// Moves to the next step given whether contact was found in it.
    pub fn advance(&mut self, in_contact: bool) {
        if in_contact {
            self.persistent_steps = if self.contact_prev_step {
                self.persistent_steps + 1
            } else {
                1
            };
        } else {
            self.persistent_steps = 0;
        }
        self.contact_prev_step = in_contact;
    }
}

#[derive(Clone, Debug, Default)]
pub struct PersistenceTracker {
    shoes: Vec<ShoeEngagement>,
}

impl PersistenceTracker {
    #[must_use]
    pub fn new(num_shoes: usize) -> Self {
        Self {
            shoes: vec![ShoeEngagement::default(); num_shoes],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shoes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shoes.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `shoe` is out of range.
    pub fn advance(&mut self, shoe: usize, in_contact: bool) {
        self.check(shoe);
        self.shoes[shoe].advance(in_contact);
    }

    /// # Panics
    ///
    /// Panics if `shoe` is out of range.
    #[must_use]
    pub fn engagement(&self, shoe: usize) -> ShoeEngagement {
        self.check(shoe);
        self.shoes[shoe]
    }

    /// # Panics
    ///
    /// Panics if `shoe` is out of range.
    #[must_use]
    pub fn contact_prev_step(&self, shoe: usize) -> bool {
        self.engagement(shoe).contact_prev_step
    }

    /// # Panics
    ///
    /// Panics if `shoe` is out of range.
    #[must_use]
    pub fn persistent_steps(&self, shoe: usize) -> usize {
        self.engagement(shoe).persistent_steps
    }

    /// Number of shoes currently engaged.
    #[must_use]
    pub fn engaged_count(&self) -> usize {
        self.shoes.iter().filter(|s| s.contact_prev_step).count()
    }

    fn check(&self, shoe: usize) {
        assert!(
            shoe < self.shoes.len(),
            "shoe index {shoe} out of range for {} tracked shoes",
            self.shoes.len()
        );
    }
}
