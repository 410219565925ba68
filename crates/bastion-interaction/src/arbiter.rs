//! Exclusive hover and pinch ownership among menu buttons.
//!
//! At most one candidate holds hover and at most one holds pinch. A new
//! candidate takes a slot over the holder only when it reports a strictly
//! smaller distance; on equal distance the holder keeps the slot. A
//! separate latch records the first candidate whose pinch triggered an
//! action, and blocks every other trigger until cleared.

/// Identifier of a candidate competing for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub u32);

/// Outcome of a slot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The requester now holds the slot (or already did).
    Granted,
    /// The requester took the slot from this candidate, which must be
    /// force-exited before anything else runs.
    Preempted(CandidateId),
    /// Someone closer holds the slot.
    Denied,
}

impl Claim {
    pub fn is_granted(self) -> bool {
        !matches!(self, Claim::Denied)
    }

    /// The candidate that lost the slot, if any.
    pub fn preempted(self) -> Option<CandidateId> {
        match self {
            Claim::Preempted(previous) => Some(previous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    holder: Option<(CandidateId, f32)>,
}

impl Slot {
    fn request(&mut self, candidate: CandidateId, distance: f32) -> Claim {
        match self.holder {
            None => {
                self.holder = Some((candidate, distance));
                Claim::Granted
            }
            Some((holder, _)) if holder == candidate => {
                self.holder = Some((candidate, distance));
                Claim::Granted
            }
            Some((holder, held)) if distance < held => {
                self.holder = Some((candidate, distance));
                Claim::Preempted(holder)
            }
            Some(_) => Claim::Denied,
        }
    }

    fn release(&mut self, candidate: CandidateId) -> bool {
        match self.holder {
            Some((holder, _)) if holder == candidate => {
                self.holder = None;
                true
            }
            _ => false,
        }
    }

    fn holder(&self) -> Option<CandidateId> {
        self.holder.map(|(holder, _)| holder)
    }
}

/// Hover and pinch arbitration shared by every button of one menu.
#[derive(Debug, Clone, Default)]
pub struct InteractionArbiter {
    hover: Slot,
    pinch: Slot,
    pinch_trigger: Option<CandidateId>,
}

impl InteractionArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim hover at `distance` from the fingertip. A holder re-requesting
    /// refreshes its distance.
    pub fn request_hover(&mut self, candidate: CandidateId, distance: f32) -> Claim {
        let claim = self.hover.request(candidate, distance);
        if let Claim::Preempted(previous) = claim {
            log::trace!("hover moved from {previous:?} to {candidate:?}");
        }
        claim
    }

    /// Clear hover if `candidate` holds it. Otherwise a no-op.
    pub fn release_hover(&mut self, candidate: CandidateId) {
        self.hover.release(candidate);
    }

    pub fn hover_holder(&self) -> Option<CandidateId> {
        self.hover.holder()
    }

    pub fn request_pinch(&mut self, candidate: CandidateId, distance: f32) -> Claim {
        let claim = self.pinch.request(candidate, distance);
        if let Claim::Preempted(previous) = claim {
            log::trace!("pinch moved from {previous:?} to {candidate:?}");
        }
        claim
    }

    pub fn release_pinch(&mut self, candidate: CandidateId) {
        self.pinch.release(candidate);
    }

    pub fn pinch_holder(&self) -> Option<CandidateId> {
        self.pinch.holder()
    }

    /// Record that `candidate` triggered its pinch action. Only the first
    /// trigger is kept until `clear_pinch_action_trigger`. Returns whether
    /// this call recorded it.
    pub fn set_pinch_action_triggered(&mut self, candidate: CandidateId) -> bool {
        if self.pinch_trigger.is_some() {
            return false;
        }
        self.pinch_trigger = Some(candidate);
        true
    }

    pub fn clear_pinch_action_trigger(&mut self) {
        self.pinch_trigger = None;
    }

    pub fn has_any_button_triggered_pinch_action(&self) -> bool {
        self.pinch_trigger.is_some()
    }

    pub fn pinch_action_owner(&self) -> Option<CandidateId> {
        self.pinch_trigger
    }
}
