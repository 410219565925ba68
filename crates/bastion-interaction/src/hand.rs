//! Hand tracking samples.

use glam::Vec3;

use bastion_core::enums::Handedness;
use bastion_core::types::Pose;

/// Joint data of one hand for one frame. Joints the runtime could not
/// resolve are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandPose {
    pub tracked: bool,
    pub index_tip: Option<Vec3>,
    pub thumb_tip: Option<Vec3>,
    pub wrist: Option<Pose>,
    /// Direction the palm faces.
    pub palm_normal: Option<Vec3>,
}

impl HandPose {
    pub fn untracked() -> Self {
        Self::default()
    }

    /// A tracked hand with only fingertip data.
    pub fn fingertips(index_tip: Vec3, thumb_tip: Vec3) -> Self {
        Self {
            tracked: true,
            index_tip: Some(index_tip),
            thumb_tip: Some(thumb_tip),
            ..Self::default()
        }
    }

    pub fn with_wrist(mut self, wrist: Pose, palm_normal: Vec3) -> Self {
        self.wrist = Some(wrist);
        self.palm_normal = Some(palm_normal);
        self
    }

    /// Thumb tip to index tip distance.
    pub fn pinch_distance(&self) -> Option<f32> {
        if !self.tracked {
            return None;
        }
        Some(self.thumb_tip?.distance(self.index_tip?))
    }

    /// Midpoint between thumb tip and index tip.
    pub fn pinch_center(&self) -> Option<Vec3> {
        if !self.tracked {
            return None;
        }
        Some((self.thumb_tip? + self.index_tip?) * 0.5)
    }
}

/// Head and both hands for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandFrame {
    pub head: Pose,
    pub left: HandPose,
    pub right: HandPose,
}

impl HandFrame {
    pub fn hand(&self, handedness: Handedness) -> &HandPose {
        match handedness {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }
}

/// Latest sample of one hand.
#[derive(Debug, Clone)]
pub struct HandTracker {
    handedness: Handedness,
    pose: HandPose,
}

impl HandTracker {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            pose: HandPose::untracked(),
        }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn update(&mut self, frame: &HandFrame) {
        let pose = *frame.hand(self.handedness);
        if pose.tracked != self.pose.tracked {
            log::debug!(
                "{:?} hand tracking {}",
                self.handedness,
                if pose.tracked { "acquired" } else { "lost" }
            );
        }
        self.pose = pose;
    }

    pub fn pose(&self) -> &HandPose {
        &self.pose
    }

    pub fn is_tracked(&self) -> bool {
        self.pose.tracked
    }

    /// Index fingertip position while tracked.
    pub fn index_tip(&self) -> Option<Vec3> {
        self.pose.tracked.then_some(self.pose.index_tip).flatten()
    }

    pub fn is_hovering_over_point(&self, point: Vec3, distance: f32) -> bool {
        self.distance_to_point(point) <= distance
    }

    /// Index fingertip distance to `point`. Infinite when untracked.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.index_tip()
            .map_or(f32::INFINITY, |tip| tip.distance(point))
    }
}
