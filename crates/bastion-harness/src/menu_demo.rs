//! Scripted hand motion that drops a rocket launcher from the wrist menu.

use glam::Vec3;

use bastion_core::enums::{Handedness, TowerKind};
use bastion_core::types::Pose;
use bastion_interaction::hand::{HandFrame, HandPose};
use bastion_interaction::WristMenu;

const HEAD: Vec3 = Vec3::new(0.0, 1.6, 0.0);
const WRIST: Vec3 = Vec3::new(0.0, 1.2, 0.3);

/// Fingertip offset from the button centre while hovering.
const HOVER_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 0.01);
const THUMB_OPEN: Vec3 = Vec3::new(0.0, 0.0, 0.06);
const THUMB_CLOSED: Vec3 = Vec3::new(0.0, 0.0, 0.01);

/// Hands for `frame`: the menu palm faces the head throughout, the pointer
/// hovers the rocket button, pinches, then lets go.
pub fn hands(frame: u32, menu: &WristMenu, menu_hand: Handedness) -> HandFrame {
    let palm = (HEAD - WRIST).normalize_or_zero();
    let menu_pose = HandPose {
        tracked: true,
        ..HandPose::untracked()
    }
    .with_wrist(Pose::at(WRIST), palm);

    let target = menu
        .buttons()
        .iter()
        .find(|button| button.tower() == TowerKind::RocketLauncher)
        .map(|button| button.center());
    let pointer = match (frame, target) {
        (10..=19, Some(center)) | (30..=39, Some(center)) => {
            let index = center + HOVER_OFFSET;
            HandPose::fingertips(index, index + THUMB_OPEN)
        }
        (20..=29, Some(center)) => {
            let index = center + HOVER_OFFSET;
            HandPose::fingertips(index, index + THUMB_CLOSED)
        }
        _ => HandPose::untracked(),
    };

    let (left, right) = match menu_hand {
        Handedness::Left => (menu_pose, pointer),
        Handedness::Right => (pointer, menu_pose),
    };
    HandFrame {
        head: Pose::at(HEAD),
        left,
        right,
    }
}
