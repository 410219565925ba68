//! A wrist menu button pressed by hovering a fingertip and pinching.
//!
//! Each frame the owning menu runs the button in three phases:
//! `check_hover`, `check_pinch` and `apply_edges`. Hover and pinch are
//! claimed through the shared `InteractionArbiter`; a claim that preempts
//! another button is returned to the menu, which force-exits the loser
//! before the next phase runs. Feedback is edge-triggered: each transition
//! emits one `InteractionEvent`.

use glam::{Quat, Vec3};

use bastion_core::commands::Command;
use bastion_core::enums::{ButtonState, TowerKind};
use bastion_core::events::InteractionEvent;
use bastion_core::settings::InteractionSettings;
use bastion_core::types::{look_rotation, UP};

use crate::arbiter::{CandidateId, InteractionArbiter};
use crate::hand::HandTracker;

pub struct MenuButton {
    id: CandidateId,
    tower: TowerKind,
    /// Offset of the button centre from the menu anchor, in wrist space.
    offset: Vec3,
    center: Vec3,
    settings: InteractionSettings,

    hovering: bool,
    was_hovering: bool,
    pinching: bool,
    was_pinching: bool,
    triggered: bool,
    hand_distance: f32,
    pinch_position: Option<Vec3>,

    visual: ButtonState,
    selected_timer: Option<f32>,
}

impl MenuButton {
    pub fn new(id: CandidateId, tower: TowerKind, offset: Vec3, settings: &InteractionSettings) -> Self {
        Self {
            id,
            tower,
            offset,
            center: offset,
            settings: settings.clone(),
            hovering: false,
            was_hovering: false,
            pinching: false,
            was_pinching: false,
            triggered: false,
            hand_distance: f32::INFINITY,
            pinch_position: None,
            visual: ButtonState::Normal,
            selected_timer: None,
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn tower(&self) -> TowerKind {
        self.tower
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    pub fn has_triggered_pinch_action(&self) -> bool {
        self.triggered
    }

    pub fn visual(&self) -> ButtonState {
        self.visual
    }

    /// Last fingertip distance to the centre. Infinite while untracked.
    pub fn hand_distance(&self) -> f32 {
        self.hand_distance
    }

    /// Count down the Selected display and fall back to Hovered or Normal.
    pub fn tick_visual(&mut self, dt: f32, events: &mut Vec<InteractionEvent>) {
        let Some(remaining) = self.selected_timer.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.selected_timer = None;
            self.set_visual(self.resting_visual(), events);
        }
    }

    /// Claim hover when the fingertip is within hover distance, release it
    /// otherwise. Returns the button this claim preempted.
    pub fn check_hover(&mut self, pointer: &HandTracker, arbiter: &mut InteractionArbiter) -> Option<CandidateId> {
        if pointer.index_tip().is_none() {
            self.hovering = false;
            self.hand_distance = f32::INFINITY;
            arbiter.release_hover(self.id);
            return None;
        }

        let distance = pointer.distance_to_point(self.center);
        self.hand_distance = distance;
        if distance <= self.settings.hover_distance {
            let claim = arbiter.request_hover(self.id, distance);
            self.hovering = claim.is_granted();
            claim.preempted()
        } else {
            self.hovering = false;
            arbiter.release_hover(self.id);
            None
        }
    }

    /// Start or end a pinch from the thumb-index distance. Returns the
    /// button a pinch claim preempted.
    pub fn check_pinch(&mut self, pointer: &HandTracker, arbiter: &mut InteractionArbiter) -> Option<CandidateId> {
        let pose = pointer.pose();
        let (Some(distance), Some(center)) = (pose.pinch_distance(), pose.pinch_center()) else {
            self.pinching = false;
            self.pinch_position = None;
            self.clear_trigger(arbiter);
            return None;
        };
        self.pinch_position = Some(center);

        if !self.pinching
            && distance <= self.settings.pinch_threshold
            && !arbiter.has_any_button_triggered_pinch_action()
        {
            if self.hovering {
                self.pinching = true;
            } else if !self.settings.require_hover_to_pinch {
                let (closest, preempted) = self.claim_pinch(center, arbiter);
                self.pinching = closest;
                return preempted;
            }
        } else if self.pinching && distance >= self.settings.pinch_release_threshold {
            self.pinching = false;
            self.clear_trigger(arbiter);
        }
        None
    }

    /// Emit feedback for this frame's hover and pinch transitions. A pinch
    /// start may select the button, which queues a spawn command.
    pub fn apply_edges(
        &mut self,
        head: Vec3,
        arbiter: &mut InteractionArbiter,
        events: &mut Vec<InteractionEvent>,
        commands: &mut Vec<Command>,
    ) {
        if self.hovering && !self.was_hovering {
            self.hover_enter(events);
        } else if !self.hovering && self.was_hovering {
            self.hover_exit(events);
        }

        if self.pinching && !self.was_pinching {
            self.pinch_start(head, arbiter, events, commands);
        } else if !self.pinching && self.was_pinching && self.settings.use_pinch_release_interaction {
            self.pinch_end(arbiter, events);
        }

        self.was_hovering = self.hovering;
        self.was_pinching = self.pinching;
    }

    /// Drop hover immediately because a closer button took it.
    pub fn force_hover_exit(&mut self, events: &mut Vec<InteractionEvent>) {
        if self.hovering {
            self.hovering = false;
            self.was_hovering = false;
            self.hover_exit(events);
        }
    }

    /// Drop the pinch immediately because a closer button took it.
    pub fn force_pinch_exit(&mut self, arbiter: &mut InteractionArbiter, events: &mut Vec<InteractionEvent>) {
        if self.pinching {
            self.pinching = false;
            self.was_pinching = false;
            self.pinch_end(arbiter, events);
        }
    }

    /// Whether this button is the closest to the pinch centre.
    fn claim_pinch(&mut self, pinch_center: Vec3, arbiter: &mut InteractionArbiter) -> (bool, Option<CandidateId>) {
        let distance = pinch_center.distance(self.center);
        if distance > self.settings.hover_distance {
            return (false, None);
        }
        let claim = arbiter.request_pinch(self.id, distance);
        (claim.is_granted(), claim.preempted())
    }

    fn clear_trigger(&mut self, arbiter: &mut InteractionArbiter) {
        if self.triggered {
            self.triggered = false;
            arbiter.clear_pinch_action_trigger();
        }
    }

    fn hover_enter(&mut self, events: &mut Vec<InteractionEvent>) {
        let visual = if self.pinching {
            ButtonState::Pinching
        } else {
            ButtonState::Hovered
        };
        self.set_visual(visual, events);
        events.push(InteractionEvent::HoverEnter { button: self.id.0 });
    }

    fn hover_exit(&mut self, events: &mut Vec<InteractionEvent>) {
        self.set_visual(ButtonState::Normal, events);
        events.push(InteractionEvent::HoverExit { button: self.id.0 });
    }

    fn pinch_start(
        &mut self,
        head: Vec3,
        arbiter: &mut InteractionArbiter,
        events: &mut Vec<InteractionEvent>,
        commands: &mut Vec<Command>,
    ) {
        self.set_visual(ButtonState::Pinching, events);
        events.push(InteractionEvent::PinchStart { button: self.id.0 });

        let may_select = self.hovering || !self.settings.require_hover_to_pinch;
        if may_select && !self.triggered && arbiter.set_pinch_action_triggered(self.id) {
            self.triggered = true;
            self.select(head, events, commands);
            arbiter.release_pinch(self.id);
        }
    }

    fn pinch_end(&mut self, arbiter: &mut InteractionArbiter, events: &mut Vec<InteractionEvent>) {
        arbiter.release_pinch(self.id);
        self.set_visual(self.resting_visual(), events);
        events.push(InteractionEvent::PinchEnd { button: self.id.0 });
    }

    fn select(&mut self, head: Vec3, events: &mut Vec<InteractionEvent>, commands: &mut Vec<Command>) {
        self.set_visual(ButtonState::Selected, events);
        self.selected_timer = Some(self.settings.selected_display_secs);
        events.push(InteractionEvent::PinchSelect { button: self.id.0 });

        let position = self.spawn_position();
        let rotation = spawn_rotation(position, head);
        log::info!("menu: spawning {:?} tower at {position:?}", self.tower);
        commands.push(Command::SpawnTower {
            kind: self.tower,
            position,
            rotation,
        });
    }

    fn spawn_position(&self) -> Vec3 {
        match self.pinch_position {
            Some(position) if self.settings.spawn_at_pinch_location => position,
            _ => self.center,
        }
    }

    fn resting_visual(&self) -> ButtonState {
        if self.hovering {
            ButtonState::Hovered
        } else {
            ButtonState::Normal
        }
    }

    fn set_visual(&mut self, state: ButtonState, events: &mut Vec<InteractionEvent>) {
        if self.visual != state {
            self.visual = state;
            events.push(InteractionEvent::VisualState {
                button: self.id.0,
                state,
            });
        }
    }
}

/// Face the viewer, level with the ground.
fn spawn_rotation(position: Vec3, head: Vec3) -> Quat {
    let toward_head = Vec3::new(head.x - position.x, 0.0, head.z - position.z);
    look_rotation(toward_head, UP).unwrap_or(Quat::IDENTITY)
}
