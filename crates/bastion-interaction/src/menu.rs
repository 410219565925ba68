//! Wrist menu: tower buttons anchored to one wrist, pressed with the other hand.

use glam::Vec3;

use bastion_core::commands::Command;
use bastion_core::enums::{Handedness, TowerKind};
use bastion_core::events::InteractionEvent;
use bastion_core::settings::InteractionSettings;

use crate::arbiter::{CandidateId, InteractionArbiter};
use crate::button::MenuButton;
use crate::hand::{HandFrame, HandTracker};

/// Spacing of the default buttons along the wrist's X axis (m).
const BUTTON_SPACING: f32 = 0.06;

pub struct WristMenu {
    settings: InteractionSettings,
    arbiter: InteractionArbiter,
    buttons: Vec<MenuButton>,
    menu_hand: HandTracker,
    pointer: HandTracker,
    /// Stand-in pointer while the menu is hidden, so buttons let go.
    hidden_pointer: HandTracker,
    visible: bool,
    events: Vec<InteractionEvent>,
}

impl WristMenu {
    /// An empty menu worn on `settings.menu_hand`.
    pub fn new(settings: &InteractionSettings) -> Self {
        let pointer_hand = match settings.menu_hand {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        };
        Self {
            settings: settings.clone(),
            arbiter: InteractionArbiter::new(),
            buttons: Vec::new(),
            menu_hand: HandTracker::new(settings.menu_hand),
            pointer: HandTracker::new(pointer_hand),
            hidden_pointer: HandTracker::new(pointer_hand),
            visible: false,
            events: Vec::new(),
        }
    }

    /// A menu with one button per tower kind, side by side.
    pub fn with_tower_buttons(settings: &InteractionSettings) -> Self {
        let mut menu = Self::new(settings);
        menu.add_button(TowerKind::MachineGun, Vec3::new(-BUTTON_SPACING * 0.5, 0.0, 0.0));
        menu.add_button(TowerKind::RocketLauncher, Vec3::new(BUTTON_SPACING * 0.5, 0.0, 0.0));
        menu
    }

    /// Add a button at `offset` from the menu anchor, in wrist space.
    pub fn add_button(&mut self, tower: TowerKind, offset: Vec3) -> CandidateId {
        let id = CandidateId(self.buttons.len() as u32);
        self.buttons
            .push(MenuButton::new(id, tower, offset, &self.settings));
        id
    }

    pub fn buttons(&self) -> &[MenuButton] {
        &self.buttons
    }

    pub fn button(&self, id: CandidateId) -> Option<&MenuButton> {
        self.buttons.iter().find(|b| b.id() == id)
    }

    pub fn arbiter(&self) -> &InteractionArbiter {
        &self.arbiter
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Take every feedback event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process one frame of hand data. Returns the commands the buttons
    /// issued, in button order.
    pub fn update(&mut self, frame: &HandFrame, dt: f32) -> Vec<Command> {
        self.menu_hand.update(frame);
        self.pointer.update(frame);
        self.update_visibility(frame);
        self.layout();

        let Self {
            arbiter,
            buttons,
            pointer,
            hidden_pointer,
            visible,
            events,
            ..
        } = self;
        let pointer = if *visible { &*pointer } else { &*hidden_pointer };
        let head = frame.head.position;
        let mut commands = Vec::new();

        for i in 0..buttons.len() {
            buttons[i].tick_visual(dt, events);

            if let Some(loser) = buttons[i].check_hover(pointer, arbiter) {
                if let Some(button) = buttons.iter_mut().find(|b| b.id() == loser) {
                    button.force_hover_exit(events);
                }
            }
            if let Some(loser) = buttons[i].check_pinch(pointer, arbiter) {
                if let Some(button) = buttons.iter_mut().find(|b| b.id() == loser) {
                    button.force_pinch_exit(arbiter, events);
                }
            }
            buttons[i].apply_edges(head, arbiter, events, &mut commands);
        }
        commands
    }

    /// Show while the menu palm faces the head, with hysteresis.
    fn update_visibility(&mut self, frame: &HandFrame) {
        let pose = self.menu_hand.pose();
        let facing = match (pose.tracked, pose.wrist, pose.palm_normal) {
            (true, Some(wrist), Some(palm)) => {
                let to_head = (frame.head.position - wrist.position).normalize_or_zero();
                palm.normalize_or_zero().dot(to_head)
            }
            _ => f32::NEG_INFINITY,
        };
        let threshold = if self.visible {
            self.settings.palm_hide_dot
        } else {
            self.settings.palm_show_dot
        };
        let visible = facing >= threshold;
        if visible != self.visible {
            log::debug!("wrist menu {}", if visible { "shown" } else { "hidden" });
            self.visible = visible;
        }
    }

    /// Move the buttons with the wrist. Buttons keep their last centre while
    /// the wrist is not tracked.
    fn layout(&mut self) {
        let Some(wrist) = self.menu_hand.pose().wrist else {
            return;
        };
        if !self.menu_hand.is_tracked() {
            return;
        }
        for button in &mut self.buttons {
            let center = wrist.transform_point(self.settings.menu_offset + button.offset());
            button.set_center(center);
        }
    }
}
