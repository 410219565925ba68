//! Hit points with clamped damage and a single death notification.

use bastion_core::settings::HealthSettings;

/// Health of a damageable entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

/// What a successful `take_damage` call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    /// Damage requested by the caller.
    pub amount: f32,
    /// Health after the hit, clamped to `[0, max]`.
    pub health: f32,
    /// This hit killed the entity. True at most once per initialization.
    pub died: bool,
}

impl Health {
    pub fn new(settings: &HealthSettings) -> Self {
        let max = settings.max_health.max(0.0);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    /// Reset to full health from `settings`, reviving a dead entity.
    pub fn initialize(&mut self, settings: &HealthSettings) {
        *self = Self::new(settings);
    }

    /// Apply `amount` damage. Returns `None` when the hit is ignored: the
    /// entity is already dead or the amount is not a positive finite number.
    pub fn take_damage(&mut self, amount: f32) -> Option<DamageReport> {
        if self.dead || !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
        let died = self.current <= 0.0;
        if died {
            self.dead = true;
        }
        Some(DamageReport {
            amount,
            health: self.current,
            died,
        })
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }
}
