//! Generic single-active-state machine.
//!
//! A controller owns its state instances and a `StateMachine` keyed by a small
//! `Copy` enum. Only the current state receives ticks. States report progress
//! by returning a `Signal`; the controller routes signals through one-shot
//! `Listeners` to pick the next state.

use std::fmt::Debug;

/// Completion signal raised by a state from `tick` or `fixed_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The state finished its work.
    Finished,
    /// A target was acquired.
    TargetFound,
    /// The target reference became empty.
    TargetLost,
    /// Auto-placement completed.
    PlacementComplete,
}

/// A behavior state driven by a `StateMachine`. `C` is the per-tick context
/// handed in by the owning controller.
pub trait State<C: ?Sized> {
    fn enter(&mut self, _ctx: &mut C) {}

    /// Frame-rate tick.
    fn tick(&mut self, _ctx: &mut C) -> Option<Signal> {
        None
    }

    /// Physics-rate tick.
    fn fixed_tick(&mut self, _ctx: &mut C) -> Option<Signal> {
        None
    }

    fn exit(&mut self, _ctx: &mut C) {}

    /// Whether the state has raised its completion since it was last entered.
    fn is_finished(&self) -> bool;
}

/// Lookup from a state key to the owning controller's state instance.
pub trait StateTable<K, C: ?Sized> {
    fn state_mut(&mut self, key: K) -> &mut dyn State<C>;
}

/// Tracks the single active state and records every change.
#[derive(Debug)]
pub struct StateMachine<K> {
    current: Option<K>,
    changes: Vec<K>,
}

impl<K> Default for StateMachine<K> {
    fn default() -> Self {
        Self {
            current: None,
            changes: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Debug> StateMachine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Exit the current state, make `next` current, record the change, then
    /// enter `next`. Re-entering the current state runs exit and enter again.
    pub fn change_state<C: ?Sized, T: StateTable<K, C> + ?Sized>(
        &mut self,
        next: K,
        table: &mut T,
        ctx: &mut C,
    ) {
        if let Some(prev) = self.current {
            table.state_mut(prev).exit(ctx);
        }
        self.current = Some(next);
        self.changes.push(next);
        log::trace!("state change -> {next:?}");
        table.state_mut(next).enter(ctx);
    }

    /// Forward a frame tick to the current state. No-op without one.
    pub fn tick<C: ?Sized, T: StateTable<K, C> + ?Sized>(
        &mut self,
        table: &mut T,
        ctx: &mut C,
    ) -> Option<(K, Signal)> {
        let key = self.current?;
        table.state_mut(key).tick(ctx).map(|signal| (key, signal))
    }

    /// Forward a physics tick to the current state. No-op without one.
    pub fn fixed_tick<C: ?Sized, T: StateTable<K, C> + ?Sized>(
        &mut self,
        table: &mut T,
        ctx: &mut C,
    ) -> Option<(K, Signal)> {
        let key = self.current?;
        table.state_mut(key).fixed_tick(ctx).map(|signal| (key, signal))
    }

    /// Exit the current state and leave the machine without one.
    pub fn stop<C: ?Sized, T: StateTable<K, C> + ?Sized>(&mut self, table: &mut T, ctx: &mut C) {
        if let Some(prev) = self.current.take() {
            table.state_mut(prev).exit(ctx);
        }
    }

    /// Drain the state changes recorded since the last call, oldest first.
    pub fn take_changes(&mut self) -> Vec<K> {
        std::mem::take(&mut self.changes)
    }
}

/// One-shot transition listeners: `(source, signal) -> next`.
///
/// A listener is removed the moment it fires, so a transition can never be
/// taken twice for the same registration.
#[derive(Debug, Clone)]
pub struct Listeners<K> {
    entries: Vec<(K, Signal, K)>,
}

impl<K> Default for Listeners<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> Listeners<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-shot listener. Replaces any listener already registered
    /// for the same source and signal.
    pub fn once(&mut self, source: K, signal: Signal, next: K) {
        self.entries.retain(|&(s, sig, _)| !(s == source && sig == signal));
        self.entries.push((source, signal, next));
    }

    /// Register every outgoing edge of `source`.
    pub fn wire(&mut self, source: K, edges: &[(Signal, K)]) {
        for &(signal, next) in edges {
            self.once(source, signal, next);
        }
    }

    /// Consume the listener for `(source, signal)`, returning its target.
    pub fn fire(&mut self, source: K, signal: Signal) -> Option<K> {
        let idx = self
            .entries
            .iter()
            .position(|&(s, sig, _)| s == source && sig == signal)?;
        Some(self.entries.remove(idx).2)
    }

    /// Drop every listener registered on `source`.
    pub fn remove_source(&mut self, source: K) {
        self.entries.retain(|&(s, _, _)| s != source);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
impl<K: Copy + Eq> Listeners<K> {
    pub(crate) fn is_registered(&self, source: K, signal: Signal) -> bool {
        self.entries
            .iter()
            .any(|&(s, sig, _)| s == source && sig == signal)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Route a raised signal: consume the matching listener, drop the source's
/// remaining listeners, change state and wire the new state's edges.
///
/// Returns the state entered, or `None` when nobody was listening.
pub fn follow_signal<K, C, T>(
    machine: &mut StateMachine<K>,
    listeners: &mut Listeners<K>,
    table: &mut T,
    ctx: &mut C,
    (source, signal): (K, Signal),
    edges: fn(K) -> &'static [(Signal, K)],
) -> Option<K>
where
    K: Copy + Eq + Debug,
    C: ?Sized,
    T: StateTable<K, C> + ?Sized,
{
    let next = listeners.fire(source, signal)?;
    listeners.remove_source(source);
    machine.change_state(next, table, ctx);
    listeners.wire(next, edges(next));
    Some(next)
}

/// Enter `initial` and wire its edges.
pub fn start<K, C, T>(
    machine: &mut StateMachine<K>,
    listeners: &mut Listeners<K>,
    table: &mut T,
    ctx: &mut C,
    initial: K,
    edges: fn(K) -> &'static [(Signal, K)],
) where
    K: Copy + Eq + Debug,
    C: ?Sized,
    T: StateTable<K, C> + ?Sized,
{
    listeners.clear();
    machine.change_state(initial, table, ctx);
    listeners.wire(initial, edges(initial));
}
