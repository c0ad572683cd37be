//! Click versus drag disambiguation for the left pointer button.
//!
//! A press starts a pending click. Releasing before the threshold yields a
//! click at the press position. Once the threshold has elapsed, the next
//! motion promotes the press to a drag and every later motion is a drag
//! update. Time comes in with each event; nothing here reads a clock.

use glam::Vec2;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    PendingClick {
        origin: Vec2,
        pressed_at: Duration,
        ctrl: bool,
    },
    Dragging {
        origin: Vec2,
    },
}

/// What the editor should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    None,
    Click { pos: Vec2, ctrl: bool },
    /// The press turned into a drag; `pos` is the current cursor position.
    DragStart { origin: Vec2, pos: Vec2 },
    DragMove { origin: Vec2, pos: Vec2 },
    DragEnd,
}

#[derive(Debug, Clone)]
pub struct PointerTracker {
    state: PointerState,
    threshold: Duration,
}

impl PointerTracker {
    pub fn new(threshold: Duration) -> Self {
        Self {
            state: PointerState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PointerState::Dragging { .. })
    }

    pub fn press(&mut self, pos: Vec2, ctrl: bool, at: Duration) {
        self.state = PointerState::PendingClick {
            origin: pos,
            pressed_at: at,
            ctrl,
        };
    }

    pub fn motion(&mut self, pos: Vec2, at: Duration) -> PointerAction {
        match self.state {
            PointerState::Idle => PointerAction::None,
            PointerState::PendingClick {
                origin, pressed_at, ..
            } => {
                if at.saturating_sub(pressed_at) >= self.threshold {
                    self.state = PointerState::Dragging { origin };
                    PointerAction::DragStart { origin, pos }
                } else {
                    PointerAction::None
                }
            }
            PointerState::Dragging { origin } => PointerAction::DragMove { origin, pos },
        }
    }

    /// A long press released without any motion is neither a click nor a drag.
    pub fn release(&mut self, at: Duration) -> PointerAction {
        let action = match self.state {
            PointerState::Idle => PointerAction::None,
            PointerState::PendingClick {
                origin,
                pressed_at,
                ctrl,
            } => {
                if at.saturating_sub(pressed_at) < self.threshold {
                    PointerAction::Click { pos: origin, ctrl }
                } else {
                    PointerAction::None
                }
            }
            PointerState::Dragging { .. } => PointerAction::DragEnd,
        };
        self.state = PointerState::Idle;
        action
    }

    pub fn reset(&mut self) {
        self.state = PointerState::Idle;
    }
}
