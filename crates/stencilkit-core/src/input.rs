//! Pointer input coalescing.
//!
//! Hosts feed raw mouse, pen and touch events into [`InputState`], which
//! keeps only the primary pointer, counts any extra touches, and detects
//! double clicks. Editors consume the resulting [`PointerAction`]s.

use crate::config::EditorConfig;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

/// Mouse button identifiers. Touch and pen contacts report `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Raw pointer event in diagram-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        pointer_id: u64,
        position: Point,
        button: MouseButton,
    },
    Move {
        pointer_id: u64,
        position: Point,
    },
    Up {
        pointer_id: u64,
        position: Point,
    },
    /// The pointer was cancelled or left the surface.
    Cancel { pointer_id: u64 },
}

/// A primary-pointer action, ready for an editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Down { position: Point, double_click: bool },
    Move { position: Point },
    Up { position: Point },
}

impl PointerAction {
    pub fn position(&self) -> Point {
        match *self {
            PointerAction::Down { position, .. }
            | PointerAction::Move { position }
            | PointerAction::Up { position } => position,
        }
    }
}

/// Tracks the primary pointer across events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Last known position of the primary pointer.
    pub pointer_position: Point,
    /// Where the current press started.
    pub drag_start: Option<Point>,
    primary: Option<u64>,
    /// Other pointers currently down; counted and otherwise ignored.
    extra: HashSet<u64>,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    double_click_interval: Duration,
    double_click_distance: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl InputState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            pointer_position: Point::ZERO,
            drag_start: None,
            primary: None,
            extra: HashSet::new(),
            last_click_time: None,
            last_click_position: None,
            double_click_interval: config.double_click_interval(),
            double_click_distance: config.double_click_distance,
        }
    }

    /// Fold one raw event into the state. Returns the action for the
    /// primary pointer, or `None` when the event is ignored.
    pub fn process(&mut self, event: PointerEvent, now: Instant) -> Option<PointerAction> {
        match event {
            PointerEvent::Down {
                pointer_id,
                position,
                button,
            } => {
                if self.primary.is_some_and(|id| id != pointer_id) {
                    self.extra.insert(pointer_id);
                    return None;
                }
                if button != MouseButton::Left {
                    return None;
                }
                self.primary = Some(pointer_id);
                self.pointer_position = position;
                self.drag_start = Some(position);
                let double_click = self.detect_double_click(position, now);
                Some(PointerAction::Down { position, double_click })
            }
            PointerEvent::Move { pointer_id, position } => {
                if self.primary != Some(pointer_id) {
                    return None;
                }
                self.pointer_position = position;
                Some(PointerAction::Move { position })
            }
            PointerEvent::Up { pointer_id, position } => {
                if self.primary != Some(pointer_id) {
                    self.extra.remove(&pointer_id);
                    return None;
                }
                self.pointer_position = position;
                self.release();
                Some(PointerAction::Up { position })
            }
            PointerEvent::Cancel { pointer_id } => {
                if self.primary != Some(pointer_id) {
                    self.extra.remove(&pointer_id);
                    return None;
                }
                self.release();
                Some(PointerAction::Up {
                    position: self.pointer_position,
                })
            }
        }
    }

    fn release(&mut self) {
        self.primary = None;
        self.drag_start = None;
    }

    fn detect_double_click(&mut self, position: Point, now: Instant) -> bool {
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time);
            if elapsed < self.double_click_interval && last_pos.distance(position) < self.double_click_distance {
                // Reset so a third click starts over.
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    /// Whether the primary pointer is down.
    pub fn is_pressed(&self) -> bool {
        self.primary.is_some()
    }

    /// Number of additional pointers currently down.
    pub fn extra_touches(&self) -> usize {
        self.extra.len()
    }

    /// Get the drag delta from the start position, if pressed.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: u64, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            pointer_id: id,
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(id: u64, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            pointer_id: id,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::default();
        let t = Instant::now();
        input.process(down(1, 100.0, 100.0), t);
        assert!(input.is_pressed());

        let action = input.process(
            PointerEvent::Move {
                pointer_id: 1,
                position: Point::new(150.0, 120.0),
            },
            t,
        );
        assert_eq!(action, Some(PointerAction::Move { position: Point::new(150.0, 120.0) }));
        let delta = input.drag_delta().unwrap();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);

        input.process(up(1, 150.0, 120.0), t);
        assert!(!input.is_pressed());
        assert_eq!(input.drag_delta(), None);
    }

    #[test]
    fn test_extra_touches_are_counted_and_ignored() {
        let mut input = InputState::default();
        let t = Instant::now();
        assert!(input.process(down(1, 0.0, 0.0), t).is_some());
        assert!(input.process(down(2, 50.0, 50.0), t).is_none());
        assert_eq!(input.extra_touches(), 1);
        assert!(input
            .process(
                PointerEvent::Move {
                    pointer_id: 2,
                    position: Point::new(60.0, 60.0)
                },
                t
            )
            .is_none());
        assert!(input.process(up(2, 60.0, 60.0), t).is_none());
        assert_eq!(input.extra_touches(), 0);
        assert!(input.is_pressed());
    }

    #[test]
    fn test_cancel_acts_as_up() {
        let mut input = InputState::default();
        let t = Instant::now();
        input.process(down(1, 10.0, 10.0), t);
        input.process(
            PointerEvent::Move {
                pointer_id: 1,
                position: Point::new(20.0, 30.0),
            },
            t,
        );
        let action = input.process(PointerEvent::Cancel { pointer_id: 1 }, t);
        assert_eq!(action, Some(PointerAction::Up { position: Point::new(20.0, 30.0) }));
        assert!(!input.is_pressed());
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::default();
        let t = Instant::now();
        let first = input.process(down(1, 100.0, 100.0), t);
        assert_eq!(
            first,
            Some(PointerAction::Down {
                position: Point::new(100.0, 100.0),
                double_click: false
            })
        );
        input.process(up(1, 100.0, 100.0), t);

        let second = input.process(down(1, 101.0, 100.0), t + Duration::from_millis(200));
        assert!(matches!(second, Some(PointerAction::Down { double_click: true, .. })));
        input.process(up(1, 101.0, 100.0), t + Duration::from_millis(250));

        // A third click starts a new sequence.
        let third = input.process(down(1, 101.0, 100.0), t + Duration::from_millis(300));
        assert!(matches!(third, Some(PointerAction::Down { double_click: false, .. })));
    }

    #[test]
    fn test_double_click_too_slow_or_far() {
        let mut input = InputState::default();
        let t = Instant::now();
        input.process(down(1, 100.0, 100.0), t);
        input.process(up(1, 100.0, 100.0), t);
        let slow = input.process(down(1, 100.0, 100.0), t + Duration::from_millis(600));
        assert!(matches!(slow, Some(PointerAction::Down { double_click: false, .. })));
        input.process(up(1, 100.0, 100.0), t + Duration::from_millis(600));

        let far = input.process(down(1, 200.0, 200.0), t + Duration::from_millis(700));
        assert!(matches!(far, Some(PointerAction::Down { double_click: false, .. })));
    }

    #[test]
    fn test_secondary_button_ignored() {
        let mut input = InputState::default();
        let action = input.process(
            PointerEvent::Down {
                pointer_id: 1,
                position: Point::ZERO,
                button: MouseButton::Right,
            },
            Instant::now(),
        );
        assert!(action.is_none());
        assert!(!input.is_pressed());
    }
}
