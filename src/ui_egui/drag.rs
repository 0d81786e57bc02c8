//! Gesture state store for appointment drag-and-drop.
//!
//! One global, single-writer store describes the in-flight drag: which
//! appointment, where it started, and the latest *resolved* position
//! (snapped + clamped, never the raw pointer). Grid cells subscribe and
//! compare instead of re-deriving the gesture, and redundant writes are
//! discarded at the boundary so a storm of pointer-move events cannot fan
//! out into a storm of notifications.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveTime};
use egui::Pos2;

use crate::models::appointment::{Appointment, RoomId};
use crate::utils::time::format_hhmm;

/// Immutable snapshot of the appointment being moved, taken at gesture
/// start and owned by the store for the lifetime of the drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggedItem {
    pub id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
    pub room_id: RoomId,
    pub current_date: NaiveDate,
}

impl DraggedItem {
    pub fn from_appointment(appointment: &Appointment) -> Option<Self> {
        let id = appointment.id?;
        Some(Self {
            id,
            start_time: appointment.start_time,
            end_time: appointment.end_time(),
            duration_minutes: appointment.duration_minutes,
            room_id: appointment.room_id.clone(),
            current_date: appointment.date,
        })
    }
}

/// A fully resolved calendar position: date, time-of-day, room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotPosition {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: RoomId,
}

impl SlotPosition {
    pub fn new(date: NaiveDate, time: NaiveTime, room_id: RoomId) -> Self {
        Self {
            date,
            time,
            room_id,
        }
    }
}

/// The single mutable record describing an in-flight drag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureState {
    pub active: bool,
    pub dragged_item: Option<DraggedItem>,
    /// Captured once at gesture start, never mutated during the gesture.
    pub original_position: Option<SlotPosition>,
    /// Latest resolved (snapped + clamped) position.
    pub current_position: Option<SlotPosition>,
    /// Raw pointer coordinates, cosmetic only.
    pub pointer: Option<Pos2>,
    /// Minutes between the item's logical start and the grab point inside
    /// it; constant for the whole gesture so the item never jumps to align
    /// its top edge with the cursor.
    pub grab_offset_minutes: i32,
}

/// Time-based gate for high-frequency updates.
#[derive(Debug)]
struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Logical position updates: fast enough to feel mechanical, slow enough to
/// bound resolver work under pointer-move storms.
const POSITION_THROTTLE: Duration = Duration::from_millis(5);
/// Cosmetic pointer echo at display rate.
const POINTER_THROTTLE: Duration = Duration::from_millis(16);

pub type SubscriberId = usize;

type Listener = Box<dyn FnMut(&GestureState)>;

/// Single source of truth for the drag gesture. Exactly one logical writer
/// path (the position resolver) mutates `current_position`; everything else
/// reads, either directly or through subscriptions.
pub struct GestureStore {
    state: GestureState,
    /// Bumped on every applied logical change; cells can cheaply compare.
    version: u64,
    listeners: Vec<(SubscriberId, Listener)>,
    next_subscriber: SubscriberId,
    position_throttle: Throttle,
    pointer_throttle: Throttle,
}

impl Default for GestureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureStore {
    pub fn new() -> Self {
        Self::with_throttle_intervals(POSITION_THROTTLE, POINTER_THROTTLE)
    }

    /// Construct with explicit throttle windows (tests pass zero).
    pub fn with_throttle_intervals(position: Duration, pointer: Duration) -> Self {
        Self {
            state: GestureState::default(),
            version: 0,
            listeners: Vec::new(),
            next_subscriber: 0,
            position_throttle: Throttle::new(position),
            pointer_throttle: Throttle::new(pointer),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.active
    }

    /// Monotonic counter of applied logical changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register a listener invoked after every applied logical change.
    pub fn subscribe(&mut self, listener: impl FnMut(&GestureState) + 'static) -> SubscriberId {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Begin a gesture. No-ops when one is already active: at most one
    /// concurrent drag, the first one wins.
    pub fn start_drag(&mut self, item: DraggedItem, grab_offset_minutes: i32) -> bool {
        if self.state.active {
            log::warn!(
                "Ignoring drag start for appointment {}: gesture already active",
                item.id
            );
            return false;
        }

        let original = SlotPosition::new(item.current_date, item.start_time, item.room_id.clone());
        log::info!(
            "Drag start: appointment {} at {} {} room {} (grab offset {} min)",
            item.id,
            original.date,
            format_hhmm(original.time),
            original.room_id,
            grab_offset_minutes
        );

        self.state = GestureState {
            active: true,
            dragged_item: Some(item),
            original_position: Some(original.clone()),
            current_position: Some(original),
            pointer: None,
            grab_offset_minutes,
        };
        self.position_throttle.reset();
        self.pointer_throttle.reset();
        self.bump_and_notify();
        true
    }

    /// Adopt a newly resolved position. Idempotent: a triple identical to
    /// the stored one is discarded before it can reach any subscriber;
    /// this check, not scattered timers, is what keeps pointer-move
    /// feedback loops from spinning. Distinct values inside the throttle
    /// window are dropped too; the resolver re-delivers on the next frame.
    pub fn update_current_position(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        room_id: RoomId,
    ) -> bool {
        if !self.state.active {
            return false;
        }

        let candidate = SlotPosition::new(date, time, room_id);
        if self.state.current_position.as_ref() == Some(&candidate) {
            return false;
        }
        if !self.position_throttle.ready(Instant::now()) {
            return false;
        }

        self.state.current_position = Some(candidate);
        self.bump_and_notify();
        true
    }

    /// Record raw pointer coordinates for transient visual feedback.
    /// Throttled independently of logical updates and never notifies.
    pub fn update_pointer(&mut self, pos: Pos2) {
        if !self.state.active {
            return;
        }
        if !self.pointer_throttle.ready(Instant::now()) {
            return;
        }
        self.state.pointer = Some(pos);
    }

    /// Finish the gesture and clear all fields. Idempotent.
    pub fn end_drag(&mut self) {
        if self.state == GestureState::default() {
            return;
        }
        if let Some(item) = &self.state.dragged_item {
            log::info!("Drag end: appointment {}", item.id);
        }
        self.state = GestureState::default();
        self.bump_and_notify();
    }

    /// Abort the gesture, restoring `current_position` to the origin before
    /// clearing the rest. After this call the store is inactive and still
    /// reports the original position; the next `start_drag` resets it.
    pub fn cancel_drag(&mut self) {
        if !self.state.active {
            return;
        }
        if let Some(item) = &self.state.dragged_item {
            log::info!("Drag cancelled: appointment {} reverts to origin", item.id);
        }

        let original = self.state.original_position.clone();
        self.state.current_position = original.clone();
        self.bump_and_notify();

        self.state = GestureState {
            current_position: original,
            ..GestureState::default()
        };
        self.bump_and_notify();
    }

    fn bump_and_notify(&mut self) {
        self.version += 1;
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener(&self.state);
        }
        // New subscriptions made from inside a listener are kept.
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}
