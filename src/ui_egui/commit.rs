//! Drop commit.
//!
//! Ends a gesture: unchanged positions commit nothing, accepted moves emit
//! exactly one `MoveRequest`, rejected moves revert the gesture to its
//! origin. The validator is the external authority consulted *before*
//! anything mutates; the sink is the external persistence boundary.

use crate::services::appointment::{MoveRequest, MoveSink, RejectReason};
use crate::ui_egui::drag::{DraggedItem, GestureStore, SlotPosition};
use crate::utils::time::format_hhmm;

/// External collision/availability authority consulted at drop time.
#[cfg_attr(test, mockall::automock)]
pub trait DropValidator {
    fn validate(&self, item: &DraggedItem, target: &SlotPosition) -> Result<(), RejectReason>;
}

/// How a drop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Target accepted; the contained request was emitted.
    Committed(MoveRequest),
    /// Dropped back on the original position; nothing to persist.
    Unchanged,
    /// Validator refused; the gesture reverted to its origin.
    Rejected(RejectReason),
    /// No gesture was active.
    NoGesture,
}

/// Finish the active gesture against `validator`. The store always ends up
/// idle; the outcome tells the caller whether (and what) to persist.
pub fn commit_drop(store: &mut GestureStore, validator: &dyn DropValidator) -> DropOutcome {
    if !store.is_dragging() {
        return DropOutcome::NoGesture;
    }

    let state = store.state();
    let (Some(item), Some(original), Some(current)) = (
        state.dragged_item.clone(),
        state.original_position.clone(),
        state.current_position.clone(),
    ) else {
        store.end_drag();
        return DropOutcome::NoGesture;
    };

    if current == original {
        log::info!("Drop on original position for appointment {}: no-op", item.id);
        store.end_drag();
        return DropOutcome::Unchanged;
    }

    match validator.validate(&item, &current) {
        Ok(()) => {
            let request = MoveRequest {
                appointment_id: item.id,
                new_date: current.date,
                new_start_time: current.time,
                new_room_id: current.room_id.clone(),
            };
            log::info!(
                "Drop committed: appointment {} -> {} {} room {}",
                item.id,
                current.date,
                format_hhmm(current.time),
                current.room_id
            );
            store.end_drag();
            DropOutcome::Committed(request)
        }
        Err(reason) => {
            log::warn!(
                "Drop rejected for appointment {} at {} {}: {reason}",
                item.id,
                current.date,
                format_hhmm(current.time)
            );
            store.cancel_drag();
            DropOutcome::Rejected(reason)
        }
    }
}

/// `commit_drop` plus submission, for hosts whose validator and sink are
/// separate objects.
pub fn commit_drop_into(
    store: &mut GestureStore,
    validator: &dyn DropValidator,
    sink: &mut dyn MoveSink,
) -> DropOutcome {
    let outcome = commit_drop(store, validator);
    if let DropOutcome::Committed(request) = &outcome {
        sink.submit_move(request.clone());
    }
    outcome
}

/// Validator backed by a snapshot of clinic hours and the day's bookings:
/// the appointment must fit inside business hours and collide with nothing
/// in its target room.
pub struct SlotValidator<'a> {
    book: &'a crate::services::appointment::AppointmentBook,
    clinic: &'a crate::models::clinic::ClinicConfig,
}

impl<'a> SlotValidator<'a> {
    pub fn new(
        book: &'a crate::services::appointment::AppointmentBook,
        clinic: &'a crate::models::clinic::ClinicConfig,
    ) -> Self {
        Self { book, clinic }
    }
}

impl DropValidator for SlotValidator<'_> {
    fn validate(&self, item: &DraggedItem, target: &SlotPosition) -> Result<(), RejectReason> {
        self.book.validate_slot(
            target.date,
            target.time,
            item.duration_minutes,
            &target.room_id,
            Some(item.id),
            self.clinic,
        )
    }
}

/// Sink that only records, for hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub requests: Vec<MoveRequest>,
}

impl MoveSink for RecordingSink {
    fn submit_move(&mut self, request: MoveRequest) {
        self.requests.push(request);
    }
}
