// Integration tests for the drag-and-drop gesture lifecycle:
// store + resolver + oracle + appointment book working together.

mod fixtures;

use std::time::Duration;

use fixtures::{booked_monday, clinics, dates, room, time};
use pretty_assertions::assert_eq;

use clinic_agenda::services::appointment::{MoveSink, RejectReason};
use clinic_agenda::services::config::{GestureKind, GranularitySettings};
use clinic_agenda::ui_egui::commit::{commit_drop, commit_drop_into, DropOutcome, RecordingSink, SlotValidator};
use clinic_agenda::ui_egui::drag::{DraggedItem, GestureStore};
use clinic_agenda::ui_egui::position::{resolve_into_store, GridCell, SnapSettings};
use clinic_agenda::ui_egui::preview::{is_drop_target, preview_for_cell};

const CELL_HEIGHT: f32 = 40.0;

fn test_store() -> GestureStore {
    GestureStore::with_throttle_intervals(Duration::ZERO, Duration::ZERO)
}

fn move_snap() -> SnapSettings {
    let defaults = GranularitySettings::default();
    SnapSettings {
        slot_duration_minutes: defaults.slot_duration_minutes as i32,
        granularity_minutes: defaults.granularity_for(GestureKind::Move) as i32,
    }
}

fn start_drag_of(store: &mut GestureStore, book: &clinic_agenda::services::appointment::AppointmentBook, id: i64, grab_offset: i32) {
    let appointment = book.get(id).expect("appointment exists");
    let item = DraggedItem::from_appointment(appointment).expect("appointment has id");
    assert!(store.start_drag(item, grab_offset));
}

#[test]
fn test_full_drag_commit_updates_book() {
    let clinic = clinics::standard();
    let mut book = booked_monday();
    let mut store = test_store();

    // Alice (id 1): 10:00 room-1, 45 min. Drag towards 14:00 in room-2.
    start_drag_of(&mut store, &book, 1, 0);

    // The pointer wanders over several cells before settling; each cell
    // feeds the store through the same resolver entry point.
    for (cell_time, offset_y) in [
        (time(11, 0), 10.0),
        (time(12, 30), 35.0),
        (time(14, 0), 0.0),
    ] {
        let cell = GridCell::new(dates::monday(), cell_time, room("room-2"));
        resolve_into_store(&mut store, &cell, offset_y, CELL_HEIGHT, move_snap(), &clinic);
    }

    let outcome = {
        let validator = SlotValidator::new(&book, &clinic);
        commit_drop(&mut store, &validator)
    };
    let DropOutcome::Committed(request) = outcome else {
        panic!("expected committed drop, got {outcome:?}");
    };
    assert_eq!(request.appointment_id, 1);
    assert_eq!(request.new_date, dates::monday());
    assert_eq!(request.new_start_time, time(14, 0));
    assert_eq!(request.new_room_id, room("room-2"));

    book.submit_move(request);
    let moved = book.get(1).unwrap();
    assert_eq!(moved.start_time, time(14, 0));
    assert_eq!(moved.room_id, room("room-2"));
    assert!(!store.is_dragging());
}

#[test]
fn test_drop_on_original_position_emits_no_mutation() {
    let clinic = clinics::standard();
    let book = booked_monday();
    let mut store = test_store();

    start_drag_of(&mut store, &book, 1, 0);

    // Hover away, then come back to the exact origin slot.
    let away = GridCell::new(dates::monday(), time(13, 0), room("room-2"));
    resolve_into_store(&mut store, &away, 0.0, CELL_HEIGHT, move_snap(), &clinic);
    let origin = GridCell::new(dates::monday(), time(10, 0), room("room-1"));
    resolve_into_store(&mut store, &origin, 0.0, CELL_HEIGHT, move_snap(), &clinic);

    let validator = SlotValidator::new(&book, &clinic);
    let mut sink = RecordingSink::default();
    let outcome = commit_drop_into(&mut store, &validator, &mut sink);

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert!(sink.requests.is_empty());
    assert!(!store.is_dragging());
}

#[test]
fn test_rejected_drop_reverts_and_leaves_book_untouched() {
    let clinic = clinics::standard();
    let mut book = booked_monday();
    let mut store = test_store();

    // Bob (id 2) occupies 16:00-17:00 in room-1; aim Alice into the middle
    // of it.
    start_drag_of(&mut store, &book, 1, 0);
    let original = store.state().original_position.clone().unwrap();

    let cell = GridCell::new(dates::monday(), time(16, 15), room("room-1"));
    resolve_into_store(&mut store, &cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);

    let outcome = {
        let validator = SlotValidator::new(&book, &clinic);
        commit_drop(&mut store, &validator)
    };
    assert_eq!(
        outcome,
        DropOutcome::Rejected(RejectReason::Conflict {
            client: "Bob".to_string()
        })
    );

    // Gesture reverted, nothing persisted.
    assert!(!store.is_dragging());
    assert_eq!(store.state().current_position.as_ref(), Some(&original));
    let alice = book.get(1).unwrap();
    assert_eq!(alice.start_time, time(10, 0));
    assert_eq!(alice.room_id, room("room-1"));

    // Book still accepts an ordinary move afterwards.
    store = test_store();
    start_drag_of(&mut store, &book, 1, 0);
    let free = GridCell::new(dates::monday(), time(11, 0), room("room-1"));
    resolve_into_store(&mut store, &free, 0.0, CELL_HEIGHT, move_snap(), &clinic);
    let outcome = {
        let validator = SlotValidator::new(&book, &clinic);
        commit_drop(&mut store, &validator)
    };
    let DropOutcome::Committed(request) = outcome else {
        panic!("expected committed drop, got {outcome:?}");
    };
    book.submit_move(request);
    assert_eq!(book.get(1).unwrap().start_time, time(11, 0));
}

#[test]
fn test_escape_mid_gesture_restores_origin() {
    let clinic = clinics::standard();
    let book = booked_monday();
    let mut store = test_store();

    start_drag_of(&mut store, &book, 3, 5);
    let original = store.state().original_position.clone().unwrap();

    for offset_y in [5.0, 15.0, 25.0, 38.0] {
        let cell = GridCell::new(dates::monday(), time(14, 0), room("room-1"));
        resolve_into_store(&mut store, &cell, offset_y, CELL_HEIGHT, move_snap(), &clinic);
    }

    store.cancel_drag();
    assert!(!store.is_dragging());
    assert_eq!(store.state().current_position.as_ref(), Some(&original));

    // Carol unchanged in the book.
    let carol = book.get(3).unwrap();
    assert_eq!(carol.start_time, time(12, 0));
}

#[test]
fn test_cross_day_move_in_week_view() {
    let clinic = clinics::standard();
    let mut book = booked_monday();
    let mut store = test_store();

    start_drag_of(&mut store, &book, 2, 0);
    let cell = GridCell::new(dates::tuesday(), time(9, 30), room("room-1"));
    resolve_into_store(&mut store, &cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);

    let outcome = {
        let validator = SlotValidator::new(&book, &clinic);
        commit_drop(&mut store, &validator)
    };
    let DropOutcome::Committed(request) = outcome else {
        panic!("expected committed drop, got {outcome:?}");
    };
    assert_eq!(request.new_date, dates::tuesday());
    book.submit_move(request);
    assert_eq!(book.get(2).unwrap().date, dates::tuesday());
}

#[test]
fn test_closed_day_keeps_last_valid_position() {
    let clinic = clinics::standard();
    let book = booked_monday();
    let mut store = test_store();

    start_drag_of(&mut store, &book, 1, 0);

    let monday_cell = GridCell::new(dates::monday(), time(13, 0), room("room-1"));
    resolve_into_store(&mut store, &monday_cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);

    // Crossing a closed column must not disturb the resolved position.
    let sunday_cell = GridCell::new(dates::sunday(), time(13, 0), room("room-1"));
    let resolved =
        resolve_into_store(&mut store, &sunday_cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);
    assert!(resolved.is_none());

    let current = store.state().current_position.clone().unwrap();
    assert_eq!(current.date, dates::monday());
    assert_eq!(current.time, time(13, 0));

    // The preview stays on the last open day.
    assert!(is_drop_target(store.state(), dates::monday(), &room("room-1")));
    assert!(!is_drop_target(store.state(), dates::sunday(), &room("room-1")));
}

#[test]
fn test_grab_offset_keeps_item_under_cursor() {
    let clinic = clinics::standard();
    let book = booked_monday();

    // Grab Alice 20 minutes into her 45-minute appointment.
    let mut store = test_store();
    start_drag_of(&mut store, &book, 1, 20);

    // Cursor at 14:00 sharp: the start resolves 20 minutes earlier.
    let cell = GridCell::new(dates::monday(), time(14, 0), room("room-1"));
    resolve_into_store(&mut store, &cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);
    assert_eq!(
        store.state().current_position.as_ref().unwrap().time,
        time(13, 40)
    );
}

#[test]
fn test_repeat_resolution_notifies_once() {
    let clinic = clinics::standard();
    let book = booked_monday();
    let mut store = test_store();

    start_drag_of(&mut store, &book, 1, 0);

    let version_after_start = store.version();
    let cell = GridCell::new(dates::monday(), time(15, 0), room("room-2"));
    // Same pointer geometry delivered repeatedly, as a pointer-move storm
    // does: exactly one applied change.
    for _ in 0..50 {
        resolve_into_store(&mut store, &cell, 12.0, CELL_HEIGHT, move_snap(), &clinic);
    }
    assert_eq!(store.version(), version_after_start + 1);
}

#[test]
fn test_preview_follows_resolved_target() {
    let clinic = clinics::standard();
    let book = booked_monday();
    let mut store = test_store();

    start_drag_of(&mut store, &book, 1, 0);
    let cell = GridCell::new(dates::monday(), time(15, 0), room("room-2"));
    resolve_into_store(&mut store, &cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);

    let preview = preview_for_cell(store.state(), dates::monday(), &room("room-2")).unwrap();
    assert_eq!(preview.appointment_id, 1);
    assert_eq!(preview.start_time, time(15, 0));
    assert_eq!(preview.duration_minutes, 45);

    // The origin column no longer shows the ghost.
    assert!(preview_for_cell(store.state(), dates::monday(), &room("room-1")).is_none());
}

#[test]
fn test_late_opening_clamps_resolution() {
    let clinic = clinics::late_opening();
    let mut book = booked_monday();
    book.add(
        clinic_agenda::models::appointment::Appointment::new(
            "Dora",
            room("room-3"),
            dates::monday(),
            time(10, 0),
            30,
        )
        .unwrap(),
    )
    .unwrap();
    let mut store = test_store();

    let item = DraggedItem::from_appointment(book.get(4).unwrap()).unwrap();
    store.start_drag(item, 0);

    // Pointer far above opening time: clamps to the 09:30 opening.
    let cell = GridCell::new(dates::monday(), time(8, 0), room("room-3"));
    resolve_into_store(&mut store, &cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);
    assert_eq!(
        store.state().current_position.as_ref().unwrap().time,
        time(9, 30)
    );

    // Pointer past closing clamps one step before close.
    let cell = GridCell::new(dates::monday(), time(18, 0), room("room-3"));
    resolve_into_store(&mut store, &cell, 0.0, CELL_HEIGHT, move_snap(), &clinic);
    assert_eq!(
        store.state().current_position.as_ref().unwrap().time,
        time(16, 59)
    );
}
