use hourboard_core::db::open_db;
use hourboard_core::{
    BoardConfig, BoardError, ConfigError, EditOutcome, HeadlessSurface, InMemoryStore,
    KeyValueStore, ManualClock, SaveOutcome, SaveTriggerId, ScheduleBoard, SqliteKvStore,
    StoreError, StoreResult, TimeState, Timestamp, DEFAULT_STORAGE_KEY,
};
use serde_json::{json, Value};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

fn at(hour: u32, minute: u32, second: u32) -> Timestamp {
    Timestamp::from_ymd_hms(2026, 10, 16, hour, minute, second).unwrap()
}

fn open_board(
    store: Rc<InMemoryStore>,
    start: Timestamp,
) -> (ScheduleBoard<Rc<InMemoryStore>>, HeadlessSurface, ManualClock) {
    let clock = ManualClock::new(start);
    let mut surface = HeadlessSurface::new();
    let board = ScheduleBoard::open(
        store,
        Box::new(clock.clone()),
        &mut surface,
        &BoardConfig::default(),
    )
    .unwrap();
    (board, surface, clock)
}

fn trigger(board: &ScheduleBoard<Rc<InMemoryStore>>, hour: u32) -> SaveTriggerId {
    board.trigger_for_hour(hour).expect("every hour has a row")
}

#[test]
fn startup_seeds_rows_from_saved_tasks() {
    let store = Rc::new(
        InMemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, json!({"5": "lunch"})),
    );
    let (board, surface, _clock) = open_board(store, at(9, 30, 0));

    let snapshots = board.snapshots();
    assert_eq!(snapshots.len(), 24);
    for snapshot in &snapshots {
        let expected = if snapshot.row_index == 5 { "lunch" } else { "" };
        assert_eq!(snapshot.note_text, expected);
        assert_eq!(surface.row(snapshot.row_index).unwrap().state().text, expected);
    }
    assert_eq!(snapshots[0].label, "12am");
    assert_eq!(snapshots[13].label, "1pm");
}

#[test]
fn initial_tick_sets_states_before_first_interval() {
    let (board, surface, _clock) = open_board(Rc::new(InMemoryStore::new()), at(14, 0, 0));

    assert_eq!(board.tick_count(), 1);

    let past = board.snapshot(10).unwrap();
    assert_eq!(past.time_state, Some(TimeState::Before));
    assert!(past.locked);
    assert!(surface.row(10).unwrap().state().disabled);

    let now = board.snapshot(14).unwrap();
    assert_eq!(now.time_state, Some(TimeState::Current));
    assert!(!surface.row(14).unwrap().state().disabled);

    let upcoming = board.snapshot(18).unwrap();
    assert_eq!(upcoming.time_state, Some(TimeState::After));
    assert!(!surface.row(18).unwrap().state().disabled);
    assert!(surface
        .row(18)
        .unwrap()
        .state()
        .markers
        .contains("time-state-after"));

    assert_eq!(
        board.latest_time_label().as_deref(),
        Some("10/16/2026, 2:00:00 PM")
    );
    assert_eq!(surface.display().updates(), 1);
}

#[test]
fn repeated_tick_in_same_hour_causes_no_marker_churn() {
    let (mut board, surface, clock) = open_board(Rc::new(InMemoryStore::new()), at(14, 0, 0));
    let before: Vec<u32> = (0..24)
        .map(|hour| surface.row(hour).unwrap().state().marker_ops)
        .collect();

    clock.advance(1);
    board.tick();
    board.tick();

    let after: Vec<u32> = (0..24)
        .map(|hour| surface.row(hour).unwrap().state().marker_ops)
        .collect();
    assert_eq!(before, after);
    assert_eq!(surface.display().updates(), 3);
}

#[test]
fn hour_change_moves_current_marker() {
    let (mut board, surface, clock) = open_board(Rc::new(InMemoryStore::new()), at(14, 59, 59));

    clock.advance(1);
    board.tick();

    assert_eq!(board.snapshot(14).unwrap().time_state, Some(TimeState::Before));
    assert_eq!(board.snapshot(15).unwrap().time_state, Some(TimeState::Current));
    let row14 = surface.row(14).unwrap().state();
    assert!(row14.disabled);
    assert!(row14.markers.contains("time-state-before"));
    assert!(!row14.markers.contains("time-state-current"));
}

#[test]
fn save_then_load_roundtrips() {
    let store = Rc::new(InMemoryStore::new());
    let (board, _surface, _clock) = open_board(Rc::clone(&store), at(8, 0, 0));

    let target = trigger(&board, 12);
    assert_eq!(board.edit_note(target, "lunch with Sam"), EditOutcome::Applied);
    assert_eq!(board.save(target).unwrap(), SaveOutcome::Saved);

    let loaded = board.persistence().load().unwrap();
    assert_eq!(loaded.get(&12).map(String::as_str), Some("lunch with Sam"));
    assert_eq!(loaded.len(), 1);
}

#[test]
fn saves_for_different_rows_keep_each_other() {
    let store = Rc::new(InMemoryStore::new());
    let (board, _surface, _clock) = open_board(Rc::clone(&store), at(8, 0, 0));

    for (hour, text) in [(9, "standup"), (13, "review"), (17, "gym")] {
        let target = trigger(&board, hour);
        board.edit_note(target, text);
        board.save(target).unwrap();
    }

    assert_eq!(
        store.get(DEFAULT_STORAGE_KEY).unwrap(),
        Some(json!({"9": "standup", "13": "review", "17": "gym"}))
    );
}

#[test]
fn locked_row_refuses_edit_and_save() {
    let store =
        Rc::new(InMemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, json!({"10": "old"})));
    let (board, surface, _clock) = open_board(Rc::clone(&store), at(14, 0, 0));
    let target = trigger(&board, 10);
    let writes = store.write_count();

    assert_eq!(board.edit_note(target, "too late"), EditOutcome::Locked);
    assert_eq!(board.save(target).unwrap(), SaveOutcome::Locked);

    assert_eq!(store.write_count(), writes);
    assert_eq!(
        store.get(DEFAULT_STORAGE_KEY).unwrap(),
        Some(json!({"10": "old"}))
    );
    assert_eq!(surface.row(10).unwrap().state().text, "old");
}

#[test]
fn unknown_trigger_is_silent_noop() {
    let store = Rc::new(InMemoryStore::new());
    let (board, _surface, _clock) = open_board(Rc::clone(&store), at(8, 0, 0));
    let stranger = SaveTriggerId::new();

    assert_eq!(board.edit_note(stranger, "x"), EditOutcome::UnknownRow);
    assert_eq!(board.save(stranger).unwrap(), SaveOutcome::UnknownRow);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn midnight_tick_resets_once_and_clears_rows() {
    let store = Rc::new(InMemoryStore::new().with_entry(
        DEFAULT_STORAGE_KEY,
        json!({"5": "lunch", "23": "sleep"}),
    ));
    let (mut board, surface, clock) = open_board(Rc::clone(&store), at(23, 59, 59));
    let states_before: Vec<Option<TimeState>> =
        board.snapshots().iter().map(|s| s.time_state).collect();

    clock.advance(1);
    board.tick();

    assert_eq!(board.rollover_count(), 1);
    assert_eq!(store.write_count(), 1);
    assert!(board.persistence().load().unwrap().is_empty());
    for hour in 0..24 {
        assert_eq!(board.snapshot(hour).unwrap().note_text, "");
        assert_eq!(surface.row(hour).unwrap().state().text, "");
    }

    // Rows observed the new day after the reset completed.
    assert_eq!(board.snapshot(0).unwrap().time_state, Some(TimeState::Current));
    assert_eq!(states_before[0], Some(TimeState::Before));

    clock.advance(1);
    board.tick();
    assert_eq!(board.rollover_count(), 1);
    assert_eq!(store.write_count(), 1);
}

#[test]
fn one_second_past_midnight_does_not_reset() {
    let store =
        Rc::new(InMemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, json!({"5": "lunch"})));
    let (mut board, _surface, clock) = open_board(Rc::clone(&store), at(23, 59, 0));

    clock.set(at(0, 0, 1).plus_seconds(86_400));
    board.tick();

    assert_eq!(board.rollover_count(), 0);
    assert_eq!(store.write_count(), 0);
    assert_eq!(board.snapshot(5).unwrap().note_text, "lunch");
}

#[test]
fn midnight_reset_does_not_touch_row_markers() {
    let store = Rc::new(InMemoryStore::new());
    let (mut board, surface, clock) = open_board(Rc::clone(&store), at(0, 0, 0));

    // Opening exactly at midnight performs the reset on the initial tick.
    assert_eq!(board.rollover_count(), 1);
    assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), Some(json!({})));

    let ops = surface.row(0).unwrap().state().marker_ops;
    clock.advance(86_400);
    board.tick();
    assert_eq!(board.rollover_count(), 2);
    assert_eq!(surface.row(0).unwrap().state().marker_ops, ops);
}

struct FailingResetStore {
    inner: InMemoryStore,
}

impl KeyValueStore for FailingResetStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        self.inner.get(key)
    }

    fn update(
        &self,
        _key: &str,
        _mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()> {
        Err(StoreError::InvalidData("read-only store".to_string()))
    }
}

#[test]
fn failed_reset_keeps_rows_consistent_with_store() {
    let store = FailingResetStore {
        inner: InMemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, json!({"5": "lunch"})),
    };
    let clock = ManualClock::new(at(23, 59, 59));
    let mut surface = HeadlessSurface::new();
    let mut board = ScheduleBoard::open(
        store,
        Box::new(clock.clone()),
        &mut surface,
        &BoardConfig::default(),
    )
    .unwrap();

    clock.advance(1);
    board.tick();

    assert_eq!(board.rollover_count(), 0);
    assert_eq!(board.failed_reset_count(), 1);
    assert_eq!(board.snapshot(5).unwrap().note_text, "lunch");
}

#[test]
fn open_rejects_invalid_config() {
    let mut surface = HeadlessSurface::new();
    let result = ScheduleBoard::open(
        InMemoryStore::new(),
        Box::new(ManualClock::new(at(8, 0, 0))),
        &mut surface,
        &BoardConfig::default().with_storage_key(""),
    );
    assert!(matches!(
        result,
        Err(BoardError::Config(ConfigError::EmptyStorageKey))
    ));
}

#[test]
fn board_over_sqlite_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    {
        let clock = ManualClock::new(at(9, 0, 0));
        let mut surface = HeadlessSurface::new();
        let board = ScheduleBoard::open(
            SqliteKvStore::open(&path).unwrap(),
            Box::new(clock),
            &mut surface,
            &BoardConfig::default(),
        )
        .unwrap();
        let target = board.trigger_for_hour(11).unwrap();
        board.edit_note(target, "dentist");
        assert_eq!(board.save(target).unwrap(), SaveOutcome::Saved);
    }

    let mut surface = HeadlessSurface::new();
    let board = ScheduleBoard::open(
        SqliteKvStore::open(&path).unwrap(),
        Box::new(ManualClock::new(at(10, 0, 0))),
        &mut surface,
        &BoardConfig::default(),
    )
    .unwrap();
    assert_eq!(board.snapshot(11).unwrap().note_text, "dentist");
    assert_eq!(surface.row(11).unwrap().state().text, "dentist");
}

#[test]
fn custom_storage_key_is_used() {
    let store = Rc::new(InMemoryStore::new());
    let clock = ManualClock::new(at(8, 0, 0));
    let mut surface = HeadlessSurface::new();
    let board = ScheduleBoard::open(
        Rc::clone(&store),
        Box::new(clock),
        &mut surface,
        &BoardConfig::default().with_storage_key("work-board"),
    )
    .unwrap();

    let target = board.trigger_for_hour(9).unwrap();
    board.edit_note(target, "planning");
    board.save(target).unwrap();

    assert_eq!(store.get("work-board").unwrap(), Some(json!({"9": "planning"})));
    assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), None);
}

#[test]
fn corrupt_saved_tasks_do_not_block_the_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    open_db(&path)
        .unwrap()
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, '{\"5\": \"lun');",
            [DEFAULT_STORAGE_KEY],
        )
        .unwrap();

    let clock = ManualClock::new(at(23, 0, 0));
    let mut surface = HeadlessSurface::new();
    let mut board = ScheduleBoard::open(
        SqliteKvStore::open(&path).unwrap(),
        Box::new(clock.clone()),
        &mut surface,
        &BoardConfig::default(),
    )
    .unwrap();
    assert!(board.snapshots().iter().all(|row| row.note_text.is_empty()));

    let target = board.trigger_for_hour(23).unwrap();
    board.edit_note(target, "sleep");
    assert_eq!(board.save(target).unwrap(), SaveOutcome::Saved);
    assert_eq!(
        board.persistence().store().get(DEFAULT_STORAGE_KEY).unwrap(),
        Some(json!({"23": "sleep"}))
    );

    clock.set(at(0, 0, 0).plus_seconds(86_400));
    board.tick();
    assert_eq!(board.rollover_count(), 1);
    assert_eq!(board.failed_reset_count(), 0);
}

#[test]
fn stop_handle_ends_run_from_another_thread() {
    let mut surface = HeadlessSurface::new();
    let mut board = ScheduleBoard::open(
        InMemoryStore::new(),
        Box::new(ManualClock::new(at(8, 0, 0))),
        &mut surface,
        &BoardConfig::default().with_tick_interval(Duration::from_millis(2)),
    )
    .unwrap();

    let handle = board.stop_handle();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        handle.stop();
    });

    let published = board.run(None);
    stopper.join().unwrap();

    assert_eq!(board.tick_count(), published + 1);
}
