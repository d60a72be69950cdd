//! Bubble scheduler - per-tick name tag updates
//!
//! Once per interval every connected player gets its name tag rebuilt from
//! its record. A record with time left shows `message\nname` and loses one
//! second; a record at zero shows the name alone. Players are processed in
//! the host's listing order and a failing player never stops the pass.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::error::TickError;
use super::record_store::RecordStore;
use super::template::TemplateResolver;
use super::traits::{HostPlayer, PlaceholderTranslator, PlayerDirectory};
use super::types::{BubbleState, DisplayFormat};

// =============================================================================
// TICK REPORT
// =============================================================================

/// What happened to one player during a tick
#[derive(Debug)]
pub enum PlayerOutcome {
    /// Name tag was set; `remaining` is the stored bubble time after this tick
    Rendered {
        name: String,
        display: String,
        remaining: u32,
    },
    /// Player was left untouched this tick
    Skipped { name: String, error: TickError },
}

impl PlayerOutcome {
    pub fn name(&self) -> &str {
        match self {
            PlayerOutcome::Rendered { name, .. } | PlayerOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn display(&self) -> Option<&str> {
        match self {
            PlayerOutcome::Rendered { display, .. } => Some(display.as_str()),
            PlayerOutcome::Skipped { .. } => None,
        }
    }
}

/// Result of one pass over the connected players
#[derive(Debug, Default)]
pub struct TickReport {
    pub outcomes: Vec<PlayerOutcome>,
}

impl TickReport {
    pub fn rendered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PlayerOutcome::Rendered { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.rendered_count()
    }

    pub fn outcome(&self, name: &str) -> Option<&PlayerOutcome> {
        self.outcomes.iter().find(|o| o.name() == name)
    }
}

// =============================================================================
// SCHEDULER
// =============================================================================

pub struct BubbleScheduler<T> {
    resolver: TemplateResolver<T>,
    format: DisplayFormat,
    interval: Duration,
    last_tick: Option<Instant>,
}

impl<T: PlaceholderTranslator> BubbleScheduler<T> {
    pub fn new(resolver: TemplateResolver<T>, format: DisplayFormat, interval: Duration) -> Self {
        Self {
            resolver,
            format,
            interval,
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn resolver(&self) -> &TemplateResolver<T> {
        &self.resolver
    }

    pub fn format(&self) -> &DisplayFormat {
        &self.format
    }

    /// Whether a tick is due at `now`. The first check is always due.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_tick
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Run a tick if one is due. Missed intervals are not replayed.
    pub fn poll<D, S>(&mut self, now: Instant, directory: &D, store: &S) -> Option<TickReport>
    where
        D: PlayerDirectory,
        S: RecordStore + ?Sized,
    {
        if !self.is_due(now) {
            return None;
        }
        self.last_tick = Some(now);
        Some(self.tick(directory, store))
    }

    /// One pass over every connected player
    pub fn tick<D, S>(&self, directory: &D, store: &S) -> TickReport
    where
        D: PlayerDirectory,
        S: RecordStore + ?Sized,
    {
        let players = directory.online_players();
        let mut report = TickReport {
            outcomes: Vec::with_capacity(players.len()),
        };

        for player in &players {
            let name = player.real_name().to_string();
            let outcome = match self.tick_player(player, store) {
                Ok((display, remaining)) => PlayerOutcome::Rendered {
                    name,
                    display,
                    remaining,
                },
                Err(error) => {
                    match &error {
                        TickError::MissingRecord(_) => {
                            debug!(player = %name, "[TICK] No record, skipping")
                        }
                        _ => warn!(player = %name, error = %error, "[TICK] Skipping player"),
                    }
                    PlayerOutcome::Skipped { name, error }
                }
            };
            report.outcomes.push(outcome);
        }

        if report.skipped_count() > 0 {
            debug!(
                rendered = report.rendered_count(),
                skipped = report.skipped_count(),
                "[TICK] Pass finished with skipped players"
            );
        }
        report
    }

    /// Update one player: returns the name tag set and the remaining bubble time.
    ///
    /// On error nothing is written and the player is not renamed.
    pub fn tick_player<S>(
        &self,
        player: &dyn HostPlayer,
        store: &S,
    ) -> Result<(String, u32), TickError>
    where
        S: RecordStore + ?Sized,
    {
        let name = player.real_name();
        let record = store
            .get(name)?
            .ok_or_else(|| TickError::MissingRecord(name.to_string()))?;

        let rendered = self
            .resolver
            .resolve(&self.format.base_display(&record), player)?;

        let (display, remaining) = match record.state() {
            BubbleState::Idle => (rendered, 0),
            BubbleState::Counting(_) => {
                let next = record.decremented();
                let remaining = next.time;
                store.upsert(next)?;
                (self.format.bubble_display(&record.message, &rendered), remaining)
            }
        };

        player.rename(&display);
        Ok((display, remaining))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::core::record_store::MemoryRecordStore;
    use crate::core::substitutions::ApiSubstitutions;
    use crate::core::traits::mocks::{MockDirectory, MockPlayer, MockTranslator};
    use crate::core::traits::IdentityTranslator;
    use crate::core::types::PlayerRecord;
    use serde_json::json;

    fn scheduler() -> BubbleScheduler<IdentityTranslator> {
        BubbleScheduler::new(
            TemplateResolver::new(IdentityTranslator, ApiSubstitutions::new()),
            DisplayFormat::default(),
            Duration::from_millis(1000),
        )
    }

    fn bob_record(time: u32) -> PlayerRecord {
        PlayerRecord::new("bob", "Bob", Some("Chief".to_string()), "Hi!", time)
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryRecordStore);

    impl RecordStore for ReadOnlyStore {
        fn get(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError> {
            self.0.get(name)
        }

        fn upsert(&self, _record: PlayerRecord) -> Result<(), StoreError> {
            Err(StoreError::FileWrite(
                "ro.json".into(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    #[test]
    fn test_bubble_rendering_and_decrement() {
        let directory = MockDirectory::new(vec![MockPlayer::named("bob")]);
        let store = MemoryRecordStore::with_records(vec![bob_record(2)]);
        let sched = scheduler();

        let report = sched.tick(&directory, &store);
        assert_eq!(report.rendered_count(), 1);
        let bob = directory.player("bob");
        assert_eq!(bob.last_display().as_deref(), Some("Hi!\n[Chief] Bob"));
        assert_eq!(store.get("bob").unwrap().unwrap().time, 1);

        sched.tick(&directory, &store);
        assert_eq!(bob.last_display().as_deref(), Some("Hi!\n[Chief] Bob"));
        assert_eq!(store.get("bob").unwrap().unwrap().time, 0);

        // Stored time is now zero: plain name, no message line
        sched.tick(&directory, &store);
        assert_eq!(bob.last_display().as_deref(), Some("[Chief] Bob"));
        assert_eq!(store.get("bob").unwrap().unwrap().time, 0);
    }

    #[test]
    fn test_decrement_keeps_other_fields() {
        let directory = MockDirectory::new(vec![MockPlayer::named("bob")]);
        let store = MemoryRecordStore::with_records(vec![bob_record(3)]);
        scheduler().tick(&directory, &store);

        let stored = store.get("bob").unwrap().unwrap();
        assert_eq!(stored, PlayerRecord { time: 2, ..bob_record(3) });
    }

    #[test]
    fn test_idle_is_idempotent() {
        let directory = MockDirectory::new(vec![MockPlayer::named("bob")]);
        let store = MemoryRecordStore::with_records(vec![bob_record(0)]);
        let sched = scheduler();

        for _ in 0..5 {
            sched.tick(&directory, &store);
        }

        let bob = directory.player("bob");
        assert_eq!(bob.rename_count(), 5);
        assert!(bob.renames.borrow().iter().all(|d| d == "[Chief] Bob"));
        assert_eq!(store.get("bob").unwrap().unwrap(), bob_record(0));
    }

    #[test]
    fn test_monotonic_decay() {
        let n = 7;
        let directory = MockDirectory::new(vec![MockPlayer::named("bob")]);
        let store = MemoryRecordStore::with_records(vec![bob_record(n)]);
        let sched = scheduler();

        for expected in (0..n).rev() {
            let report = sched.tick(&directory, &store);
            match report.outcome("bob") {
                Some(PlayerOutcome::Rendered { remaining, .. }) => assert_eq!(*remaining, expected),
                other => panic!("unexpected outcome {:?}", other),
            }
            assert_eq!(store.get("bob").unwrap().unwrap().time, expected);
        }

        let report = sched.tick(&directory, &store);
        assert_eq!(report.outcome("bob").and_then(|o| o.display()), Some("[Chief] Bob"));
        assert_eq!(store.get("bob").unwrap().unwrap().time, 0);
    }

    #[test]
    fn test_name_is_resolved_against_player() {
        let subs: ApiSubstitutions = [("<3", "♥")].into_iter().collect();
        let sched = BubbleScheduler::new(
            TemplateResolver::new(IdentityTranslator, subs),
            DisplayFormat::default(),
            Duration::from_secs(1),
        );
        let directory = MockDirectory::new(vec![MockPlayer::new("bob", json!({"lvl": 12}))]);
        let store = MemoryRecordStore::with_records(vec![PlayerRecord::new(
            "bob",
            "Bob Lv{lvl} <3",
            None,
            "",
            0,
        )]);

        sched.tick(&directory, &store);
        assert_eq!(
            directory.player("bob").last_display().as_deref(),
            Some("Bob Lv12 ♥")
        );
    }

    #[test]
    fn test_message_is_not_resolved() {
        let directory = MockDirectory::new(vec![MockPlayer::new("bob", json!({"lvl": 12}))]);
        let store = MemoryRecordStore::with_records(vec![PlayerRecord::new(
            "bob", "Bob", None, "{lvl}", 1,
        )]);
        scheduler().tick(&directory, &store);
        assert_eq!(
            directory.player("bob").last_display().as_deref(),
            Some("{lvl}\nBob")
        );
    }

    // -------------------------------------------------------------------------
    // Isolation
    // -------------------------------------------------------------------------

    #[test]
    fn test_missing_record_isolation() {
        let directory = MockDirectory::new(vec![
            MockPlayer::named("a"),
            MockPlayer::named("b"),
            MockPlayer::named("c"),
        ]);
        let store = MemoryRecordStore::with_records(vec![
            PlayerRecord::new("a", "Alpha", None, "yo", 1),
            PlayerRecord::new("c", "Charlie", None, "", 0),
        ]);

        let report = scheduler().tick(&directory, &store);

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(report.rendered_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert!(matches!(
            report.outcome("b"),
            Some(PlayerOutcome::Skipped {
                error: TickError::MissingRecord(_),
                ..
            })
        ));

        assert_eq!(directory.player("a").last_display().as_deref(), Some("yo\nAlpha"));
        assert_eq!(directory.player("b").rename_count(), 0);
        assert_eq!(directory.player("c").last_display().as_deref(), Some("Charlie"));
        assert_eq!(store.get("a").unwrap().unwrap().time, 0);
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_translation_failure_skips_only_that_player() {
        let translator = MockTranslator::new();
        translator.fail_for("b");
        let sched = BubbleScheduler::new(
            TemplateResolver::new(translator, ApiSubstitutions::new()),
            DisplayFormat::default(),
            Duration::from_secs(1),
        );
        let directory = MockDirectory::new(vec![MockPlayer::named("a"), MockPlayer::named("b")]);
        let store = MemoryRecordStore::with_records(vec![
            PlayerRecord::new("a", "%player_name%", None, "", 0),
            PlayerRecord::new("b", "B", None, "msg", 3),
        ]);

        let report = sched.tick(&directory, &store);

        assert_eq!(directory.player("a").last_display().as_deref(), Some("a"));
        assert_eq!(directory.player("b").rename_count(), 0);
        assert!(matches!(
            report.outcome("b"),
            Some(PlayerOutcome::Skipped {
                error: TickError::Translation(_),
                ..
            })
        ));
        // Failed resolution does not consume bubble time
        assert_eq!(store.get("b").unwrap().unwrap().time, 3);
    }

    #[test]
    fn test_store_write_failure_skips_rename() {
        let directory = MockDirectory::new(vec![MockPlayer::named("bob"), MockPlayer::named("ann")]);
        let store = ReadOnlyStore(MemoryRecordStore::with_records(vec![
            bob_record(2),
            PlayerRecord::new("ann", "Ann", None, "", 0),
        ]));

        let report = scheduler().tick(&directory, &store);

        assert!(matches!(
            report.outcome("bob"),
            Some(PlayerOutcome::Skipped {
                error: TickError::Store(_),
                ..
            })
        ));
        assert_eq!(directory.player("bob").rename_count(), 0);
        // Idle players need no write and still render
        assert_eq!(directory.player("ann").last_display().as_deref(), Some("Ann"));
    }

    #[test]
    fn test_empty_directory() {
        let report = scheduler().tick(&MockDirectory::default(), &MemoryRecordStore::new());
        assert!(report.outcomes.is_empty());
    }

    // -------------------------------------------------------------------------
    // Cadence
    // -------------------------------------------------------------------------

    #[test]
    fn test_poll_throttles_to_interval() {
        let directory = MockDirectory::new(vec![MockPlayer::named("bob")]);
        let store = MemoryRecordStore::with_records(vec![bob_record(10)]);
        let mut sched = scheduler();
        let start = Instant::now();

        assert!(sched.poll(start, &directory, &store).is_some());
        assert!(sched
            .poll(start + Duration::from_millis(500), &directory, &store)
            .is_none());
        assert!(sched
            .poll(start + Duration::from_millis(1000), &directory, &store)
            .is_some());
        // A late call runs a single tick, it does not catch up
        assert!(sched
            .poll(start + Duration::from_millis(4000), &directory, &store)
            .is_some());
        assert!(sched
            .poll(start + Duration::from_millis(4100), &directory, &store)
            .is_none());

        assert_eq!(store.get("bob").unwrap().unwrap().time, 7);
        assert_eq!(directory.player("bob").rename_count(), 3);
    }

    #[test]
    fn test_first_poll_is_due() {
        let sched = scheduler();
        assert!(sched.is_due(Instant::now()));
        assert_eq!(sched.interval(), Duration::from_millis(1000));
    }
}
