//! Tests for the game session state machine.

use std::sync::{Arc, Mutex};

use jspace::{
    AdvanceOutcome, EditorInput, EditorOutput, ExternalFault, FAREWELL, FileStore, GAME_OVER,
    GameSession, MemoryStore, Mentor, MentorMood, NOTHING_TYPED, PLAYER_KEY, PersistenceGateway,
    PlayerRecord, ScoreError, ScoreSink, SessionError, SessionPhase, SessionPorts, StorageError,
    TokenSource, TokenizeError, Verdict,
};
use jspace_tasks::{TaskCatalog, Token};

/// Everything the fake ports saw.
#[derive(Debug, Default)]
struct Screen {
    input: String,
    output: Vec<String>,
    mentor: Vec<String>,
    moods: Vec<MentorMood>,
    clears: usize,
}

type SharedScreen = Arc<Mutex<Screen>>;

struct FakeInput(SharedScreen);

impl EditorInput for FakeInput {
    fn current_text(&self) -> String {
        self.0.lock().expect("screen").input.clone()
    }

    fn clear(&mut self) {
        let mut screen = self.0.lock().expect("screen");
        screen.input.clear();
        screen.clears += 1;
    }
}

struct FakeOutput(SharedScreen);

impl EditorOutput for FakeOutput {
    fn set_text(&mut self, text: String) {
        self.0.lock().expect("screen").output.push(text);
    }
}

struct FakeMentor(SharedScreen);

impl Mentor for FakeMentor {
    fn set_text(&mut self, text: String) {
        self.0.lock().expect("screen").mentor.push(text);
    }

    fn set_mood(&mut self, mood: MentorMood) {
        self.0.lock().expect("screen").moods.push(mood);
    }
}

fn ports(screen: &SharedScreen) -> SessionPorts {
    SessionPorts::new(
        Box::new(FakeInput(screen.clone())),
        Box::new(FakeOutput(screen.clone())),
    )
    .with_mentor(Box::new(FakeMentor(screen.clone())))
}

fn last_output(screen: &SharedScreen) -> String {
    screen
        .lock()
        .expect("screen")
        .output
        .last()
        .cloned()
        .unwrap_or_default()
}

/// Score sink that remembers what it was sent.
#[derive(Default)]
struct RecordingSink {
    submitted: Mutex<Vec<PlayerRecord>>,
    fail: bool,
}

#[async_trait::async_trait]
impl ScoreSink for RecordingSink {
    async fn submit(&self, record: &PlayerRecord) -> Result<(), ScoreError> {
        if self.fail {
            return Err(ScoreError::new("scoreboard offline"));
        }
        self.submitted.lock().expect("sink").push(record.clone());
        Ok(())
    }

    async fn fetch_aggregate(&self) -> Result<serde_json::Value, ScoreError> {
        if self.fail {
            return Err(ScoreError::new("scoreboard offline"));
        }
        let count = self.submitted.lock().expect("sink").len();
        Ok(serde_json::json!({ "players": 1, "submissions": count }))
    }
}

/// Token source that counts calls and can be told to fail.
#[derive(Default)]
struct CountingTokenizer {
    calls: Mutex<usize>,
    fail: bool,
}

#[async_trait::async_trait]
impl TokenSource for CountingTokenizer {
    async fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        *self.calls.lock().expect("calls") += 1;
        if self.fail {
            return Err(TokenizeError::new("backend unreachable"));
        }
        Ok(jspace_tasks::tokenize(source))
    }
}

/// Store whose writes always fail.
#[derive(Default)]
struct ReadOnlyStore {
    inner: MemoryStore,
}

impl PersistenceGateway for ReadOnlyStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(key)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::new("disk full"))
    }

    fn reset(&self) -> Result<(), StorageError> {
        Err(StorageError::new("disk full"))
    }
}

struct Harness {
    session: GameSession,
    store: MemoryStore,
    sink: Arc<RecordingSink>,
    tokenizer: Arc<CountingTokenizer>,
    screen: SharedScreen,
}

fn harness_with(store: MemoryStore, sink: RecordingSink, tokenizer: CountingTokenizer) -> Harness {
    let sink = Arc::new(sink);
    let tokenizer = Arc::new(tokenizer);
    let session = GameSession::new(
        TaskCatalog::standard(),
        "Ada",
        tokenizer.clone(),
        Box::new(store.clone()),
        sink.clone(),
    );
    Harness {
        session,
        store,
        sink,
        tokenizer,
        screen: SharedScreen::default(),
    }
}

fn harness() -> Harness {
    harness_with(
        MemoryStore::new(),
        RecordingSink::default(),
        CountingTokenizer::default(),
    )
}

fn saved_record(store: &MemoryStore) -> Option<PlayerRecord> {
    store
        .read(PLAYER_KEY)
        .expect("read")
        .map(|json| serde_json::from_str(&json).expect("record json"))
}

fn save_record(store: &MemoryStore, task_index: usize, tries: u32) {
    let record = PlayerRecord::new("Ada".to_string(), task_index, tries);
    store
        .write(PLAYER_KEY, &serde_json::to_string(&record).expect("json"))
        .expect("write");
}

#[tokio::test]
async fn test_fresh_start_shows_first_task() {
    let mut h = harness();
    let outcome = h.session.start(ports(&h.screen));

    assert!(!outcome.resumed());
    assert_eq!(*outcome.task_index(), 0);
    assert!(outcome.faults().is_empty());
    assert_eq!(h.session.phase(), SessionPhase::AwaitingInput);
    assert!(!h.session.state().advance_enabled());

    let first = h.session.catalog().get(0).expect("task");
    assert_eq!(&last_output(&h.screen), first.instruction());
    let screen = h.screen.lock().expect("screen");
    assert_eq!(screen.clears, 1);
    assert_eq!(screen.moods, vec![MentorMood::Neutral]);
    drop(screen);

    assert_eq!(saved_record(&h.store), Some(PlayerRecord::new("Ada".to_string(), 0, 0)));
}

#[tokio::test]
async fn test_blank_submission_is_not_counted() {
    let mut h = harness();
    h.session.start(ports(&h.screen));

    for blank in ["", "   ", "\n\t "] {
        let outcome = h.session.submit(blank).await.expect("submit");
        assert_eq!(*outcome.verdict(), Verdict::Empty);
        assert_eq!(*outcome.retry_count(), 0);
        assert_eq!(last_output(&h.screen), NOTHING_TYPED);
    }

    assert_eq!(*h.tokenizer.calls.lock().expect("calls"), 0);
    assert_eq!(*h.session.state().retry_count(), 0);
}

#[tokio::test]
async fn test_every_real_submission_counts_once() {
    let mut h = harness();
    save_record(&h.store, 1, 0);
    h.session.start(ports(&h.screen));

    let failed = h.session.submit("let oxigen = 5;").await.expect("submit");
    assert_eq!(*failed.verdict(), Verdict::Failed);
    assert_eq!(*failed.retry_count(), 1);
    assert_eq!(h.session.phase(), SessionPhase::AwaitingInput);

    let failed = h.session.submit("let oxygen = \"five\";").await.expect("submit");
    assert_eq!(*failed.verdict(), Verdict::Failed);
    assert_eq!(*failed.retry_count(), 2);
    assert!(h.sink.submitted.lock().expect("sink").is_empty());

    let passed = h.session.submit("let oxygen = 5;").await.expect("submit");
    assert_eq!(*passed.verdict(), Verdict::Passed);
    assert_eq!(*passed.retry_count(), 3);

    assert_eq!(saved_record(&h.store), Some(PlayerRecord::new("Ada".to_string(), 1, 3)));
    assert_eq!(
        *h.sink.submitted.lock().expect("sink"),
        vec![PlayerRecord::new("Ada".to_string(), 1, 3)]
    );
}

#[tokio::test]
async fn test_feedback_and_mentor_follow_verdict() {
    let mut h = harness();
    save_record(&h.store, 1, 0);
    h.session.start(ports(&h.screen));
    let task = h.session.catalog().get(1).cloned().expect("task");
    let mentor = task.mentor().clone().expect("mentor lines");

    h.session.submit("let oxigen = 5;").await.expect("submit");
    assert_eq!(&last_output(&h.screen), task.message_wrong());
    {
        let screen = h.screen.lock().expect("screen");
        assert_eq!(screen.mentor.last(), Some(mentor.wrong()));
        assert_eq!(screen.moods.last(), Some(&MentorMood::Failure));
    }

    h.session.submit("let oxygen = 5;").await.expect("submit");
    assert_eq!(&last_output(&h.screen), task.message_correct());
    let screen = h.screen.lock().expect("screen");
    assert_eq!(screen.mentor.last(), Some(mentor.correct()));
    assert_eq!(screen.moods.last(), Some(&MentorMood::Success));
}

#[tokio::test]
async fn test_advance_requires_a_pass() {
    let mut h = harness();
    assert!(matches!(h.session.advance().await, Err(SessionError::NotStarted)));

    h.session.start(ports(&h.screen));
    assert!(matches!(h.session.advance().await, Err(SessionError::AdvanceNotEnabled)));

    h.session.submit("let pilot = \"Ada\"").await.expect("submit");
    assert!(h.session.state().advance_enabled());
    assert_eq!(h.session.phase(), SessionPhase::AdvanceReady);

    let outcome = h.session.advance().await.expect("advance");
    assert!(!outcome.is_game_over());
    assert!(matches!(h.session.advance().await, Err(SessionError::AdvanceNotEnabled)));
}

#[tokio::test]
async fn test_submit_rejected_outside_input_phases() {
    let mut h = harness();
    assert!(matches!(
        h.session.submit("let x = 1;").await,
        Err(SessionError::NotStarted)
    ));
    assert!(matches!(
        h.session.submit_from_editor().await,
        Err(SessionError::NotStarted)
    ));

    h.session.start(ports(&h.screen));
    h.session.submit("let x = 1;").await.expect("submit");
    assert!(matches!(
        h.session.submit("let x = 2;").await,
        Err(SessionError::AwaitingAdvance)
    ));
    assert_eq!(*h.session.state().retry_count(), 1);
}

#[tokio::test]
async fn test_end_to_end_second_task() {
    let mut h = harness();
    save_record(&h.store, 1, 0);

    let outcome = h.session.start(ports(&h.screen));
    assert!(outcome.resumed());
    assert_eq!(*outcome.task_index(), 1);

    let submitted = h.session.submit("let oxygen = 5;").await.expect("submit");
    assert_eq!(*submitted.verdict(), Verdict::Passed);
    assert!(h.session.state().advance_enabled());
    assert_eq!(*h.session.state().retry_count(), 1);

    let advanced = h.session.advance().await.expect("advance");
    match advanced {
        AdvanceOutcome::NextTask { task_index, faults } => {
            assert_eq!(task_index, 2);
            assert!(faults.is_empty());
        }
        other => panic!("expected next task, got {:?}", other),
    }
    assert_eq!(*h.session.state().current_task_index(), 2);
    assert!(!h.session.state().advance_enabled());

    let third = h.session.catalog().get(2).expect("task");
    assert_eq!(&last_output(&h.screen), third.instruction());
    assert_eq!(h.session.current_task().map(|t| *t.id()), Some(2));
    assert_eq!(saved_record(&h.store), Some(PlayerRecord::new("Ada".to_string(), 2, 1)));
}

#[tokio::test]
async fn test_editor_text_is_read_at_submit_time() {
    let mut h = harness();
    h.session.start(ports(&h.screen));

    h.screen.lock().expect("screen").input = "const pilot = 'Ada';".to_string();
    let outcome = h.session.submit_from_editor().await.expect("submit");
    assert_eq!(*outcome.verdict(), Verdict::Passed);
}

#[tokio::test]
async fn test_last_task_ends_the_game() {
    let mut h = harness();
    save_record(&h.store, 2, 4);
    h.session.start(ports(&h.screen));

    h.session
        .submit("const callsign = \"Apollo\";")
        .await
        .expect("submit");
    let outcome = h.session.advance().await.expect("advance");

    match &outcome {
        AdvanceOutcome::GameOver { board, faults } => {
            assert!(faults.is_empty());
            assert_eq!(
                board.as_ref().map(|b| b["submissions"].clone()),
                Some(serde_json::json!(1))
            );
        }
        other => panic!("expected game over, got {:?}", other),
    }
    assert_eq!(h.session.phase(), SessionPhase::GameOver);
    assert_eq!(*h.session.state().current_task_index(), 3);
    assert!(h.session.current_task().is_none());

    let shown = last_output(&h.screen);
    assert!(shown.starts_with(GAME_OVER));
    assert!(shown.contains("\"submissions\": 1"));
    assert_eq!(
        h.screen.lock().expect("screen").mentor.last().map(String::as_str),
        Some(FAREWELL)
    );

    assert_eq!(h.store.read(PLAYER_KEY).expect("read"), None);
    assert!(matches!(h.session.submit("let x = 1;").await, Err(SessionError::GameOver)));
    assert!(matches!(h.session.advance().await, Err(SessionError::GameOver)));

    let restarted = h.session.start(ports(&h.screen));
    assert!(!restarted.resumed());
    assert_eq!(*h.session.state().current_task_index(), 0);
    assert_eq!(*h.session.state().retry_count(), 0);
}

#[tokio::test]
async fn test_unusable_saved_progress_starts_fresh() {
    for saved in ["not json", r#"{"name":"Ada","taskIndex":3,"completedTries":2}"#] {
        let mut h = harness();
        h.store.write(PLAYER_KEY, saved).expect("write");

        let outcome = h.session.start(ports(&h.screen));
        assert!(!outcome.resumed());
        assert_eq!(*outcome.task_index(), 0);
        assert_eq!(*h.session.state().retry_count(), 0);
    }
}

#[tokio::test]
async fn test_tokenizer_failure_changes_nothing() {
    let mut h = harness_with(
        MemoryStore::new(),
        RecordingSink::default(),
        CountingTokenizer {
            fail: true,
            ..Default::default()
        },
    );
    h.session.start(ports(&h.screen));
    let before = *h.session.state();

    let result = h.session.submit("let pilot = 1;").await;
    assert!(matches!(result, Err(SessionError::Tokenizer(_))));
    assert_eq!(*h.session.state(), before);
    assert_eq!(h.session.phase(), SessionPhase::AwaitingInput);
    assert_eq!(saved_record(&h.store), Some(PlayerRecord::new("Ada".to_string(), 0, 0)));
}

#[tokio::test]
async fn test_collaborator_faults_do_not_block_progress() {
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..Default::default()
    });
    let mut session = GameSession::new(
        TaskCatalog::standard(),
        "Ada",
        Arc::new(CountingTokenizer::default()),
        Box::new(ReadOnlyStore::default()),
        sink,
    );
    let screen = SharedScreen::default();

    let started = session.start(ports(&screen));
    assert!(matches!(started.faults()[..], [ExternalFault::Storage(_)]));

    let submitted = session.submit("let pilot = 1;").await.expect("submit");
    assert_eq!(*submitted.verdict(), Verdict::Passed);
    assert_eq!(submitted.faults().len(), 2);
    assert!(matches!(submitted.faults()[0], ExternalFault::Storage(_)));
    assert!(matches!(submitted.faults()[1], ExternalFault::Scoreboard(_)));
    assert!(session.state().advance_enabled());

    let advanced = session.advance().await.expect("advance");
    assert_eq!(advanced.faults().len(), 1);
    assert_eq!(*session.state().current_task_index(), 1);
}

/// Score sink that never answers.
struct StalledSink;

#[async_trait::async_trait]
impl ScoreSink for StalledSink {
    async fn submit(&self, _record: &PlayerRecord) -> Result<(), ScoreError> {
        std::future::pending::<Result<(), ScoreError>>().await
    }

    async fn fetch_aggregate(&self) -> Result<serde_json::Value, ScoreError> {
        std::future::pending::<Result<serde_json::Value, ScoreError>>().await
    }
}

#[tokio::test]
async fn test_stalled_scoreboard_does_not_hold_back_a_pass() {
    let mut session = GameSession::new(
        TaskCatalog::standard(),
        "Ada",
        Arc::new(CountingTokenizer::default()),
        Box::new(MemoryStore::new()),
        Arc::new(StalledSink),
    );
    let screen = SharedScreen::default();
    session.start(ports(&screen));
    let first = session.catalog().get(0).cloned().expect("task");

    let result = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        session.submit("let pilot = 1;"),
    )
    .await;
    assert!(result.is_err(), "sink never answers");

    assert_eq!(session.phase(), SessionPhase::AdvanceReady);
    assert!(session.state().advance_enabled());
    assert_eq!(*session.state().retry_count(), 1);
    assert_eq!(&last_output(&screen), first.message_correct());
    assert_eq!(
        screen.lock().expect("screen").moods.last(),
        Some(&MentorMood::Success)
    );

    let advanced = session.advance().await.expect("advance");
    assert!(!advanced.is_game_over());
    assert_eq!(*session.state().current_task_index(), 1);
}

#[tokio::test]
async fn test_progress_saved_after_corrupt_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("progress.json");
    std::fs::write(&path, r#"{"player":"{\"name\":\"Ad"#).expect("write");

    let new_session = || {
        GameSession::new(
            TaskCatalog::standard(),
            "Ada",
            Arc::new(CountingTokenizer::default()),
            Box::new(FileStore::new(&path)),
            Arc::new(RecordingSink::default()),
        )
    };

    let mut session = new_session();
    let started = session.start(ports(&SharedScreen::default()));
    assert!(!started.resumed());
    assert!(matches!(started.faults()[..], [ExternalFault::Storage(_)]));

    let submitted = session.submit("let pilot = 1;").await.expect("submit");
    assert!(submitted.faults().is_empty());
    let advanced = session.advance().await.expect("advance");
    assert!(advanced.faults().is_empty());

    let mut resumed = new_session();
    let outcome = resumed.start(ports(&SharedScreen::default()));
    assert!(outcome.resumed());
    assert_eq!(*outcome.task_index(), 1);
    assert_eq!(*resumed.state().retry_count(), 1);
}
