//! Prompt submission: init thread, stream progress, run the prompt.
//!
//! Every submission gets an epoch. Responses, stream events and cleanup that
//! belong to an older epoch are dropped, so a slow request from a superseded
//! submission can never touch the current one.

use super::api::{ApiError, JockeyApi};
use super::stream::{EventStreamFactory, SignalHandler, StreamHandle, StreamSignal};
use crate::shared::audio::{background_tracks, BackgroundMusic};
use crate::shared::state::{apply, JockeySession, StateCell};
use contracts::domain::a001_jockey_message::{parse_stream_event, DisplayMessage, ToolCall};
use contracts::usecases::u001_process_prompt::ProcessRequest;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub const FAILED_TO_PROCESS: &str = "Failed to process text. Please try again.";
pub const CONNECTION_ERROR: &str = "Connection error occurred";

const FADE_DELAY_SECONDS: f64 = 1.0;
const FADE_SECONDS: f64 = 3.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Index ID is required")]
    MissingIndexId,
    #[error("Thread initialization failed: {0}")]
    Init(ApiError),
    #[error("Could not open event stream: {0}")]
    Stream(ApiError),
    #[error("Processing failed: {0}")]
    Process(ApiError),
    #[error("Submission was superseded")]
    Superseded,
}

/// UI facing state of the current submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionState {
    pub epoch: u64,
    pub processing: bool,
    pub error: Option<String>,
    /// Append-only for the lifetime of one submission
    pub messages: Vec<DisplayMessage>,
    pub tool_calls: Vec<ToolCall>,
    pub thread_id: Option<String>,
    /// Trimmed index id the submission was made with
    pub index_id: String,
}

impl SubmissionState {
    /// Starts a new submission and returns its epoch.
    ///
    /// A blank prompt or a submission already in flight is ignored; a blank
    /// index id sets a validation error. Neither starts anything.
    pub fn begin(&mut self, prompt: &str, index_id: &str) -> Option<u64> {
        if prompt.trim().is_empty() || self.processing {
            return None;
        }
        if index_id.trim().is_empty() {
            self.error = Some(SubmitError::MissingIndexId.to_string());
            return None;
        }

        self.epoch += 1;
        self.processing = true;
        self.error = None;
        self.messages.clear();
        self.tool_calls.clear();
        self.thread_id = None;
        self.index_id = index_id.trim().to_string();
        Some(self.epoch)
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn set_thread(&mut self, epoch: u64, thread_id: &str) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.thread_id = Some(thread_id.to_string());
        true
    }

    /// Appends the event if it carries text. Returns whether a message was added.
    pub fn push_event(&mut self, epoch: u64, raw: &str) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        match parse_stream_event(raw) {
            Ok(event) => match event.into_display_message() {
                Some(message) => {
                    self.messages.push(message);
                    true
                }
                None => false,
            },
            Err(e) => {
                log::error!("[SSE] Failed to parse event data: {}", e);
                false
            }
        }
    }

    pub fn fail(&mut self, epoch: u64, message: &str) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.error = Some(message.to_string());
        true
    }

    /// Leaves processing state. True only for the first call of the current epoch.
    pub fn finish(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) || !self.processing {
            return false;
        }
        self.processing = false;
        true
    }

    /// Makes every in-flight continuation stale
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.processing = false;
    }
}

/// Collaborators of a [`SubmissionFlow`]
pub struct FlowDeps {
    pub api: Rc<dyn JockeyApi>,
    pub streams: Rc<dyn EventStreamFactory>,
    pub music: Rc<dyn BackgroundMusic>,
    pub state: Rc<dyn StateCell<SubmissionState>>,
    pub session: Rc<dyn StateCell<JockeySession>>,
    /// Picks a track index below the given count
    pub pick_track: Box<dyn Fn(usize) -> usize>,
}

struct FlowInner {
    deps: FlowDeps,
    /// Open stream, tagged with the epoch that opened it
    stream: RefCell<Option<(u64, Box<dyn StreamHandle>)>>,
    // Closed handles are dropped on the next open, never from their own callback
    retired: RefCell<Vec<Box<dyn StreamHandle>>>,
}

#[derive(Clone)]
pub struct SubmissionFlow {
    inner: Rc<FlowInner>,
}

impl SubmissionFlow {
    pub fn new(deps: FlowDeps) -> Self {
        Self {
            inner: Rc::new(FlowInner {
                deps,
                stream: RefCell::new(None),
                retired: RefCell::new(Vec::new()),
            }),
        }
    }

    fn state(&self) -> &dyn StateCell<SubmissionState> {
        self.inner.deps.state.as_ref()
    }

    fn session(&self) -> &dyn StateCell<JockeySession> {
        self.inner.deps.session.as_ref()
    }

    fn is_current(&self, epoch: u64) -> bool {
        apply(self.state(), |s| s.is_current(epoch))
    }

    pub async fn submit(&self, prompt: &str, index_id: &str) {
        let Some(epoch) = apply(self.state(), |s| s.begin(prompt, index_id)) else {
            return;
        };
        apply(self.session(), |s| s.start());
        self.close_stream();

        let music = self.inner.deps.music.clone();
        log::info!("[App] Stopping current background music...");
        music.stop();
        let tracks = background_tracks();
        let pick = (self.inner.deps.pick_track)(tracks.len()).min(tracks.len() - 1);
        log::info!("[App] Playing new background music...");
        music.play(&tracks[pick]).await;

        match self.run(epoch, prompt, index_id).await {
            Ok(()) => {}
            Err(SubmitError::Superseded) => {
                log::debug!("[App] Submission {} was superseded", epoch);
            }
            Err(e) => {
                log::error!("[App] Error: {}", e);
                if apply(self.state(), |s| s.fail(epoch, FAILED_TO_PROCESS)) {
                    apply(self.session(), |s| s.fail());
                }
            }
        }

        self.teardown(epoch);
    }

    async fn run(&self, epoch: u64, prompt: &str, index_id: &str) -> Result<(), SubmitError> {
        log::info!("[App] Initializing thread...");
        let init = self
            .inner
            .deps
            .api
            .init_thread()
            .await
            .map_err(SubmitError::Init)?;
        if !self.is_current(epoch) {
            return Err(SubmitError::Superseded);
        }

        let thread_id = init.thread_id;
        log::info!("[App] Thread initialized with ID: {}", thread_id);
        apply(self.state(), |s| s.set_thread(epoch, &thread_id));
        apply(self.session(), |s| {
            s.set_thread(&thread_id);
            s.update_metadata(patch([("index_id", Value::from(index_id.trim()))]));
        });

        self.open_stream(epoch, &thread_id)?;

        log::info!("[App] Processing text...");
        let request = ProcessRequest::new(prompt, &thread_id, index_id);
        let response = self
            .inner
            .deps
            .api
            .process(&request)
            .await
            .map_err(SubmitError::Process)?;
        if !self.is_current(epoch) {
            return Err(SubmitError::Superseded);
        }

        log::info!(
            "[App] Processing complete: {} ({})",
            response.operation_id,
            response.status
        );
        apply(self.session(), |s| {
            s.update_metadata(patch([
                ("operation_id", Value::from(response.operation_id.clone())),
                ("status", Value::from(response.status.clone())),
            ]))
        });
        Ok(())
    }

    fn open_stream(&self, epoch: u64, thread_id: &str) -> Result<(), SubmitError> {
        self.close_stream();
        self.inner.retired.borrow_mut().clear();

        let weak = Rc::downgrade(&self.inner);
        let on_signal: SignalHandler = Rc::new(move |signal| {
            if let Some(inner) = weak.upgrade() {
                SubmissionFlow { inner }.on_stream_signal(epoch, signal);
            }
        });

        log::info!("[App] Starting Jockey updates...");
        let handle = self
            .inner
            .deps
            .streams
            .open(thread_id, on_signal)
            .map_err(SubmitError::Stream)?;
        *self.inner.stream.borrow_mut() = Some((epoch, handle));
        Ok(())
    }

    fn on_stream_signal(&self, epoch: u64, signal: StreamSignal) {
        match signal {
            StreamSignal::Message(raw) => {
                apply(self.state(), |s| s.push_event(epoch, &raw));
            }
            StreamSignal::Error => {
                if apply(self.state(), |s| s.fail(epoch, CONNECTION_ERROR)) {
                    apply(self.session(), |s| s.fail());
                    self.teardown(epoch);
                }
            }
        }
    }

    fn close_stream(&self) {
        let open = self.inner.stream.borrow_mut().take();
        if let Some((_, handle)) = open {
            handle.close();
            self.inner.retired.borrow_mut().push(handle);
        }
    }

    /// Runs on every exit path of a submission
    fn teardown(&self, epoch: u64) {
        let owns_stream = matches!(&*self.inner.stream.borrow(), Some((e, _)) if *e == epoch);
        if owns_stream {
            self.close_stream();
        }
        if apply(self.state(), |s| s.finish(epoch)) {
            self.inner
                .deps
                .music
                .fade_out(FADE_DELAY_SECONDS, FADE_SECONDS);
            apply(self.session(), |s| s.finish());
        }
    }

    /// Component unmount: drop the stream and make pending work stale
    pub fn shutdown(&self) {
        apply(self.state(), |s| s.invalidate());
        self.close_stream();
    }
}

fn patch<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::JockeyStatus;
    use async_trait::async_trait;
    use contracts::usecases::u001_process_prompt::{InitThreadResponse, ProcessResponse};
    use futures::executor::block_on;
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::cell::Cell;
    use std::collections::VecDeque;

    type Hook = Box<dyn FnOnce() -> LocalBoxFuture<'static, ()>>;

    #[derive(Default)]
    struct Recorder {
        log: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, entry: impl Into<String>) {
            self.log.borrow_mut().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn count(&self, prefix: &str) -> usize {
            self.log
                .borrow()
                .iter()
                .filter(|e| e.starts_with(prefix))
                .count()
        }
    }

    struct FakeApi {
        rec: Rc<Recorder>,
        inits: RefCell<VecDeque<Result<InitThreadResponse, ApiError>>>,
        processes: RefCell<VecDeque<Result<ProcessResponse, ApiError>>>,
        hooks: RefCell<VecDeque<Hook>>,
    }

    #[async_trait(?Send)]
    impl JockeyApi for FakeApi {
        async fn init_thread(&self) -> Result<InitThreadResponse, ApiError> {
            self.rec.push("init");
            self.inits
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ApiError::Network("no script".into())))
        }

        async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, ApiError> {
            self.rec.push(format!(
                "process:{}:{}:{}",
                request.thread_id, request.text, request.index_id
            ));
            let hook = self.hooks.borrow_mut().pop_front();
            if let Some(hook) = hook {
                hook().await;
            }
            self.processes
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ApiError::Network("no script".into())))
        }
    }

    struct FakeHandle {
        thread_id: String,
        rec: Rc<Recorder>,
        open_now: Rc<Cell<usize>>,
        closed: Cell<bool>,
    }

    impl StreamHandle for FakeHandle {
        fn close(&self) {
            if !self.closed.replace(true) {
                self.open_now.set(self.open_now.get() - 1);
                self.rec.push(format!("stream:close:{}", self.thread_id));
            }
        }
    }

    #[derive(Default)]
    struct FakeStreams {
        rec: Rc<Recorder>,
        open_now: Rc<Cell<usize>>,
        max_open: Cell<usize>,
        handlers: RefCell<Vec<SignalHandler>>,
        refuse: Cell<bool>,
    }

    impl FakeStreams {
        fn emit(&self, signal: StreamSignal) {
            let handler = self.handlers.borrow().last().cloned();
            if let Some(handler) = handler {
                handler(signal);
            }
        }

        fn emit_on(&self, index: usize, signal: StreamSignal) {
            let handler = self.handlers.borrow()[index].clone();
            handler(signal);
        }
    }

    impl EventStreamFactory for FakeStreams {
        fn open(
            &self,
            thread_id: &str,
            on_signal: SignalHandler,
        ) -> Result<Box<dyn StreamHandle>, ApiError> {
            if self.refuse.get() {
                return Err(ApiError::Network("refused".into()));
            }
            self.rec.push(format!("stream:open:{}", thread_id));
            self.open_now.set(self.open_now.get() + 1);
            self.max_open.set(self.max_open.get().max(self.open_now.get()));
            self.handlers.borrow_mut().push(on_signal);
            Ok(Box::new(FakeHandle {
                thread_id: thread_id.to_string(),
                rec: self.rec.clone(),
                open_now: self.open_now.clone(),
                closed: Cell::new(false),
            }))
        }
    }

    struct FakeMusic {
        rec: Rc<Recorder>,
    }

    #[async_trait(?Send)]
    impl BackgroundMusic for FakeMusic {
        async fn play(&self, url: &str) {
            self.rec.push(format!("music:play:{}", url));
        }

        fn stop(&self) {
            self.rec.push("music:stop");
        }

        fn fade_out(&self, delay_seconds: f64, fade_seconds: f64) {
            self.rec
                .push(format!("music:fade:{}:{}", delay_seconds, fade_seconds));
        }
    }

    struct Harness {
        rec: Rc<Recorder>,
        api: Rc<FakeApi>,
        streams: Rc<FakeStreams>,
        state: Rc<RefCell<SubmissionState>>,
        session: Rc<RefCell<JockeySession>>,
        flow: SubmissionFlow,
    }

    fn harness() -> Harness {
        let rec = Rc::new(Recorder::default());
        let api = Rc::new(FakeApi {
            rec: rec.clone(),
            inits: RefCell::new(VecDeque::new()),
            processes: RefCell::new(VecDeque::new()),
            hooks: RefCell::new(VecDeque::new()),
        });
        let streams = Rc::new(FakeStreams {
            rec: rec.clone(),
            ..Default::default()
        });
        let state = Rc::new(RefCell::new(SubmissionState::default()));
        let session = Rc::new(RefCell::new(JockeySession::new()));
        let flow = SubmissionFlow::new(FlowDeps {
            api: api.clone(),
            streams: streams.clone(),
            music: Rc::new(FakeMusic { rec: rec.clone() }),
            state: state.clone(),
            session: session.clone(),
            pick_track: Box::new(|_| 1),
        });
        Harness {
            rec,
            api,
            streams,
            state,
            session,
            flow,
        }
    }

    impl Harness {
        fn script_init(&self, result: Result<&str, ApiError>) {
            self.api.inits.borrow_mut().push_back(result.map(|id| InitThreadResponse {
                thread_id: id.to_string(),
            }));
        }

        fn script_process(&self, result: Result<&str, ApiError>) {
            self.api
                .processes
                .borrow_mut()
                .push_back(result.map(|op| ProcessResponse {
                    operation_id: op.to_string(),
                    status: "processing".into(),
                    ..Default::default()
                }));
        }

        fn hook(&self, hook: impl FnOnce() -> LocalBoxFuture<'static, ()> + 'static) {
            self.api.hooks.borrow_mut().push_back(Box::new(hook));
        }

        fn texts(&self) -> Vec<String> {
            self.state
                .borrow()
                .messages
                .iter()
                .map(|m| m.text.clone())
                .collect()
        }
    }

    fn event(text: &str) -> StreamSignal {
        StreamSignal::Message(serde_json::json!({"text": text, "type": "system"}).to_string())
    }

    #[test]
    fn test_submission_runs_init_then_process_with_same_thread() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.script_process(Ok("op-1"));

        block_on(h.flow.submit("  puppies on a beach \n", " idx-1 "));

        assert_eq!(
            h.rec.entries(),
            vec![
                "music:stop",
                "music:play:/assets/audio/bg2.mp3",
                "init",
                "stream:open:t-1",
                "process:t-1:puppies on a beach:idx-1",
                "stream:close:t-1",
                "music:fade:1:3",
            ]
        );
        let state = h.state.borrow();
        assert!(!state.processing);
        assert_eq!(state.error, None);
        assert_eq!(state.thread_id.as_deref(), Some("t-1"));
        assert_eq!(state.index_id, "idx-1");

        let session = h.session.borrow();
        assert_eq!(session.thread_id.as_deref(), Some("t-1"));
        assert_eq!(session.status, JockeyStatus::Idle);
        assert_eq!(
            session.get_metadata("operation_id"),
            Some(&Value::from("op-1"))
        );
        assert_eq!(session.get_metadata("index_id"), Some(&Value::from("idx-1")));
    }

    #[test]
    fn test_blank_input_makes_no_calls() {
        let h = harness();

        block_on(h.flow.submit("   ", "idx-1"));
        assert!(h.rec.entries().is_empty());
        assert_eq!(h.state.borrow().error, None);

        block_on(h.flow.submit("make a video", "  "));
        assert!(h.rec.entries().is_empty());
        assert_eq!(
            h.state.borrow().error.as_deref(),
            Some("Index ID is required")
        );
        assert!(!h.state.borrow().processing);
    }

    #[test]
    fn test_stream_messages_are_appended_in_order() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.script_process(Ok("op-1"));
        let streams = h.streams.clone();
        h.hook(move || {
            async move {
                streams.emit(event("Planning the edit"));
                streams.emit(StreamSignal::Message(r#"{"type":"system"}"#.into()));
                streams.emit(event("Searching clips"));
                streams.emit(StreamSignal::Message("not json".into()));
                streams.emit(event(""));
                streams.emit(event("Combining clips"));
            }
            .boxed_local()
        });

        block_on(h.flow.submit("make a video", "idx-1"));

        assert_eq!(
            h.texts(),
            vec!["Planning the edit", "Searching clips", "Combining clips"]
        );
        assert_eq!(h.state.borrow().error, None);
    }

    #[test]
    fn test_init_failure_aborts_without_stream() {
        let h = harness();
        h.script_init(Err(ApiError::Status {
            status: 500,
            detail: None,
        }));

        block_on(h.flow.submit("make a video", "idx-1"));

        assert_eq!(
            h.rec.entries(),
            vec![
                "music:stop",
                "music:play:/assets/audio/bg2.mp3",
                "init",
                "music:fade:1:3",
            ]
        );
        assert_eq!(h.state.borrow().error.as_deref(), Some(FAILED_TO_PROCESS));
        assert!(!h.state.borrow().processing);
        assert_eq!(h.session.borrow().status, JockeyStatus::Error);
    }

    #[test]
    fn test_process_failure_closes_stream() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.script_process(Err(ApiError::Status {
            status: 422,
            detail: Some("index not found".into()),
        }));

        block_on(h.flow.submit("make a video", "idx-1"));

        assert_eq!(h.rec.count("stream:close:t-1"), 1);
        assert_eq!(h.streams.open_now.get(), 0);
        assert_eq!(h.state.borrow().error.as_deref(), Some(FAILED_TO_PROCESS));
        assert!(!h.state.borrow().processing);
    }

    #[test]
    fn test_stream_open_failure_skips_process() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.streams.refuse.set(true);

        block_on(h.flow.submit("make a video", "idx-1"));

        assert_eq!(h.rec.count("process"), 0);
        assert_eq!(h.state.borrow().error.as_deref(), Some(FAILED_TO_PROCESS));
        assert!(!h.state.borrow().processing);
    }

    #[test]
    fn test_stream_error_tears_down_once() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.script_process(Ok("op-1"));
        let streams = h.streams.clone();
        h.hook(move || {
            async move {
                streams.emit(event("Planning the edit"));
                streams.emit(StreamSignal::Error);
            }
            .boxed_local()
        });

        block_on(h.flow.submit("make a video", "idx-1"));

        assert_eq!(h.state.borrow().error.as_deref(), Some(CONNECTION_ERROR));
        assert!(!h.state.borrow().processing);
        assert_eq!(h.texts(), vec!["Planning the edit"]);
        assert_eq!(h.rec.count("stream:close:t-1"), 1);
        assert_eq!(h.rec.count("music:fade"), 1);
        assert_eq!(h.session.borrow().status, JockeyStatus::Error);
    }

    #[test]
    fn test_new_submission_supersedes_stale_one() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.script_init(Ok("t-2"));
        // The second submission finishes first, then the first one fails late
        h.script_process(Ok("op-2"));
        h.script_process(Err(ApiError::Status {
            status: 500,
            detail: None,
        }));

        let flow = h.flow.clone();
        let streams = h.streams.clone();
        h.hook(move || {
            async move {
                streams.emit(StreamSignal::Error);
                flow.submit("second video", "idx-1").await;
                streams.emit_on(0, event("late message from first"));
            }
            .boxed_local()
        });
        let streams = h.streams.clone();
        h.hook(move || {
            async move {
                streams.emit(event("from second"));
            }
            .boxed_local()
        });

        block_on(h.flow.submit("first video", "idx-1"));

        assert_eq!(h.streams.max_open.get(), 1);
        assert_eq!(h.streams.open_now.get(), 0);
        let state = h.state.borrow();
        assert_eq!(state.error, None);
        assert!(!state.processing);
        assert_eq!(state.thread_id.as_deref(), Some("t-2"));
        assert_eq!(h.texts(), vec!["from second"]);
        assert_eq!(h.session.borrow().thread_id.as_deref(), Some("t-2"));
        assert_eq!(h.rec.count("stream:close:t-1"), 1);
        assert_eq!(h.rec.count("stream:close:t-2"), 1);
        assert_eq!(h.rec.count("music:fade"), 2);
    }

    #[test]
    fn test_shutdown_closes_stream_and_ignores_late_response() {
        let h = harness();
        h.script_init(Ok("t-1"));
        h.script_process(Ok("op-1"));
        let flow = h.flow.clone();
        h.hook(move || {
            async move {
                flow.shutdown();
            }
            .boxed_local()
        });

        block_on(h.flow.submit("make a video", "idx-1"));

        assert_eq!(h.rec.count("stream:close:t-1"), 1);
        assert_eq!(h.rec.count("music:fade"), 0);
        assert_eq!(h.session.borrow().get_metadata("operation_id"), None);
    }

    #[test]
    fn test_state_ignores_stale_epoch() {
        let mut state = SubmissionState::default();
        let first = state.begin("one", "idx").unwrap();
        assert!(state.finish(first));
        let second = state.begin("two", "idx").unwrap();
        assert_ne!(first, second);

        let raw = r#"{"text":"stale","type":"ai"}"#;
        assert!(!state.push_event(first, raw));
        assert!(!state.fail(first, "stale error"));
        assert!(!state.set_thread(first, "t-old"));
        assert!(!state.finish(first));

        assert!(state.messages.is_empty());
        assert_eq!(state.error, None);
        assert!(state.processing);
        assert!(state.push_event(second, raw));
    }

    #[test]
    fn test_begin_resets_previous_submission() {
        let mut state = SubmissionState::default();
        let epoch = state.begin("one", "idx").unwrap();
        state.push_event(epoch, r#"{"text":"hello","type":"ai"}"#);
        state.fail(epoch, "boom");
        state.finish(epoch);

        assert!(state.begin("two", " idx-2 ").is_some());
        assert!(state.messages.is_empty());
        assert!(state.tool_calls.is_empty());
        assert_eq!(state.error, None);
        assert_eq!(state.index_id, "idx-2");
    }

    #[test]
    fn test_begin_ignored_while_processing() {
        let mut state = SubmissionState::default();
        assert!(state.begin("one", "idx").is_some());
        assert_eq!(state.begin("two", "idx"), None);
    }
}
