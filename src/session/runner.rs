//! Session runner — drives the record → transcribe → correct → reply → speak loop.
//!
//! [`SessionRunner`] owns the [`SharedSession`] and responds to
//! [`SessionCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Turn flow
//!
//! ```text
//! SessionCommand::StartRecording
//!   └─▶ clear audio buffer, set phase = Recording
//!
//! SessionCommand::FinishRecording
//!   └─▶ drain buffer → stt.transcribe(audio)            [Transcribing]
//!         └─▶ transcript.push_user(raw text)
//!             grammar.correct(raw)                      [Correcting]
//!               └─▶ conversation.reply(corrected, mem)  [Thinking]
//!                     └─▶ transcript.push_assistant, adopt new memory
//!                         tts.synthesize(reply)         [Speaking]
//!                           ├─ Ok  → reply_audio set    [Idle]
//!                           └─ Err → warn, text only    [Idle]
//!
//! SessionCommand::SubmitText(text)
//!   └─▶ same flow, starting at the grammar step
//!
//! SessionCommand::SuggestTopic
//!   └─▶ topics.suggest() → suggested_topic              [Suggesting → Idle]
//! ```
//!
//! One turn runs to completion before the next command is taken.  Failures
//! surface in `error_message` and the phase returns to `Idle`; the coach
//! never replies to a sentence that failed its grammar check.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::audio::RingBuffer;
use crate::llm::{ConversationModel, GrammarCorrector, TopicSuggester};
use crate::stt::Transcriber;
use crate::tts::SpeechSynthesizer;

use super::state::{SharedSession, TurnPhase};

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// UI-originated commands the runner reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Arm the microphone and start accumulating audio.
    StartRecording,

    /// Discard the current recording without transcribing it.
    CancelRecording,

    /// Stop recording and run the captured audio through a full turn.
    FinishRecording,

    /// Run a typed sentence through a turn, skipping capture and
    /// transcription.  Blank text is ignored.
    SubmitText(String),

    /// Fetch a practice topic without touching the conversation.
    SuggestTopic,
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors that can surface inside a turn.
///
/// All variants carry a human-readable description so the UI can display
/// them without knowing the internal cause.
#[derive(Debug)]
pub enum SessionError {
    /// Audio buffer was empty when the recording was stopped.
    EmptyAudio,
    /// The recording was shorter than `audio.min_recording_secs`.
    RecordingTooShort,
    /// Transcription failed or returned an error.
    Transcription(String),
    /// The grammar check failed.
    Grammar(String),
    /// The conversation model failed to reply.
    Conversation(String),
    /// The topic suggestion failed.
    Topic(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::EmptyAudio => {
                write!(f, "No audio was captured. Try holding the record button longer.")
            }
            SessionError::RecordingTooShort => {
                write!(f, "The recording was too short. Hold the button and speak a full sentence.")
            }
            SessionError::Transcription(msg) => write!(f, "Transcription failed: {msg}"),
            SessionError::Grammar(msg) => write!(f, "Grammar check failed: {msg}"),
            SessionError::Conversation(msg) => write!(f, "The coach could not reply: {msg}"),
            SessionError::Topic(msg) => write!(f, "Topic suggestion failed: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SharedAudioBuffer
// ---------------------------------------------------------------------------

/// Thread-safe audio ring buffer shared between the capture thread and the
/// session runner.
///
/// The runner drains it on `FinishRecording`; the capture thread pushes
/// resampled chunks while the phase is `Recording`.
pub type SharedAudioBuffer = Arc<Mutex<RingBuffer<f32>>>;

// ---------------------------------------------------------------------------
// SessionRunner
// ---------------------------------------------------------------------------

/// Drives the complete conversation loop.
///
/// Create with [`SessionRunner::new`], then call [`run`](Self::run) inside a
/// tokio task.
///
/// ```rust,no_run
/// use std::sync::{Arc, Mutex};
/// use speak_coach::audio::RingBuffer;
/// use speak_coach::config::AppConfig;
/// use speak_coach::session::{new_shared_session, SessionRunner};
///
/// // (the clients are Arc<dyn …> created elsewhere)
/// # async fn example() {
/// # use speak_coach::stt::Transcriber;
/// # use speak_coach::llm::{ConversationModel, GrammarCorrector, TopicSuggester};
/// # use speak_coach::tts::SpeechSynthesizer;
/// # fn make_stt() -> Arc<dyn Transcriber> { unimplemented!() }
/// # fn make_grammar() -> Arc<dyn GrammarCorrector> { unimplemented!() }
/// # fn make_conversation() -> Arc<dyn ConversationModel> { unimplemented!() }
/// # fn make_tts() -> Arc<dyn SpeechSynthesizer> { unimplemented!() }
/// # fn make_topics() -> Arc<dyn TopicSuggester> { unimplemented!() }
/// let config = AppConfig::default();
/// let session = new_shared_session(config);
/// let audio_buf = Arc::new(Mutex::new(RingBuffer::new(16_000 * 60)));
///
/// let (command_tx, command_rx) = tokio::sync::mpsc::channel(16);
/// let runner = SessionRunner::new(
///     session,
///     audio_buf,
///     make_stt(),
///     make_grammar(),
///     make_conversation(),
///     make_tts(),
///     make_topics(),
/// );
/// runner.run(command_rx).await;
/// # }
/// ```
pub struct SessionRunner {
    state: SharedSession,
    audio_buf: SharedAudioBuffer,
    stt: Arc<dyn Transcriber>,
    grammar: Arc<dyn GrammarCorrector>,
    conversation: Arc<dyn ConversationModel>,
    tts: Arc<dyn SpeechSynthesizer>,
    topics: Arc<dyn TopicSuggester>,
}

impl SessionRunner {
    /// Create a new runner.
    ///
    /// # Arguments
    ///
    /// * `state`        — shared session state (also read by the UI).
    /// * `audio_buf`    — ring buffer filled by the capture thread.
    /// * `stt`          — transcription client.
    /// * `grammar`      — grammar correction client.
    /// * `conversation` — conversation client with explicit memory.
    /// * `tts`          — speech synthesis client.
    /// * `topics`       — topic suggestion client.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: SharedSession,
        audio_buf: SharedAudioBuffer,
        stt: Arc<dyn Transcriber>,
        grammar: Arc<dyn GrammarCorrector>,
        conversation: Arc<dyn ConversationModel>,
        tts: Arc<dyn SpeechSynthesizer>,
        topics: Arc<dyn TopicSuggester>,
    ) -> Self {
        Self {
            state,
            audio_buf,
            stt,
            grammar,
            conversation,
            tts,
            topics,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the session until `command_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from
    /// `main()`.  It never returns while the channel is open.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<SessionCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                SessionCommand::StartRecording => self.handle_start_recording(),
                SessionCommand::CancelRecording => self.handle_cancel_recording(),
                SessionCommand::FinishRecording => self.handle_finish_recording().await,
                SessionCommand::SubmitText(text) => self.handle_submit_text(text).await,
                SessionCommand::SuggestTopic => self.handle_suggest_topic().await,
            }
        }

        log::info!("session: command channel closed, runner shutting down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    /// Arm the microphone: clear the audio buffer and enter Recording.
    fn handle_start_recording(&mut self) {
        log::debug!("session: StartRecording → Recording");

        // Drop any leftover audio from a previous turn.
        if let Ok(mut buf) = self.audio_buf.lock() {
            buf.clear();
        }

        let mut st = self.state.lock().unwrap();
        st.phase = TurnPhase::Recording;
        st.recording_secs = 0.0;
        st.error_message = None;
        st.suggested_topic = None;
    }

    /// Throw away the current recording and return to Idle.
    fn handle_cancel_recording(&mut self) {
        log::debug!("session: CancelRecording → Idle");

        if let Ok(mut buf) = self.audio_buf.lock() {
            buf.clear();
        }

        let mut st = self.state.lock().unwrap();
        st.phase = TurnPhase::Idle;
        st.recording_secs = 0.0;
    }

    /// Stop recording: drain audio → transcribe → run the turn.
    async fn handle_finish_recording(&mut self) {
        log::debug!("session: FinishRecording → draining audio");

        // ── 1. Drain audio buffer ────────────────────────────────────────
        let audio: Vec<f32> = match self.audio_buf.lock() {
            Ok(mut buf) => buf.drain(),
            Err(e) => {
                self.set_error(format!("audio buffer lock poisoned: {e}"));
                return;
            }
        };

        if audio.is_empty() {
            log::warn!("session: audio buffer was empty when recording stopped");
            self.set_error(SessionError::EmptyAudio.to_string());
            return;
        }

        let (recording_secs, min_samples) = {
            let mut st = self.state.lock().unwrap();
            let rate = st.config.audio.sample_rate as f32;
            let secs = audio.len() as f32 / rate;
            st.recording_secs = secs;
            (secs, (rate * st.config.audio.min_recording_secs) as usize)
        };

        if audio.len() < min_samples {
            log::warn!("session: recording of {recording_secs:.2}s is below the minimum");
            self.set_error(SessionError::RecordingTooShort.to_string());
            return;
        }

        // ── 2. Transcription ─────────────────────────────────────────────
        self.set_phase(TurnPhase::Transcribing);

        let raw = match self.stt.transcribe(&audio).await {
            Ok(text) => text,
            Err(e) => {
                // Nothing was understood, so the transcript stays untouched.
                self.set_error(SessionError::Transcription(e.to_string()).to_string());
                return;
            }
        };

        log::debug!("session: transcription = {raw:?}");
        self.run_turn(raw).await;
    }

    /// Run a typed sentence through a turn.  Blank input is ignored.
    async fn handle_submit_text(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            log::debug!("session: ignoring blank text submission");
            return;
        }

        self.run_turn(text).await;
    }

    /// Fetch a practice topic.  The transcript and memory are not touched.
    async fn handle_suggest_topic(&mut self) {
        self.set_phase(TurnPhase::Suggesting);

        match self.topics.suggest().await {
            Ok(topic) => {
                log::debug!("session: suggested topic = {topic:?}");
                let mut st = self.state.lock().unwrap();
                st.suggested_topic = Some(topic);
                st.error_message = None;
                st.phase = TurnPhase::Idle;
            }
            Err(e) => {
                self.set_error(SessionError::Topic(e.to_string()).to_string());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Turn pipeline
    // -----------------------------------------------------------------------

    /// Drive one full turn starting from the learner's raw sentence.
    ///
    /// The raw sentence goes into the transcript; the *corrected* sentence
    /// goes to the conversation model.  The memory snapshot is taken before
    /// the model call and only replaced by the returned memory on success.
    async fn run_turn(&mut self, raw: String) {
        // ── 1. Record the learner's turn ─────────────────────────────────
        {
            let mut st = self.state.lock().unwrap();
            st.transcript.push_user(raw.clone());
            st.last_correction = None;
            st.suggested_topic = None;
            st.error_message = None;
            st.phase = TurnPhase::Correcting;
        }

        // ── 2. Grammar check ─────────────────────────────────────────────
        let corrected = match self.grammar.correct(&raw).await {
            Ok(text) => text,
            Err(e) => {
                // Partial turn: the learner's sentence stays, no reply.
                self.set_error(SessionError::Grammar(e.to_string()).to_string());
                return;
            }
        };

        log::debug!("session: corrected = {corrected:?}");

        {
            let mut st = self.state.lock().unwrap();
            st.last_correction = Some(corrected.clone());
            st.phase = TurnPhase::Thinking;
        }

        // ── 3. Coach reply ───────────────────────────────────────────────
        let memory = {
            let st = self.state.lock().unwrap();
            st.memory.clone()
        };

        let (reply, new_memory) = match self.conversation.reply(&corrected, &memory).await {
            Ok(pair) => pair,
            Err(e) => {
                // The snapshot stays in place; memory is only replaced on
                // success.
                self.set_error(SessionError::Conversation(e.to_string()).to_string());
                return;
            }
        };

        log::debug!("session: reply = {reply:?}");

        {
            let mut st = self.state.lock().unwrap();
            st.transcript.push_assistant(reply.clone());
            st.memory = new_memory;
            st.phase = TurnPhase::Speaking;
        }

        // ── 4. Speech synthesis (best effort) ────────────────────────────
        match self.tts.synthesize(&reply).await {
            Ok(artifact) => {
                log::debug!("session: reply audio at {}", artifact.path.display());
                let mut st = self.state.lock().unwrap();
                st.set_reply_audio(artifact);
            }
            Err(e) => {
                // The reply is already in the transcript; audio is optional.
                log::warn!("session: speech synthesis failed ({e}), reply stays text only");
            }
        }

        self.set_phase(TurnPhase::Idle);
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_phase(&self, phase: TurnPhase) {
        let mut st = self.state.lock().unwrap();
        st.phase = phase;
    }

    fn set_error(&self, message: String) {
        let mut st = self.state.lock().unwrap();
        st.phase = TurnPhase::Idle;
        st.error_message = Some(message.clone());
        log::error!("session error: {message}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::llm::{LlmError, MockConversationModel, MockCorrector, MockTopicSuggester};
    use crate::session::state::new_shared_session;
    use crate::session::transcript::Role;
    use crate::stt::{MockTranscriber, SttError};
    use crate::tts::{MockSynthesizer, TtsError};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// The five clients a runner needs, all succeeding by default.
    /// Tests override individual fields to exercise failure paths.
    struct Clients {
        stt: Arc<dyn Transcriber>,
        grammar: Arc<dyn GrammarCorrector>,
        conversation: Arc<dyn ConversationModel>,
        tts: Arc<dyn SpeechSynthesizer>,
        topics: Arc<dyn TopicSuggester>,
    }

    impl Default for Clients {
        fn default() -> Self {
            Self {
                stt: Arc::new(MockTranscriber::ok("i has a apple")),
                grammar: Arc::new(MockCorrector::ok("I have an apple.")),
                conversation: Arc::new(MockConversationModel::ok("Nice! Tell me more.")),
                tts: Arc::new(MockSynthesizer::ok(vec![1, 2, 3])),
                topics: Arc::new(MockTopicSuggester::ok("What did you eat today?")),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// 1 second of silence at 16 kHz — passes the minimum-length check.
    fn one_second_of_silence() -> Vec<f32> {
        vec![0.0f32; 16_000]
    }

    /// Pre-fill the shared buffer.  The capture thread is not running in
    /// tests, so turn tests drive `FinishRecording` directly against the
    /// pre-filled audio instead of arming the microphone first.
    fn make_audio_buf(samples: &[f32]) -> SharedAudioBuffer {
        let buf = Arc::new(Mutex::new(RingBuffer::new(16_000 * 60)));
        buf.lock().unwrap().push_slice(samples);
        buf
    }

    fn make_runner(clients: Clients, samples: &[f32]) -> (SessionRunner, SharedSession) {
        let session = new_shared_session(AppConfig::default());
        let audio_buf = make_audio_buf(samples);

        let runner = SessionRunner::new(
            Arc::clone(&session),
            audio_buf,
            clients.stt,
            clients.grammar,
            clients.conversation,
            clients.tts,
            clients.topics,
        );
        (runner, session)
    }

    async fn drive(runner: SessionRunner, commands: Vec<SessionCommand>) {
        let (tx, rx) = mpsc::channel(8);
        for command in commands {
            tx.send(command).await.unwrap();
        }
        drop(tx); // close channel so run() returns
        runner.run(rx).await;
    }

    // -----------------------------------------------------------------------
    // Recording commands
    // -----------------------------------------------------------------------

    /// `StartRecording` should move the session into `Recording`.
    #[tokio::test]
    async fn start_recording_enters_recording_phase() {
        let (runner, session) = make_runner(Clients::default(), &one_second_of_silence());

        drive(runner, vec![SessionCommand::StartRecording]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Recording);
        assert!(st.error_message.is_none());
    }

    /// `CancelRecording` must discard audio and return to Idle with no error.
    #[tokio::test]
    async fn cancel_recording_discards_audio() {
        let session = new_shared_session(AppConfig::default());
        let audio_buf = make_audio_buf(&one_second_of_silence());
        let clients = Clients::default();

        let runner = SessionRunner::new(
            Arc::clone(&session),
            Arc::clone(&audio_buf),
            clients.stt,
            clients.grammar,
            clients.conversation,
            clients.tts,
            clients.topics,
        );

        drive(
            runner,
            vec![
                SessionCommand::StartRecording,
                SessionCommand::CancelRecording,
            ],
        )
        .await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert!(st.error_message.is_none());
        assert_eq!(st.transcript.len(), 1); // greeting only
        assert_eq!(audio_buf.lock().unwrap().len(), 0);
    }

    /// Stopping with an empty buffer reports an error and leaves the
    /// transcript untouched.
    #[tokio::test]
    async fn empty_buffer_on_finish_reports_error() {
        let (runner, session) = make_runner(Clients::default(), &[]);

        drive(runner, vec![SessionCommand::FinishRecording]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert!(st.error_message.is_some());
        assert_eq!(st.transcript.len(), 1);
    }

    /// A recording under `min_recording_secs` is rejected before any
    /// transcription attempt.
    #[tokio::test]
    async fn too_short_recording_is_rejected() {
        // 0.1 s of audio against the default 0.5 s minimum.
        let (runner, session) = make_runner(Clients::default(), &vec![0.0f32; 1_600]);

        drive(runner, vec![SessionCommand::FinishRecording]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert!(st.error_message.is_some());
        assert_eq!(st.transcript.len(), 1);
        assert!(st.memory.is_empty());
    }

    // -----------------------------------------------------------------------
    // Full voice turn
    // -----------------------------------------------------------------------

    /// A full voice turn shows the raw sentence, the correction, the reply
    /// and the reply audio.
    #[tokio::test]
    async fn voice_turn_appends_raw_text_and_reply() {
        let (runner, session) = make_runner(Clients::default(), &one_second_of_silence());

        drive(runner, vec![SessionCommand::FinishRecording]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert!(st.error_message.is_none());

        let messages = st.transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "i has a apple"); // raw, not corrected
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "Nice! Tell me more.");

        assert_eq!(st.last_correction.as_deref(), Some("I have an apple."));
        assert!(st.reply_audio.is_some());
        assert_eq!(st.reply_audio_seq, 1);
        assert!((st.recording_secs - 1.0).abs() < 1e-6);
    }

    /// The conversation model must receive the *corrected* sentence, which
    /// is what lands in memory.
    #[tokio::test]
    async fn reply_is_generated_from_corrected_text() {
        let (runner, session) = make_runner(Clients::default(), &one_second_of_silence());

        drive(runner, vec![SessionCommand::FinishRecording]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.memory.len(), 1);

        let exchange = st.memory.exchanges().next().unwrap();
        assert_eq!(exchange.user, "I have an apple.");
        assert_eq!(exchange.assistant, "Nice! Tell me more.");
    }

    // -----------------------------------------------------------------------
    // Failure paths
    // -----------------------------------------------------------------------

    /// A failed transcription must not put anything into the transcript.
    #[tokio::test]
    async fn transcription_failure_leaves_transcript_untouched() {
        let clients = Clients {
            stt: Arc::new(MockTranscriber::err(SttError::Timeout)),
            ..Clients::default()
        };
        let (runner, session) = make_runner(clients, &one_second_of_silence());

        drive(runner, vec![SessionCommand::FinishRecording]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert_eq!(st.transcript.len(), 1);
        assert!(st.error_message.is_some());
        assert!(st.memory.is_empty());
    }

    /// A failed grammar check keeps the learner's sentence but produces no
    /// reply and records nothing in memory.
    #[tokio::test]
    async fn grammar_failure_keeps_user_turn_without_reply() {
        let clients = Clients {
            grammar: Arc::new(MockCorrector::err(LlmError::Timeout)),
            ..Clients::default()
        };
        let (runner, session) = make_runner(clients, &[]);

        drive(
            runner,
            vec![SessionCommand::SubmitText("i has a apple".into())],
        )
        .await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert_eq!(st.transcript.len(), 2); // greeting + user turn
        assert_eq!(st.transcript.last().map(|m| m.role), Some(Role::User));
        assert!(st.last_correction.is_none());
        assert!(st.error_message.is_some());
        assert!(st.memory.is_empty());
    }

    /// A failed reply leaves memory exactly as it was before the turn.
    #[tokio::test]
    async fn conversation_failure_preserves_memory() {
        let clients = Clients {
            conversation: Arc::new(MockConversationModel::err(LlmError::Timeout)),
            ..Clients::default()
        };
        let (runner, session) = make_runner(clients, &[]);

        drive(
            runner,
            vec![SessionCommand::SubmitText("i has a apple".into())],
        )
        .await;

        let st = session.lock().unwrap();
        assert_eq!(st.transcript.len(), 2); // no assistant reply
        assert_eq!(st.last_correction.as_deref(), Some("I have an apple."));
        assert!(st.memory.is_empty());
        assert!(st.error_message.is_some());
    }

    /// Synthesis failure is not an error: the reply stays as text and the
    /// turn completes.
    #[tokio::test]
    async fn synthesis_failure_degrades_to_text_only() {
        let clients = Clients {
            tts: Arc::new(MockSynthesizer::err(TtsError::Timeout)),
            ..Clients::default()
        };
        let (runner, session) = make_runner(clients, &[]);

        drive(
            runner,
            vec![SessionCommand::SubmitText("i has a apple".into())],
        )
        .await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert_eq!(st.transcript.len(), 3); // full turn in transcript
        assert!(st.reply_audio.is_none());
        assert_eq!(st.reply_audio_seq, 0);
        assert!(st.error_message.is_none()); // degrade, not fail
    }

    // -----------------------------------------------------------------------
    // Topic suggestion
    // -----------------------------------------------------------------------

    /// A topic suggestion must not touch the transcript or memory.
    #[tokio::test]
    async fn topic_suggestion_leaves_conversation_alone() {
        let (runner, session) = make_runner(Clients::default(), &[]);

        drive(runner, vec![SessionCommand::SuggestTopic]).await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert_eq!(
            st.suggested_topic.as_deref(),
            Some("What did you eat today?")
        );
        assert_eq!(st.transcript.len(), 1);
        assert!(st.memory.is_empty());
    }

    #[tokio::test]
    async fn topic_failure_sets_error() {
        let clients = Clients {
            topics: Arc::new(MockTopicSuggester::err(LlmError::Timeout)),
            ..Clients::default()
        };
        let (runner, session) = make_runner(clients, &[]);

        drive(runner, vec![SessionCommand::SuggestTopic]).await;

        let st = session.lock().unwrap();
        assert!(st.suggested_topic.is_none());
        assert!(st.error_message.is_some());
    }

    // -----------------------------------------------------------------------
    // Text turns
    // -----------------------------------------------------------------------

    /// Blank text submissions are ignored entirely.
    #[tokio::test]
    async fn blank_text_submission_is_ignored() {
        let (runner, session) = make_runner(Clients::default(), &[]);

        drive(
            runner,
            vec![SessionCommand::SubmitText("   \n\t ".into())],
        )
        .await;

        let st = session.lock().unwrap();
        assert_eq!(st.phase, TurnPhase::Idle);
        assert_eq!(st.transcript.len(), 1);
        assert!(st.error_message.is_none());
    }

    /// Memory grows by one exchange per completed turn.
    #[tokio::test]
    async fn memory_accumulates_across_turns() {
        let (runner, session) = make_runner(Clients::default(), &[]);

        drive(
            runner,
            vec![
                SessionCommand::SubmitText("i like football".into()),
                SessionCommand::SubmitText("i play on weekends".into()),
            ],
        )
        .await;

        let st = session.lock().unwrap();
        assert_eq!(st.memory.len(), 2);
        assert_eq!(st.transcript.len(), 5); // greeting + 2 × (user, coach)
    }

    /// A new turn clears the previous topic banner and error message.
    #[tokio::test]
    async fn new_turn_clears_previous_topic_and_error() {
        let clients = Clients {
            topics: Arc::new(MockTopicSuggester::err(LlmError::Timeout)),
            ..Clients::default()
        };
        let (runner, session) = make_runner(clients, &[]);

        drive(
            runner,
            vec![
                SessionCommand::SuggestTopic, // fails, sets error
                SessionCommand::SubmitText("i has a apple".into()),
            ],
        )
        .await;

        let st = session.lock().unwrap();
        assert!(st.error_message.is_none());
        assert!(st.suggested_topic.is_none());
        assert_eq!(st.transcript.len(), 3);
    }
}
