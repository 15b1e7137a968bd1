//! Turn state machine and shared session state.
//!
//! [`TurnPhase`] tracks where the current turn is in the
//! record → transcribe → correct → reply → speak flow.  The UI reads it via
//! [`SharedSession`] to label the status bar and gate the controls.
//!
//! [`SessionState`] is the single source of truth for everything the UI
//! needs: current phase, transcript, conversation memory, the latest
//! grammar correction, reply audio, suggested topic, config snapshot, and
//! any error message.
//!
//! [`SharedSession`] is a type alias for `Arc<Mutex<SessionState>>` — cheap
//! to clone and safe to share across threads.

use std::sync::{Arc, Mutex};

use crate::config::AppConfig;
use crate::llm::ConversationMemory;
use crate::tts::AudioArtifact;

use super::transcript::Transcript;

// ---------------------------------------------------------------------------
// TurnPhase
// ---------------------------------------------------------------------------

/// Phases of a single conversation turn.
///
/// The phase transitions are:
///
/// ```text
/// Idle ──record pressed──▶ Recording
///      ──stop pressed────▶ Transcribing ──▶ Correcting ──▶ Thinking ──▶ Speaking ──▶ Idle
/// Idle ──text submitted──▶ Correcting ──▶ Thinking ──▶ Speaking ──▶ Idle
/// Idle ──topic pressed───▶ Suggesting ──▶ Idle
/// any phase ──error──▶ Idle  (error_message set)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TurnPhase {
    /// Waiting for the learner to speak, type, or ask for a topic.
    Idle,

    /// Microphone is active; audio is accumulating in the ring buffer.
    Recording,

    /// Captured audio is at the transcription endpoint.
    Transcribing,

    /// The grammar check is running on the learner's sentence.
    Correcting,

    /// The conversation model is composing the coach's reply.
    Thinking,

    /// The reply is being synthesized to speech.
    Speaking,

    /// A practice topic is being fetched.
    Suggesting,
}

impl TurnPhase {
    /// Returns `true` while a turn (or topic fetch) is in flight.
    ///
    /// The UI uses this to disable the send and topic controls while busy.
    ///
    /// ```
    /// use speak_coach::session::TurnPhase;
    ///
    /// assert!(!TurnPhase::Idle.is_busy());
    /// assert!(TurnPhase::Recording.is_busy());
    /// assert!(TurnPhase::Transcribing.is_busy());
    /// assert!(TurnPhase::Thinking.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(self, TurnPhase::Idle)
    }

    /// A short human-readable label suitable for the UI status bar.
    pub fn label(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "Ready",
            TurnPhase::Recording => "Listening",
            TurnPhase::Transcribing => "Transcribing",
            TurnPhase::Correcting => "Checking grammar",
            TurnPhase::Thinking => "Thinking",
            TurnPhase::Speaking => "Preparing speech",
            TurnPhase::Suggesting => "Finding a topic",
        }
    }
}

impl Default for TurnPhase {
    fn default() -> Self {
        TurnPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Shared session state — the single source of truth for the UI.
///
/// Held behind [`SharedSession`] (`Arc<Mutex<SessionState>>`).  The session
/// runner mutates it; the egui update loop reads it each frame.
pub struct SessionState {
    /// Current phase of the conversation turn.
    pub phase: TurnPhase,

    /// Full display history, greeting included.  Never pruned.
    pub transcript: Transcript,

    /// Model-facing conversation memory, pruned to its token budget.
    pub memory: ConversationMemory,

    /// Corrected form of the learner's most recent sentence.
    ///
    /// `None` until the first grammar check completes.  Shown under the
    /// latest user message when `config.ui.show_corrections` is on.
    pub last_correction: Option<String>,

    /// Synthesized audio for the coach's most recent reply.
    ///
    /// `None` before the first reply, and left at its previous value when
    /// synthesis fails (the reply is still delivered as text).
    pub reply_audio: Option<AudioArtifact>,

    /// Bumped every time `reply_audio` is replaced, so the UI can tell a
    /// fresh reply from one it already auto-played.
    pub reply_audio_seq: u64,

    /// Practice topic from the most recent suggestion request.
    ///
    /// Cleared at the start of the next turn.
    pub suggested_topic: Option<String>,

    /// Current application configuration.
    pub config: AppConfig,

    /// Error message to display; `None` when the last operation succeeded.
    pub error_message: Option<String>,

    /// Duration of the current recording in seconds.
    ///
    /// Reset to `0.0` when a new recording starts; updated in real time by
    /// the audio accumulation loop.
    pub recording_secs: f32,
}

impl SessionState {
    /// Create a new `SessionState` with a greeted transcript and an empty
    /// memory sized from `config.memory.token_budget`.
    pub fn new(config: AppConfig) -> Self {
        let memory = ConversationMemory::new(config.memory.token_budget);
        Self {
            phase: TurnPhase::Idle,
            transcript: Transcript::new(),
            memory,
            last_correction: None,
            reply_audio: None,
            reply_audio_seq: 0,
            suggested_topic: None,
            config,
            error_message: None,
            recording_secs: 0.0,
        }
    }

    /// Install a fresh reply artifact and bump the sequence counter.
    pub fn set_reply_audio(&mut self, artifact: AudioArtifact) {
        self.reply_audio = Some(artifact);
        self.reply_audio_seq += 1;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedSession`] wrapping a fresh [`SessionState`].
pub fn new_shared_session(config: AppConfig) -> SharedSession {
    Arc::new(Mutex::new(SessionState::new(config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
