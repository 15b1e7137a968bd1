//! Session orchestration for the speaking-practice loop.
//!
//! This module wires the full audio → transcription → grammar → reply → speech
//! loop and exposes the shared state that the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc)
//!        │
//!        ▼
//! SessionRunner::run()  ← async tokio task
//!        │
//!        ├─ StartRecording   → clear RingBuffer, set Recording
//!        ├─ CancelRecording  → clear RingBuffer, back to Idle
//!        │
//!        ├─ FinishRecording
//!        │      ├─ drain RingBuffer
//!        │      ├─ Transcriber::transcribe          → Transcribing
//!        │      ├─ GrammarCorrector::correct        → Correcting
//!        │      ├─ ConversationModel::reply         → Thinking
//!        │      └─ SpeechSynthesizer::synthesize    → Speaking
//!        │
//!        ├─ SubmitText(text) → same flow from the grammar step
//!        └─ SuggestTopic     → TopicSuggester::suggest → Suggesting
//!
//! SharedSession (Arc<Mutex<SessionState>>) ←── read by egui update() each frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::{Arc, Mutex};
//! use tokio::sync::mpsc;
//! use speak_coach::audio::RingBuffer;
//! use speak_coach::config::AppConfig;
//! use speak_coach::session::{new_shared_session, SessionCommand, SessionRunner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let session = new_shared_session(config.clone());
//!     let audio_buf = Arc::new(Mutex::new(RingBuffer::<f32>::new(16_000 * 60)));
//!
//!     // (the five clients constructed from config)
//!     # use speak_coach::stt::Transcriber;
//!     # use speak_coach::llm::{ConversationModel, GrammarCorrector, TopicSuggester};
//!     # use speak_coach::tts::SpeechSynthesizer;
//!     # fn make_stt() -> Arc<dyn Transcriber> { unimplemented!() }
//!     # fn make_grammar() -> Arc<dyn GrammarCorrector> { unimplemented!() }
//!     # fn make_conversation() -> Arc<dyn ConversationModel> { unimplemented!() }
//!     # fn make_tts() -> Arc<dyn SpeechSynthesizer> { unimplemented!() }
//!     # fn make_topics() -> Arc<dyn TopicSuggester> { unimplemented!() }
//!
//!     let (command_tx, command_rx) = mpsc::channel(16);
//!     let runner = SessionRunner::new(
//!         session.clone(),
//!         audio_buf,
//!         make_stt(),
//!         make_grammar(),
//!         make_conversation(),
//!         make_tts(),
//!         make_topics(),
//!     );
//!
//!     tokio::spawn(async move { runner.run(command_rx).await });
//!
//!     command_tx.send(SessionCommand::SuggestTopic).await.unwrap();
//! }
//! ```

pub mod runner;
pub mod state;
pub mod transcript;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{SessionCommand, SessionError, SessionRunner, SharedAudioBuffer};
pub use state::{new_shared_session, SessionState, SharedSession, TurnPhase};
pub use transcript::{Message, Role, Transcript, GREETING};
