//! Application entry point — Speak Coach.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the five hosted clients (transcription, grammar, conversation,
//!    speech, topics) from config.
//! 5. Create the session command channel and the shared state.
//! 6. Spawn the [`SessionRunner`] on the tokio runtime.
//! 7. Start the cpal audio capture stream.
//! 8. Run [`eframe::run_native`], which blocks the main thread until the
//!    window is closed.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use speak_coach::{
    app::SpeakCoachApp,
    audio::{AudioCapture, AudioChunk, CaptureError, RingBuffer},
    config::{AppConfig, AppPaths, API_KEY_ENV},
    llm::{
        ApiCorrector, ApiResponder, ApiTopicSuggester, ConversationModel, GrammarCorrector,
        TopicSuggester,
    },
    session::{new_shared_session, SessionCommand, SessionRunner, SharedAudioBuffer, TurnPhase},
    stt::{ApiTranscriber, Transcriber},
    tts::{ApiSynthesizer, SpeechSynthesizer},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([420.0, 560.0])
        .with_min_inner_size([360.0, 420.0])
        .with_resizable(true);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Speak Coach starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    if config.api.api_key.is_none() {
        log::warn!(
            "no API key configured; set api.api_key in settings.toml or the {API_KEY_ENV} \
             environment variable"
        );
    }

    // 3. Tokio runtime (2 worker threads, plenty for one sequential turn at
    //    a time)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Hosted clients, one scoped instance each
    let paths = AppPaths::new();

    let stt: Arc<dyn Transcriber> = Arc::new(ApiTranscriber::from_config(
        &config.api,
        &config.stt,
        paths.scratch_dir.clone(),
    ));
    let grammar: Arc<dyn GrammarCorrector> =
        Arc::new(ApiCorrector::from_config(&config.api, &config.grammar));
    let conversation: Arc<dyn ConversationModel> =
        Arc::new(ApiResponder::from_config(&config.api, &config.conversation));
    let tts: Arc<dyn SpeechSynthesizer> = Arc::new(ApiSynthesizer::from_config(
        &config.api,
        &config.tts,
        paths.scratch_dir.clone(),
    ));
    let topics: Arc<dyn TopicSuggester> =
        Arc::new(ApiTopicSuggester::from_config(&config.api, &config.topics));

    // 5. Command channel + shared state
    let (command_tx, command_rx) = mpsc::channel::<SessionCommand>(16);

    let session = new_shared_session(config.clone());

    // The ring buffer holds at most `max_recording_secs` of 16 kHz mono audio;
    // anything older is overwritten while the button stays held.
    let buffer_capacity =
        (config.audio.sample_rate as f32 * config.audio.max_recording_secs) as usize;
    let audio_buf: SharedAudioBuffer = Arc::new(Mutex::new(RingBuffer::new(buffer_capacity)));

    // 6. Spawn the session runner onto the tokio runtime
    let runner = SessionRunner::new(
        Arc::clone(&session),
        Arc::clone(&audio_buf),
        stt,
        grammar,
        conversation,
        tts,
        topics,
    );
    rt.spawn(runner.run(command_rx));

    // 7. cpal audio capture — pushes resampled mono samples into audio_buf
    //    while the session phase is Recording.
    let session_audio = Arc::clone(&session);
    let audio_buf_audio = Arc::clone(&audio_buf);

    let capture = AudioCapture::with_device(config.audio.input_device.as_deref()).or_else(|e| {
        if matches!(e, CaptureError::DeviceNotFound(_)) {
            log::warn!("{e}; falling back to the default input device");
            AudioCapture::new()
        } else {
            Err(e)
        }
    });

    let _stream_handle: Option<speak_coach::audio::StreamHandle> = match capture {
        Ok(capture) => {
            let native_sample_rate = capture.sample_rate();
            let channels = capture.channels();
            let (chunk_tx, chunk_rx) = std::sync::mpsc::channel::<AudioChunk>();

            // Spawn a thread that drains cpal chunks → resamples → feeds
            // the shared ring buffer (only while recording).
            std::thread::Builder::new()
                .name("audio-resample".into())
                .spawn(move || {
                    while let Ok(chunk) = chunk_rx.recv() {
                        // Check the phase under a brief lock
                        let recording =
                            session_audio.lock().unwrap().phase == TurnPhase::Recording;
                        if !recording {
                            continue;
                        }

                        // Downmix to mono
                        let mono = if channels > 1 {
                            speak_coach::audio::stereo_to_mono(&chunk.samples, channels)
                        } else {
                            chunk.samples.clone()
                        };

                        // Resample to 16 kHz
                        let resampled = if chunk.sample_rate != 16_000 {
                            speak_coach::audio::resample_to_16k(&mono, chunk.sample_rate)
                        } else {
                            mono
                        };

                        audio_buf_audio.lock().unwrap().push_slice(&resampled);
                    }
                })
                .expect("failed to spawn audio-resample thread");

            match capture.start(chunk_tx) {
                Ok(handle) => {
                    log::info!(
                        "Audio capture started ({} Hz, {} ch)",
                        native_sample_rate,
                        channels
                    );
                    Some(handle)
                }
                Err(e) => {
                    log::warn!("Failed to start audio stream: {e}");
                    None
                }
            }
        }
        Err(e) => {
            // Typed input still works without a microphone.
            log::warn!("Audio capture unavailable: {e}");
            None
        }
    };

    // 8. Build the egui app and run it (blocks until the window is closed)
    let app = SpeakCoachApp::new(Arc::clone(&session), command_tx);
    let options = native_options(&config);

    eframe::run_native("Speak Coach", options, Box::new(move |_cc| Ok(Box::new(app))))
}
