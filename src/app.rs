//! Speak Coach chat window — egui/eframe application.
//!
//! # Architecture
//!
//! [`SpeakCoachApp`] is the top-level [`eframe::App`].  It owns:
//!
//! * `session`    — the [`SharedSession`] written by the background
//!   [`crate::session::SessionRunner`]; read under a short lock each frame.
//! * `command_tx` — sends [`SessionCommand`]s to the runner.
//!
//! The window is an ordinary decorated chat window: transcript in the
//! middle, controls along the bottom, a status line on top.
//!
//! # Phase rendering
//!
//! | Phase | Visual |
//! |-------|--------|
//! | `Idle` | "Ready" — controls enabled |
//! | `Recording` | red "Listening" + elapsed timer, Stop / Cancel buttons |
//! | `Transcribing` / `Correcting` / `Thinking` / `Speaking` / `Suggesting` | spinner + phase label, controls disabled |
//!
//! Errors render as an orange banner above the controls; topic suggestions
//! as a blue "Try speaking on: ..." banner.

use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::audio::play_bytes;
use crate::session::{Message, Role, SessionCommand, SharedSession, TurnPhase};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Per-frame copy of the session state the UI renders.
///
/// Taken under one short lock so rendering never blocks the runner.  Reply
/// audio bytes are not part of the snapshot; they are cloned only when
/// playback actually starts.
struct Snapshot {
    phase: TurnPhase,
    messages: Vec<Message>,
    last_correction: Option<String>,
    suggested_topic: Option<String>,
    error_message: Option<String>,
    reply_audio_seq: u64,
    has_reply_audio: bool,
    autoplay_replies: bool,
    show_corrections: bool,
}

// ---------------------------------------------------------------------------
// SpeakCoachApp
// ---------------------------------------------------------------------------

/// eframe application — the speaking-practice chat window.
pub struct SpeakCoachApp {
    /// Shared session state, written by the background runner task.
    session: SharedSession,
    /// Send commands to the background session runner.
    command_tx: mpsc::Sender<SessionCommand>,

    // ── UI state ─────────────────────────────────────────────────────────
    /// Contents of the sentence input box.
    input_text: String,
    /// When the current recording started (used for the elapsed display).
    recording_start: Option<Instant>,
    /// Sequence number of the last reply audio this window played.
    played_audio_seq: u64,
    /// Spinner animation phase (increases each frame).
    spinner_phase: f32,
}

impl SpeakCoachApp {
    /// Create a new [`SpeakCoachApp`].
    ///
    /// * `session`    — shared session state, also held by the runner.
    /// * `command_tx` — sender end of the runner's command channel.
    pub fn new(session: SharedSession, command_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self {
            session,
            command_tx,
            input_text: String::new(),
            recording_start: None,
            played_audio_seq: 0,
            spinner_phase: 0.0,
        }
    }

    // ── State access ─────────────────────────────────────────────────────

    /// Copy out everything this frame will render.
    fn snapshot(&self) -> Snapshot {
        let st = self.session.lock().unwrap();
        Snapshot {
            phase: st.phase.clone(),
            messages: st.transcript.messages().to_vec(),
            last_correction: st.last_correction.clone(),
            suggested_topic: st.suggested_topic.clone(),
            error_message: st.error_message.clone(),
            reply_audio_seq: st.reply_audio_seq,
            has_reply_audio: st.reply_audio.is_some(),
            autoplay_replies: st.config.ui.autoplay_replies,
            show_corrections: st.config.ui.show_corrections,
        }
    }

    /// Fire a command at the runner.  A full channel drops the command, so
    /// UI clicks can never deadlock the frame.
    fn send(&self, command: SessionCommand) {
        let _ = self.command_tx.try_send(command);
    }

    /// Clone the current reply audio and play it on a dedicated thread.
    fn play_reply_audio(&mut self, seq: u64) {
        let bytes = {
            let st = self.session.lock().unwrap();
            st.reply_audio.as_ref().map(|artifact| artifact.bytes.clone())
        };

        if let Some(bytes) = bytes {
            // rodio blocks until the sink drains, so playback gets its own
            // thread instead of the UI or runtime threads.
            std::thread::spawn(move || {
                if let Err(e) = play_bytes(bytes) {
                    log::warn!("reply playback failed: {e}");
                }
            });
            self.played_audio_seq = seq;
        }
    }

    /// Submit whatever is in the input box as a text turn.
    fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input_text);
        if !text.trim().is_empty() {
            self.send(SessionCommand::SubmitText(text));
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    /// Status line: phase label, spinner while busy, recording timer.
    fn draw_status_bar(&self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(snap.phase.label())
                    .color(self.phase_color(&snap.phase))
                    .size(13.0),
            );

            if snap.phase.is_busy() && snap.phase != TurnPhase::Recording {
                ui.label(
                    egui::RichText::new(self.spinner_char().to_string())
                        .color(egui::Color32::from_rgb(68, 136, 255))
                        .size(13.0),
                );
            }

            if snap.phase == TurnPhase::Recording {
                let elapsed = self
                    .recording_start
                    .map(|t| t.elapsed().as_secs_f32())
                    .unwrap_or(0.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{elapsed:.1}s"))
                            .color(egui::Color32::from_rgb(255, 140, 140))
                            .size(12.0),
                    );
                });
            }
        });
    }

    /// Scrollable transcript with the correction line under the latest
    /// user message.
    fn draw_transcript(&self, ui: &mut egui::Ui, snap: &Snapshot) {
        let last_user_idx = snap
            .messages
            .iter()
            .rposition(|m| m.role == Role::User);

        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for (i, message) in snap.messages.iter().enumerate() {
                    let name_color = match message.role {
                        Role::User => egui::Color32::from_rgb(68, 136, 255),
                        Role::Assistant => egui::Color32::from_rgb(80, 200, 120),
                    };

                    ui.label(
                        egui::RichText::new(message.role.label())
                            .color(name_color)
                            .size(11.0)
                            .strong(),
                    );
                    ui.label(
                        egui::RichText::new(message.content.as_str())
                            .color(egui::Color32::from_rgb(210, 210, 210))
                            .size(13.0),
                    );

                    if snap.show_corrections && Some(i) == last_user_idx {
                        if let Some(ref corrected) = snap.last_correction {
                            ui.label(
                                egui::RichText::new(format!("Corrected: {corrected}"))
                                    .color(egui::Color32::from_rgb(80, 200, 120))
                                    .italics()
                                    .size(11.0),
                            );
                        }
                    }

                    ui.add_space(8.0);
                }
            });
    }

    /// Topic and error banners, shown above the controls.
    fn draw_banners(&self, ui: &mut egui::Ui, snap: &Snapshot) {
        if let Some(ref topic) = snap.suggested_topic {
            ui.label(
                egui::RichText::new(format!("Try speaking on: {topic}"))
                    .color(egui::Color32::from_rgb(68, 136, 255))
                    .size(12.0),
            );
            ui.add_space(4.0);
        }

        if let Some(ref message) = snap.error_message {
            ui.label(
                egui::RichText::new(message.as_str())
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(12.0),
            );
            ui.add_space(4.0);
        }
    }

    /// Record / topic / replay buttons plus the text input row.
    fn draw_controls(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        let idle = snap.phase == TurnPhase::Idle;

        ui.horizontal(|ui| {
            if snap.phase == TurnPhase::Recording {
                if ui
                    .button(
                        egui::RichText::new("Stop")
                            .color(egui::Color32::from_rgb(255, 80, 80))
                            .size(13.0),
                    )
                    .clicked()
                {
                    self.recording_start = None;
                    self.send(SessionCommand::FinishRecording);
                }
                if ui.button(egui::RichText::new("Cancel").size(13.0)).clicked() {
                    self.recording_start = None;
                    self.send(SessionCommand::CancelRecording);
                }
            } else if ui
                .add_enabled(idle, egui::Button::new(egui::RichText::new("Speak").size(13.0)))
                .clicked()
            {
                self.recording_start = Some(Instant::now());
                self.send(SessionCommand::StartRecording);
            }

            if ui
                .add_enabled(
                    idle,
                    egui::Button::new(egui::RichText::new("Suggest a topic").size(13.0)),
                )
                .clicked()
            {
                self.send(SessionCommand::SuggestTopic);
            }

            if ui
                .add_enabled(
                    idle && snap.has_reply_audio,
                    egui::Button::new(egui::RichText::new("Replay").size(13.0)),
                )
                .clicked()
            {
                self.play_reply_audio(snap.reply_audio_seq);
            }
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let send_width = 52.0;
            let input = ui.add_enabled(
                idle,
                egui::TextEdit::singleline(&mut self.input_text)
                    .hint_text("Or type a sentence...")
                    .desired_width(ui.available_width() - send_width),
            );

            let enter_pressed =
                input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui
                .add_enabled(idle, egui::Button::new(egui::RichText::new("Send").size(13.0)))
                .clicked()
                || enter_pressed
            {
                self.submit_input();
            }
        });
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }

    /// Accent colour for the current phase (used in the status line).
    fn phase_color(&self, phase: &TurnPhase) -> egui::Color32 {
        match phase {
            TurnPhase::Idle => egui::Color32::from_rgb(120, 120, 120),
            TurnPhase::Recording => egui::Color32::from_rgb(255, 80, 80),
            TurnPhase::Transcribing
            | TurnPhase::Correcting
            | TurnPhase::Thinking
            | TurnPhase::Suggesting => egui::Color32::from_rgb(68, 136, 255),
            TurnPhase::Speaking => egui::Color32::from_rgb(80, 200, 120),
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for SpeakCoachApp {
    /// Called every frame by eframe.  Snapshots shared state, handles
    /// autoplay, then renders the window.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snap = self.snapshot();

        // --- Auto-play a freshly arrived reply -----------------------------
        if snap.autoplay_replies && snap.reply_audio_seq > self.played_audio_seq {
            self.play_reply_audio(snap.reply_audio_seq);
        }

        // --- Advance spinner animation -------------------------------------
        self.spinner_phase += 0.08;
        if self.spinner_phase >= 4.0 {
            self.spinner_phase = 0.0;
        }

        // --- Schedule repaints while animated states are active -----------
        match snap.phase {
            TurnPhase::Recording => {
                // Repaint at ~30 fps for the elapsed timer
                ctx.request_repaint_after(Duration::from_millis(33));
            }
            ref phase if phase.is_busy() => {
                // Repaint at ~15 fps for the spinner
                ctx.request_repaint_after(Duration::from_millis(66));
            }
            _ => {
                // Poll for runner updates (e.g. autoplay) at 5 fps
                ctx.request_repaint_after(Duration::from_millis(200));
            }
        }

        // --- Render --------------------------------------------------------
        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_status_bar(ui, &snap);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            self.draw_banners(ui, &snap);
            self.draw_controls(ui, &snap);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_transcript(ui, &snap);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("speak coach window closing");
    }
}
