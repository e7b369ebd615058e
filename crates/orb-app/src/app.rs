use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use orb_core::config::{ParamId, Params};
use orb_core::draw::CanvasSize;
use orb_core::frame::FrameBuffer;
use orb_core::traits::Source;
use orb_mosaic::{PassStats, compose_frame};
use orb_render::canvas::RasterCanvas;
use orb_render::fps::FpsCounter;
use orb_render::present::TerminalPresenter;
use orb_render::ui::{DrawContext, RenderState};
use ratatui::DefaultTerminal;

use crate::pipeline::SourceHandle;

/// Frames consécutives hors budget avant d'émettre un avertissement.
const PERF_WARN_FRAMES: u32 = 10;

/// Crans par appui quand Shift est enfoncé.
const FAST_STEPS: i32 = 10;

/// Application state.
pub struct App {
    source: Box<dyn Source>,
    source_label: &'static str,
    canvas: RasterCanvas,
    presenter: TerminalPresenter,
    /// Paramètres courants, copiés une fois par frame.
    pub params: Params,
    /// Parameter targeted by ←/→.
    pub selected: ParamId,
    /// Sampling stays on the last frame while set.
    pub frozen: bool,
    /// Help overlay visible.
    pub help: bool,
    /// Exit requested.
    pub quitting: bool,
    current_frame: Option<Arc<FrameBuffer>>,
    stats: PassStats,
    fps_counter: FpsCounter,
    frame_budget: Duration,
}

impl App {
    /// Build the app around a started source.
    ///
    /// # Errors
    /// Returns an error if the canvas cannot be allocated.
    pub fn new(handle: SourceHandle, params: Params, canvas: CanvasSize, fps: u32) -> Result<Self> {
        let fps = fps.max(1);
        Ok(Self {
            source: handle.source,
            source_label: handle.label,
            canvas: RasterCanvas::new(canvas)?,
            presenter: TerminalPresenter::new(),
            params,
            selected: ParamId::Light,
            frozen: false,
            help: false,
            quitting: false,
            current_frame: None,
            stats: PassStats::default(),
            fps_counter: FpsCounter::new(fps as usize),
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(fps)),
        })
    }

    /// Main loop: events → sample → draw, paced at the target FPS.
    ///
    /// # Errors
    /// Returns an error on terminal I/O failure.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            if self.quitting {
                break;
            }

            let now = Instant::now();
            let elapsed = now - last_frame;
            if elapsed < self.frame_budget {
                // attendre le reste du créneau en restant réactif au clavier
                let remaining = self.frame_budget.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            let work_start = Instant::now();
            self.step();
            let over = self
                .fps_counter
                .check_budget(work_start.elapsed(), self.frame_budget);
            if over == PERF_WARN_FRAMES {
                log::warn!(
                    "Rendu hors budget depuis {PERF_WARN_FRAMES} frames ({:.1}ms > {:.1}ms). Augmentez --detail ou réduisez le canvas.",
                    self.fps_counter.frame_time_ms(),
                    self.frame_budget.as_secs_f64() * 1000.0
                );
            }

            self.fps_counter.tick();
            let ctx = DrawContext {
                params: &self.params,
                selected: self.selected,
                stats: self.stats,
                fps: &self.fps_counter,
                source_label: self.source_label,
                state: self.render_state(),
            };
            let presenter = &mut self.presenter;
            let canvas = &self.canvas;
            terminal.draw(|frame| orb_render::ui::draw(frame, presenter, canvas, &ctx))?;
        }

        log::info!("Arrêt de la source {}", self.source_label);
        Ok(())
    }

    /// One frame: fetch (unless frozen), sample, draw onto the canvas.
    pub fn step(&mut self) {
        if !self.frozen
            && let Some(frame) = self.source.next_frame()
        {
            self.current_frame = Some(frame);
        }

        let params = self.params;
        let size = self.canvas.size();
        self.stats = compose_frame(
            &mut self.canvas,
            self.current_frame.as_deref(),
            &params,
            size,
        );
        log::debug!("Frame : {:?}", self.stats);
    }

    /// Statistics of the last sampling pass.
    #[must_use]
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    fn render_state(&self) -> RenderState {
        if self.help {
            RenderState::Help
        } else if self.frozen {
            RenderState::Frozen
        } else {
            RenderState::Running
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = *event
        {
            self.handle_key(code, modifiers);
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Esc if self.help => self.help = false,
            KeyCode::Char('q') | KeyCode::Esc => self.quitting = true,
            KeyCode::Char('?') => self.help = !self.help,
            KeyCode::Char(' ') => {
                self.frozen = !self.frozen;
                log::info!("Gel : {}", if self.frozen { "ON" } else { "OFF" });
            }
            KeyCode::Tab => self.selected = self.selected.next(),
            KeyCode::BackTab => self.selected = self.selected.prev(),
            KeyCode::Left | KeyCode::Right => {
                let steps = if modifiers.contains(KeyModifiers::SHIFT) {
                    FAST_STEPS
                } else {
                    1
                };
                let sign = if code == KeyCode::Left { -1 } else { 1 };
                self.params.nudge(self.selected, sign * steps);
            }
            KeyCode::Char('r') => self.params = Params::default(),
            KeyCode::Char(c) => {
                if let Some((id, steps)) = param_key(c) {
                    self.selected = id;
                    self.params.nudge(id, steps);
                }
            }
            _ => {}
        }
    }
}

/// Raccourci direct : minuscule = un cran vers le bas, majuscule = vers le haut.
fn param_key(c: char) -> Option<(ParamId, i32)> {
    let id = match c.to_ascii_lowercase() {
        'l' => ParamId::Light,
        't' => ParamId::Tolerance,
        'd' => ParamId::Detail,
        's' => ParamId::Scale,
        _ => return None,
    };
    Some((id, if c.is_ascii_uppercase() { 1 } else { -1 }))
}
