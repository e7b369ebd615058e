use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Compteur FPS sur une fenêtre glissante de durées de frame.
///
/// Also tracks how many consecutive frames exceeded a time budget, which the
/// app uses to warn once when the renderer cannot keep up.
///
/// # Example
/// ```
/// use orb_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(30);
/// counter.tick();
/// assert!(counter.fps() >= 0.0);
/// ```
pub struct FpsCounter {
    durations: VecDeque<Duration>,
    window: usize,
    last: Option<Instant>,
    over_budget: u32,
}

impl FpsCounter {
    /// Create a counter averaging over `window` frames (at least 1).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            durations: VecDeque::with_capacity(window + 1),
            window,
            last: None,
            over_budget: 0,
        }
    }

    /// Appeler une fois par frame, après le rendu.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last {
            self.record(now.duration_since(last));
        }
        self.last = Some(now);
    }

    /// Push an explicit frame duration.
    pub fn record(&mut self, dt: Duration) {
        self.durations.push_back(dt);
        if self.durations.len() > self.window {
            self.durations.pop_front();
        }
    }

    /// FPS moyen sur la fenêtre, 0 tant qu'aucune durée n'est connue.
    #[must_use]
    pub fn fps(&self) -> f64 {
        let total: Duration = self.durations.iter().sum();
        let secs = total.as_secs_f64();
        if secs > 0.0 {
            self.durations.len() as f64 / secs
        } else {
            0.0
        }
    }

    /// Durée de la dernière frame, en millisecondes.
    #[must_use]
    pub fn frame_time_ms(&self) -> f64 {
        self.durations
            .back()
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }

    /// Compare `work` to `budget` and return the length of the current run
    /// of over-budget frames (0 when this frame was on time).
    pub fn check_budget(&mut self, work: Duration, budget: Duration) -> u32 {
        if work > budget {
            self.over_budget += 1;
        } else {
            self.over_budget = 0;
        }
        self.over_budget
    }
}
