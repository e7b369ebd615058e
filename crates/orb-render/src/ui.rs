use orb_core::config::{ParamId, Params};
use orb_mosaic::PassStats;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::canvas::RasterCanvas;
use crate::fps::FpsCounter;
use crate::present::TerminalPresenter;

/// Largeur fixe du panneau de réglages, en colonnes.
pub const SIDEBAR_WIDTH: u16 = 24;

/// Largeur des jauges dans le panneau.
const GAUGE_WIDTH: usize = 16;

/// État d'affichage de l'application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Frames from the source are sampled every tick.
    Running,
    /// The last frame buffer is re-sampled; new frames are ignored.
    Frozen,
    /// Help overlay visible, rendering continues underneath.
    Help,
}

/// Everything the sidebar shows for one frame.
pub struct DrawContext<'a> {
    /// Parameter snapshot used for this frame.
    pub params: &'a Params,
    /// Parameter targeted by ←/→.
    pub selected: ParamId,
    /// Sampling statistics of the last pass.
    pub stats: PassStats,
    /// Frame timing.
    pub fps: &'a FpsCounter,
    /// Short name of the frame source ("camera", "pattern", ...).
    pub source_label: &'a str,
    /// Current display state.
    pub state: RenderState,
}

/// Dessine l'interface complète : canvas | panneau, plus l'aide si active.
pub fn draw(
    frame: &mut Frame,
    presenter: &mut TerminalPresenter,
    canvas: &RasterCanvas,
    ctx: &DrawContext<'_>,
) {
    let area = frame.area();
    let [canvas_area, sidebar_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(SIDEBAR_WIDTH)]).areas(area);

    presenter.present(frame.buffer_mut(), canvas_area, canvas);
    let sidebar = Paragraph::new(sidebar_lines(ctx))
        .block(Block::default().borders(Borders::LEFT).title(" Orbs "));
    frame.render_widget(sidebar, sidebar_area);

    if ctx.state == RenderState::Help {
        draw_help_overlay(frame, area);
    }
}

/// Jauge texte de `width` cases pour un ratio dans [0, 1].
///
/// # Example
/// ```
/// use orb_render::ui::slider_line;
/// assert_eq!(slider_line(0.5, 4), "██░░");
/// assert_eq!(slider_line(2.0, 3), "███");
/// ```
#[must_use]
pub fn slider_line(ratio: f32, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = ((ratio * width as f32).round() as usize).min(width);
    let mut s = String::with_capacity(width * 3);
    s.extend(std::iter::repeat_n('█', filled));
    s.extend(std::iter::repeat_n('░', width - filled));
    s
}

/// Valeur formatée d'un paramètre, avec la précision de son pas.
#[must_use]
pub fn format_value(id: ParamId, value: f32) -> String {
    match id {
        ParamId::Light => format!("{value:.3}"),
        ParamId::Scale => format!("{value:.1}"),
        ParamId::Tolerance | ParamId::Detail => format!("{value:.0}"),
    }
}

fn sidebar_lines(ctx: &DrawContext<'_>) -> Vec<Line<'static>> {
    let header = Style::default().fg(Color::Yellow);
    let state_str = match ctx.state {
        RenderState::Running => "▶ LIVE",
        RenderState::Frozen => "❚❚ FROZEN",
        RenderState::Help => "? HELP",
    };

    let mut lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(Color::Green))),
        Line::from(format!(" src: {}", ctx.source_label)),
        Line::from(""),
        Line::from(Span::styled("─ Controls ───", header)),
    ];

    for id in ParamId::ALL {
        let spec = id.spec();
        let value = ctx.params.get(id);
        let ratio = (value - spec.min) / (spec.max - spec.min);
        let selected = id == ctx.selected;
        let marker = if selected { "›" } else { " " };
        let style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}: {}", id.label(), format_value(id, value)),
            style,
        )));
        lines.push(Line::from(Span::styled(
            format!(" {}", slider_line(ratio, GAUGE_WIDTH)),
            style,
        )));
    }

    let s = ctx.stats;
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("─ Frame ──────", header)),
        Line::from(format!(" {:.0} FPS", ctx.fps.fps())),
        Line::from(format!(" {:.1}ms", ctx.fps.frame_time_ms())),
        Line::from(format!(" cells: {}", s.cells_visited)),
        Line::from(format!(" orbs: {}", s.retained)),
        Line::from(format!(" pale: {}", s.filtered_out)),
        Line::from(format!(" repeats: {}", s.over_tolerance)),
        Line::from(""),
        Line::from(Span::styled(" ? = help", Style::default().fg(Color::DarkGray))),
    ]);
    lines
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(" orbcam · Controls ", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(" q/Esc       Quit"),
        Line::from(" Space       Freeze / resume"),
        Line::from(" Tab/S-Tab   Select control"),
        Line::from(" ←/→         Nudge selected"),
        Line::from(" Shift+←/→   Nudge ×10"),
        Line::from(" l/L         Light / color ±"),
        Line::from(" t/T         Repetition tol. ±"),
        Line::from(" d/D         Detail ±"),
        Line::from(" s/S         Size ±"),
        Line::from(" r           Reset controls"),
        Line::from(" ?           Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 36u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}
