use orb_core::config::Params;
use orb_core::draw::{CanvasSize, DrawCommand, HslaColor};
use orb_core::frame::FrameBuffer;
use orb_core::traits::DrawTarget;

use crate::sampler::{PassStats, SamplePass};
use crate::volumetric::draw_volumetric_pixel;

/// Voile translucide posé sur tout le canvas à chaque frame (effet de traînée).
pub const FADE_COLOR: HslaColor = HslaColor::gray(95.0, 0.1);

/// Construit une frame complète dans `target` : voile de fondu, puis un pixel
/// volumétrique par échantillon retenu.
///
/// `frame` may be `None` (no capture yet) or empty; only the fade is drawn then.
/// Returns the statistics of the sampling pass.
///
/// # Example
/// ```
/// use orb_core::config::Params;
/// use orb_core::draw::{CanvasSize, DrawCommand};
/// use orb_mosaic::compose::compose_frame;
///
/// let mut cmds: Vec<DrawCommand> = Vec::new();
/// let stats = compose_frame(&mut cmds, None, &Params::default(), CanvasSize::default());
/// assert_eq!(cmds.len(), 1);
/// assert_eq!(stats.retained, 0);
/// ```
pub fn compose_frame<T: DrawTarget + ?Sized>(
    target: &mut T,
    frame: Option<&FrameBuffer>,
    params: &Params,
    canvas: CanvasSize,
) -> PassStats {
    target.draw(&DrawCommand::Rect {
        x: 0.0,
        y: 0.0,
        w: canvas.width as f32,
        h: canvas.height as f32,
        color: FADE_COLOR,
    });

    let Some(frame) = frame else {
        return PassStats::default();
    };

    let mut pass = SamplePass::new(frame, *params, canvas);
    for sample in pass.by_ref() {
        draw_volumetric_pixel(
            target,
            sample.x,
            sample.y,
            sample.tile,
            f32::from(sample.h),
            params.light,
            params.scale,
        );
    }

    let stats = pass.stats();
    log::trace!(
        "pass: {} cells, {} retained, {} filtered, {} over tolerance",
        stats.cells_visited,
        stats.retained,
        stats.filtered_out,
        stats.over_tolerance
    );
    stats
}
