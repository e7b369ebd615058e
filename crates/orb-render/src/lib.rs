/// Terminal rendering for orbcam.
///
/// Provides the persistent raster canvas, the half-block presenter,
/// the parameter sidebar and FPS tracking.
pub mod canvas;
pub mod fps;
pub mod present;
pub mod ui;
