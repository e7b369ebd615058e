/// Moteur mosaïque d'orbcam : échantillonnage/déduplication des couleurs
/// et rendu des pixels volumétriques.
///
/// Pipeline per frame: `SamplePass` → `RetainedSample` → `draw_volumetric_pixel`.
pub mod bucket;
pub mod compose;
pub mod sampler;
pub mod volumetric;

pub use compose::compose_frame;
pub use sampler::{PassStats, RetainedSample, SamplePass};
