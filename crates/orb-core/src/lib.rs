/// Types partagés pour orbcam : couleur, frames, paramètres, commandes de dessin.
///
/// Every other crate of the workspace builds on these definitions.

pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod frame;
pub mod traits;

pub use color::Hsl;
pub use config::{ParamId, ParamSpec, Params};
pub use draw::{CanvasSize, DrawCommand, HslaColor};
pub use error::CoreError;
pub use frame::FrameBuffer;
