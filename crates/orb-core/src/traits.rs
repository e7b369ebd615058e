use std::sync::Arc;

use crate::draw::DrawCommand;
use crate::frame::FrameBuffer;

/// Fournit des frames de capture au pipeline.
///
/// Implémenté par : `CameraSource`, `ImageSource`, `PatternSource`.
///
/// # Example
/// ```
/// use orb_core::traits::Source;
/// use orb_core::frame::FrameBuffer;
/// use std::sync::Arc;
///
/// struct DummySource;
/// impl Source for DummySource {
///     fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> { None }
///     fn native_size(&self) -> (u32, u32) { (0, 0) }
///     fn is_live(&self) -> bool { false }
/// }
/// ```
pub trait Source: Send + 'static {
    /// Retourne la frame courante.
    ///
    /// Ne bloque JAMAIS : retourne la dernière frame connue si pas de nouvelle,
    /// `None` si aucune frame n'a encore été capturée.
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>>;

    /// Dimensions des frames produites.
    fn native_size(&self) -> (u32, u32);

    /// Indique si la source est infinie (caméra, motif) ou figée (image).
    fn is_live(&self) -> bool;
}

/// Surface qui exécute des commandes de dessin.
///
/// # Example
/// ```
/// use orb_core::traits::DrawTarget;
/// use orb_core::draw::{DrawCommand, HslaColor};
///
/// struct Counter(usize);
/// impl DrawTarget for Counter {
///     fn draw(&mut self, _cmd: &DrawCommand) { self.0 += 1; }
/// }
///
/// let mut c = Counter(0);
/// c.draw(&DrawCommand::Ellipse { cx: 0.0, cy: 0.0, diameter: 4.0, color: HslaColor::gray(50.0, 1.0) });
/// assert_eq!(c.0, 1);
/// ```
pub trait DrawTarget {
    /// Execute one command.
    fn draw(&mut self, cmd: &DrawCommand);
}

/// Enregistre les commandes telles quelles.
impl DrawTarget for Vec<DrawCommand> {
    fn draw(&mut self, cmd: &DrawCommand) {
        self.push(*cmd);
    }
}
