use orb_core::traits::Source;
use orb_source::camera::{CameraConfig, CameraSource, CaptureInput};
use orb_source::image::ImageSource;
use orb_source::pattern::PatternSource;

use crate::cli::{Cli, SourceChoice};

/// Source prête à l'emploi et son libellé pour le panneau.
pub struct SourceHandle {
    /// Frame producer polled once per render tick.
    pub source: Box<dyn Source>,
    /// Short name shown in the sidebar.
    pub label: &'static str,
}

/// Démarre la source demandée en ligne de commande.
///
/// # Errors
/// Returns an error if the source flags conflict, the image cannot be
/// loaded, or the capture thread cannot be spawned.
pub fn start_source(cli: &Cli) -> anyhow::Result<SourceHandle> {
    let (width, height) = cli.capture_size();
    let camera = |input: CaptureInput| CameraConfig {
        input,
        width,
        height,
        fps: cli.fps,
    };

    let handle = match cli.validate_source()? {
        SourceChoice::Camera(device) => {
            let input = device.map_or_else(CaptureInput::default_device, CaptureInput::Device);
            log::info!("Démarrage caméra : {input:?}");
            SourceHandle {
                source: Box::new(CameraSource::start(camera(input))?),
                label: "camera",
            }
        }
        SourceChoice::Video(path) => {
            log::info!("Démarrage vidéo en boucle : {}", path.display());
            SourceHandle {
                source: Box::new(CameraSource::start(camera(CaptureInput::File(path)))?),
                label: "video",
            }
        }
        SourceChoice::Image(path) => SourceHandle {
            source: Box::new(ImageSource::new(&path, (width, height))?),
            label: "image",
        },
        SourceChoice::Pattern => {
            log::info!("Démarrage mire procédurale {width}x{height}");
            SourceHandle {
                source: Box::new(PatternSource::new(width, height)),
                label: "pattern",
            }
        }
    };
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn pattern_source_starts_at_capture_size() {
        let cli = Cli::parse_from(["orbcam", "--pattern", "--capture-width", "64", "--capture-height", "48"]);
        let mut handle = start_source(&cli).unwrap();
        assert_eq!(handle.label, "pattern");
        assert_eq!(handle.source.native_size(), (64, 48));
        assert!(handle.source.next_frame().is_some());
    }

    #[test]
    fn missing_image_fails() {
        let cli = Cli::parse_from(["orbcam", "--image", "/nonexistent/orbcam.png"]);
        assert!(start_source(&cli).is_err());
    }
}
