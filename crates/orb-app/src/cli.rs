use std::path::PathBuf;

use clap::Parser;
use orb_core::config::{CANVAS_SIZE, CAPTURE_SIZE, Params};

/// orbcam : mosaïque d'orbes lumineuses générée en direct depuis la caméra.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Utiliser la caméra (source par défaut si aucune autre n'est donnée).
    #[arg(long, default_value_t = false)]
    pub camera: bool,

    /// Périphérique caméra (ex : /dev/video1, "1", "video=USB Camera"). Implique --camera.
    #[arg(long)]
    pub device: Option<String>,

    /// Fichier vidéo lu en boucle à la place de la caméra (via ffmpeg).
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// Image fixe (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Mire procédurale animée, pour tourner sans caméra.
    #[arg(long, default_value_t = false)]
    pub pattern: bool,

    /// Biais lumière / couleur initial [0, 1].
    #[arg(long)]
    pub light: Option<f32>,

    /// Répétitions tolérées par classe de couleur [1, 50].
    #[arg(long)]
    pub tolerance: Option<u32>,

    /// Pas de la grille d'échantillonnage [2, 10].
    #[arg(long)]
    pub detail: Option<u32>,

    /// Taille des orbes [1, 30].
    #[arg(long)]
    pub scale: Option<f32>,

    /// Largeur du canvas de dessin.
    #[arg(long, default_value_t = CANVAS_SIZE.0)]
    pub canvas_width: u32,

    /// Hauteur du canvas de dessin.
    #[arg(long, default_value_t = CANVAS_SIZE.1)]
    pub canvas_height: u32,

    /// Largeur de capture.
    #[arg(long, default_value_t = CAPTURE_SIZE.0)]
    pub capture_width: u32,

    /// Hauteur de capture.
    #[arg(long, default_value_t = CAPTURE_SIZE.1)]
    pub capture_height: u32,

    /// FPS cible du rendu et de la capture.
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Écrire les logs dans ce fichier plutôt que sur stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Source choisie en ligne de commande.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceChoice {
    /// Live capture device, `None` = platform default.
    Camera(Option<String>),
    /// Looped video file.
    Video(PathBuf),
    /// Still image.
    Image(PathBuf),
    /// Procedural test pattern.
    Pattern,
}

impl Cli {
    /// Resolve the frame source; the camera is the default.
    ///
    /// # Errors
    /// Returns an error if more than one source is specified.
    pub fn validate_source(&self) -> anyhow::Result<SourceChoice> {
        let camera = self.camera || self.device.is_some();
        let count = usize::from(camera)
            + usize::from(self.video.is_some())
            + usize::from(self.image.is_some())
            + usize::from(self.pattern);

        if count > 1 {
            anyhow::bail!(
                "Une seule source à la fois. Spécifiez --camera/--device, --video, --image, OU --pattern."
            );
        }

        Ok(if let Some(ref path) = self.video {
            SourceChoice::Video(path.clone())
        } else if let Some(ref path) = self.image {
            SourceChoice::Image(path.clone())
        } else if self.pattern {
            SourceChoice::Pattern
        } else {
            SourceChoice::Camera(self.device.clone())
        })
    }

    /// Initial parameters: defaults overridden by flags, then clamped.
    #[must_use]
    pub fn initial_params(&self) -> Params {
        let mut params = Params::default();
        if let Some(light) = self.light {
            params.light = light;
        }
        if let Some(tolerance) = self.tolerance {
            params.tolerance = tolerance;
        }
        if let Some(detail) = self.detail {
            params.detail = detail;
        }
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        params.clamp_all();
        params
    }

    /// Capture resolution as (width, height).
    #[must_use]
    pub fn capture_size(&self) -> (u32, u32) {
        (self.capture_width, self.capture_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("orbcam").chain(args.iter().copied()))
    }

    #[test]
    fn camera_is_the_default_source() {
        let cli = parse(&[]);
        assert_eq!(cli.validate_source().unwrap(), SourceChoice::Camera(None));
        assert_eq!(cli.canvas_width, 1920);
        assert_eq!(cli.capture_size(), (320, 240));
    }

    #[test]
    fn device_implies_camera() {
        let cli = parse(&["--device", "/dev/video2"]);
        assert_eq!(
            cli.validate_source().unwrap(),
            SourceChoice::Camera(Some("/dev/video2".into()))
        );
    }

    #[test]
    fn video_file_stands_in_for_the_camera() {
        assert_eq!(
            parse(&["--video", "clip.mp4"]).validate_source().unwrap(),
            SourceChoice::Video("clip.mp4".into())
        );
    }

    #[test]
    fn two_sources_are_rejected() {
        assert!(parse(&["--pattern", "--image", "a.png"]).validate_source().is_err());
        assert!(parse(&["--camera", "--video", "a.mp4"]).validate_source().is_err());
    }

    #[test]
    fn out_of_range_params_are_clamped() {
        let p = parse(&["--light", "3", "--tolerance", "0", "--detail", "40", "--scale", "7.5"])
            .initial_params();
        assert!((p.light - 1.0).abs() < f32::EPSILON);
        assert_eq!(p.tolerance, 1);
        assert_eq!(p.detail, 10);
        assert!((p.scale - 7.5).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_flags_keep_defaults() {
        assert_eq!(parse(&["--pattern"]).initial_params(), Params::default());
    }
}
