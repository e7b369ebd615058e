// La capture passe par un sous-processus `ffmpeg` (std::process::Command) :
// aucune dépendance native, il suffit d'avoir `ffmpeg` dans le PATH.
//
//   - `CaptureInput`       : périphérique caméra ou fichier vidéo bouclé
//   - `ffmpeg_args`        : ligne de commande → flux RGBA brut sur stdout
//   - `spawn_capture_thread`: thread dédié, lit les frames, gère les commandes
//   - `CameraSource`       : côté rendu, ne bloque jamais, garde la dernière frame

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use flume::{Receiver, Sender, TrySendError};
use orb_core::frame::FrameBuffer;
use orb_core::traits::Source;

/// Taille du pool de frames pré-allouées.
/// Doit être > capacité du canal (3) pour garantir un slot libre sans allocation.
const POOL_SIZE: usize = 6;

/// Capacité du canal de frames.
const FRAME_CHANNEL_CAP: usize = 3;

/// Commandes pour le thread de capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    /// Arrêter le thread proprement (tue ffmpeg).
    Quit,
}

/// Ce que ffmpeg doit lire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureInput {
    /// Platform capture device: `/dev/video0` (v4l2), `0` (avfoundation),
    /// `video=Integrated Camera` (dshow).
    Device(String),
    /// Video file played in real time and looped, standing in for a camera.
    File(PathBuf),
}

impl CaptureInput {
    /// Default capture device of the current platform.
    #[must_use]
    pub fn default_device() -> Self {
        let name = if cfg!(target_os = "macos") {
            "0"
        } else if cfg!(target_os = "windows") {
            "video=Integrated Camera"
        } else {
            "/dev/video0"
        };
        CaptureInput::Device(name.to_string())
    }
}

/// Paramètres de capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraConfig {
    /// Input to open.
    pub input: CaptureInput,
    /// Output width after scaling.
    pub width: u32,
    /// Output height after scaling.
    pub height: u32,
    /// Requested frame rate.
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let (width, height) = orb_core::config::CAPTURE_SIZE;
        Self {
            input: CaptureInput::default_device(),
            width,
            height,
            fps: 30,
        }
    }
}

/// Construit les arguments ffmpeg : entrée caméra/fichier → RGBA brut `w×h` sur stdout.
///
/// # Example
/// ```
/// use orb_source::camera::{ffmpeg_args, CameraConfig, CaptureInput};
/// let cfg = CameraConfig { input: CaptureInput::File("clip.mp4".into()), width: 320, height: 240, fps: 30 };
/// let args = ffmpeg_args(&cfg);
/// assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgba"));
/// assert!(args.contains(&"-stream_loop".to_string()));
/// ```
#[must_use]
pub fn ffmpeg_args(cfg: &CameraConfig) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
    match &cfg.input {
        CaptureInput::Device(name) => {
            let format = if cfg!(target_os = "macos") {
                "avfoundation"
            } else if cfg!(target_os = "windows") {
                "dshow"
            } else {
                "v4l2"
            };
            args.extend(["-f".into(), format.into()]);
            args.extend(["-framerate".into(), cfg.fps.to_string()]);
            args.extend(["-i".into(), name.clone()]);
        }
        CaptureInput::File(path) => {
            // -re : cadence temps réel, -stream_loop -1 : boucle infinie
            args.extend(["-re".into(), "-stream_loop".into(), "-1".into()]);
            args.extend(["-i".into(), path.to_string_lossy().into_owned()]);
        }
    }
    args.extend([
        "-vf".into(),
        format!("scale={}:{}:flags=bilinear", cfg.width, cfg.height),
        "-r".into(),
        cfg.fps.to_string(),
        "-an".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "pipe:1".into(),
    ]);
    args
}

/// Lance ffmpeg. Retourne `None` (avec un warning) si le spawn échoue.
fn spawn_ffmpeg(cfg: &CameraConfig) -> Option<Child> {
    match Command::new("ffmpeg")
        .args(ffmpeg_args(cfg))
        .stdout(Stdio::piped())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => {
            log::info!(
                "ffmpeg capture lancé : {:?} -> {}x{} @ {}fps",
                cfg.input,
                cfg.width,
                cfg.height,
                cfg.fps
            );
            Some(child)
        }
        Err(e) => {
            log::warn!("Impossible de lancer ffmpeg (est-il dans le PATH ?) : {e}");
            None
        }
    }
}

/// Lit exactement `buf.len()` bytes depuis `reader`.
///
/// # Errors
/// Retourne `Ok(true)` si lu avec succès, `Ok(false)` sur EOF avant complétion,
/// `Err` sur erreur I/O fatale.
///
/// # Example
/// ```
/// use orb_source::camera::read_exact_or_eof;
/// let mut buf = [0u8; 4];
/// assert!(read_exact_or_eof(&mut &[1u8, 2, 3, 4, 5][..], &mut buf).unwrap());
/// assert!(!read_exact_or_eof(&mut &[1u8][..], &mut buf).unwrap());
/// ```
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Ok(false),
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Trouve ou crée un slot libre dans le pool.
///
/// Invariant : retourne un index `i` tel que `Arc::strong_count(&pool[i]) == 1`.
fn find_or_create_slot(pool: &mut Vec<Arc<FrameBuffer>>, w: u32, h: u32) -> usize {
    if let Some(i) = pool.iter().position(|a| Arc::strong_count(a) == 1) {
        i
    } else {
        // pool saturé : allouer plutôt que bloquer
        pool.push(Arc::new(FrameBuffer::new(w, h)));
        pool.len() - 1
    }
}

/// Pompe les frames de `reader` vers `frame_tx` jusqu'à EOF, `Quit` ou déconnexion.
///
/// Frames that do not fit in the channel are dropped: the render side only
/// ever wants the most recent one.
fn capture_loop<R: Read>(
    reader: &mut R,
    width: u32,
    height: u32,
    frame_tx: &Sender<Arc<FrameBuffer>>,
    cmd_rx: &Receiver<CameraCommand>,
) -> Result<u64> {
    let mut pool: Vec<Arc<FrameBuffer>> = (0..POOL_SIZE)
        .map(|_| Arc::new(FrameBuffer::new(width, height)))
        .collect();
    let mut frames = 0u64;

    loop {
        match cmd_rx.try_recv() {
            Ok(CameraCommand::Quit) | Err(flume::TryRecvError::Disconnected) => {
                log::info!("Thread caméra : arrêt demandé.");
                return Ok(frames);
            }
            Err(flume::TryRecvError::Empty) => {}
        }

        let idx = find_or_create_slot(&mut pool, width, height);
        let Some(fb) = Arc::get_mut(&mut pool[idx]) else {
            continue;
        };
        if !read_exact_or_eof(reader, &mut fb.data)? {
            log::info!("Thread caméra : fin de flux après {frames} frames.");
            return Ok(frames);
        }
        frames += 1;

        match frame_tx.try_send(Arc::clone(&pool[idx])) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => return Ok(frames),
        }
    }
}

/// Spawne le thread de capture : `reader` (stdout ffmpeg) → pool de frames → `frame_tx`.
///
/// The thread ends on EOF, on `Quit` (checked between frames) or when the
/// receiving side is gone. A stream that ends before its first frame is
/// reported as a warning: the device is usually missing or busy.
///
/// # Errors
/// Returns an error only if the OS thread cannot be created.
pub fn spawn_capture_thread<R: Read + Send + 'static>(
    mut reader: R,
    width: u32,
    height: u32,
    frame_tx: Sender<Arc<FrameBuffer>>,
    cmd_rx: Receiver<CameraCommand>,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("orb-camera".to_string())
        .spawn(move || {
            match capture_loop(&mut reader, width, height, &frame_tx, &cmd_rx) {
                Ok(0) => log::warn!(
                    "Aucune frame reçue de la caméra (périphérique absent ou occupé ?)"
                ),
                Ok(n) => log::debug!("Thread caméra : {n} frames lues."),
                Err(e) => log::warn!("Thread caméra : erreur lecture pipe : {e}"),
            }
            log::info!("Thread caméra terminé proprement.");
        })
        .context("Impossible de spawner le thread caméra")
}

/// Source caméra côté rendu. Ne bloque jamais : retourne la frame la plus
/// récente reçue, ou la précédente si rien de neuf n'est arrivé.
///
/// Owns the ffmpeg process: dropping the source kills it, which closes the
/// pipe and unblocks the capture thread even if no frame ever arrived.
pub struct CameraSource {
    frame_rx: Receiver<Arc<FrameBuffer>>,
    cmd_tx: Sender<CameraCommand>,
    latest: Option<Arc<FrameBuffer>>,
    size: (u32, u32),
    child: Option<Child>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CameraSource {
    /// Start capturing with `cfg`.
    ///
    /// If ffmpeg cannot be started, a warning is logged and the source never
    /// yields a frame.
    ///
    /// # Errors
    /// Returns an error if the capture thread cannot be spawned.
    pub fn start(cfg: CameraConfig) -> Result<Self> {
        let size = (cfg.width, cfg.height);
        let Some(mut child) = spawn_ffmpeg(&cfg) else {
            let (_frame_tx, frame_rx) = flume::bounded(1);
            return Ok(Self::from_channel(frame_rx, size));
        };
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            anyhow::bail!("ffmpeg lancé sans stdout");
        };
        let mut source = Self::from_reader(stdout, size)?;
        source.child = Some(child);
        Ok(source)
    }

    /// Capture raw RGBA frames of `size` from any byte stream on a background thread.
    ///
    /// Without an owned process, dropping the source does not wait for the
    /// thread: a stalled reader is left to finish on its own.
    ///
    /// # Errors
    /// Returns an error if the capture thread cannot be spawned.
    pub fn from_reader<R: Read + Send + 'static>(reader: R, size: (u32, u32)) -> Result<Self> {
        let (frame_tx, frame_rx) = flume::bounded(FRAME_CHANNEL_CAP);
        let (cmd_tx, cmd_rx) = flume::bounded(4);
        let handle = spawn_capture_thread(reader, size.0, size.1, frame_tx, cmd_rx)?;
        Ok(Self {
            frame_rx,
            cmd_tx,
            latest: None,
            size,
            child: None,
            handle: Some(handle),
        })
    }

    /// Build a source fed by an existing channel (tests, custom producers).
    #[must_use]
    pub fn from_channel(frame_rx: Receiver<Arc<FrameBuffer>>, size: (u32, u32)) -> Self {
        let (cmd_tx, _cmd_rx) = flume::bounded(1);
        Self {
            frame_rx,
            cmd_tx,
            latest: None,
            size,
            child: None,
            handle: None,
        }
    }
}

impl Source for CameraSource {
    fn next_frame(&mut self) -> Option<Arc<FrameBuffer>> {
        if let Some(frame) = self.frame_rx.try_iter().last() {
            self.latest = Some(frame);
        }
        self.latest.clone()
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }

    fn is_live(&self) -> bool {
        true
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(CameraCommand::Quit);
        let Some(mut child) = self.child.take() else {
            // pas de processus à tuer : on ne peut pas débloquer le thread, on le détache
            return;
        };
        // tuer ffmpeg ferme le pipe : le thread sort de sa lecture sur EOF
        let _ = child.kill();
        let _ = child.wait();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("Thread caméra : panique à l'arrêt.");
        }
    }
}
