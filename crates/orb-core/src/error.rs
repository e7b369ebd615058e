use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel data length does not match the declared dimensions.
    #[error("Taille de buffer invalide : {actual} octets, {expected} attendus")]
    BufferSize {
        /// Expected byte count (`width × height × 4`).
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
}
