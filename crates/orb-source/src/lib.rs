/// Sources de frames pour orbcam (caméra, image fixe, mire procédurale).

pub mod camera;
pub mod image;
pub mod pattern;
pub mod resize;
