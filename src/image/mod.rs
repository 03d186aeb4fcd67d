//! Grayscale pixel buffers consumed by the detector.
//!
//! - [`ImageU8`]: borrowed 8-bit view with an explicit stride, the input of
//!   every detection call.
//! - [`GrayImageU8`]: owned, tightly packed buffer used for resampled scale
//!   levels and by the tools.
//! - [`traits`]: row-oriented access shared by both.

pub mod io;
pub mod owned;
pub mod traits;
pub mod u8;

pub use self::owned::GrayImageU8;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;
