//! Cascade detector facade.
//!
//! - [`params`] – [`DetectorParams`], the scan settings plus a per-call
//!   deadline.
//! - `pipeline` – [`CascadeDetector`], which ties the integral image, the
//!   scale-space scan and the merge together and optionally reports
//!   per-level diagnostics.

pub mod params;
mod pipeline;

pub use params::DetectorParams;
pub use pipeline::CascadeDetector;
