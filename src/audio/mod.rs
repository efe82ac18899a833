//! Audio capture: sources, frames, and the bounded frame queue.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod downmix;
pub mod frame;
pub mod source;
pub mod wav;
