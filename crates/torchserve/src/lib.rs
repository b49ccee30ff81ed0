//! Client for the external TorchServe inference engine.
//!
//! Sends a text prompt to the prediction endpoint ([`client`]) and decodes
//! the JSON pixel-array response into an encoded image ([`pixels`]). The
//! [`ImageGenerator`] trait is the seam the orchestrator consumes.

pub mod client;
pub mod pixels;

pub use client::{ImageGenerator, InferenceError, TorchServeClient};
pub use pixels::{decode_pixels, encode_jpeg, PixelError};
