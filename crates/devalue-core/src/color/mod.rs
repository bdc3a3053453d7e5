//! Color math shared by every effect: RGB/HSV conversion and weighted luma.
//!
//! These functions are the CPU reference for the GPU shaders in
//! `devalue-gpu`; `shaders/color_math.wgsl` mirrors them line for line.

pub mod hsv;
pub mod luma;

pub use hsv::{ACHROMATIC_EPSILON, hsv_to_rgb, rgb_to_hsv};
pub use luma::{LUMA_REC709, weighted_luma};
