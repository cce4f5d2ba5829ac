#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `magmatrix` drives animations on an electromagnet pixel matrix.
//!
//! Frames are grids of PWM intensities; an animation plays them under one of
//! four policies, can be merged into another animation at an offset, and can be
//! saved to and restored from block storage.
//!
pub use magmatrix_internal::*;
