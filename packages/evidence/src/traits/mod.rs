//! Core trait abstractions for the evidence library.
//!
//! Applications implement these to plug in a generative text provider.

pub mod backend;
