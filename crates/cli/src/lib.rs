//! Iosevka Custom CLI library.

pub mod cli;
