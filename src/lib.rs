//! asciiwrite: FIGlet font parsing and banner rendering.

pub mod config;
pub mod figfont;
pub mod library;
