//! Procedural renderer for the LoanLens app icon.
//!
//! The icon is a magnifying glass over a currency symbol with a rising trend
//! line, drawn on a blue to teal gradient with rounded corners. [`icon_gen`]
//! renders it and writes `app_icon.png` plus the adaptive icon foreground
//! layer `app_icon_foreground.png`.

pub mod canvas;
pub mod font;
pub mod icon_gen;
pub mod palette;
