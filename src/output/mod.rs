//! Report rendering
//!
//! The [`Printer`] writes each site as a tree of pages and links; the
//! [`Theme`] decides how every line is colored.

mod printer;
mod theme;

pub use printer::{Printer, PrinterOptions};
pub use theme::{Ink, Style, Theme};
