//! Site reports
//!
//! This module contains:
//! - The page/link model of a finished site
//! - The builder turning one site's events into that model
//! - [`Site`] and the [`Report`] orchestrator running many sites at once

mod builder;
mod model;
mod orchestrator;
mod site;

pub use builder::{listen, SiteBuilder, SiteGraph};
pub use model::{Link, Page, StatusClass};
pub use orchestrator::{summarize, Report, ReportSummary};
pub use site::Site;
