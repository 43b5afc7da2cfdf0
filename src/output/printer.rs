//! Tree rendering of a finished report
//!
//! Output is deterministic for a given report: pages sorted by location,
//! links within a page sorted by status code with ties kept in discovery
//! order.

use crate::config::OutputConfig;
use crate::output::theme::{Ink, Theme};
use crate::report::{Link, Page, Site};
use std::borrow::Cow;
use std::io::{self, Stdout, Write};

const BRANCH: &str = "    ├───";
const LAST_BRANCH: &str = "    └───";

/// Independent rendering toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrinterOptions {
    pub colorize: bool,
    /// Percent-decode each printed line
    pub decode_urls: bool,
    pub hide_error: bool,
    pub hide_redirect: bool,
}

impl From<&OutputConfig> for PrinterOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            colorize: config.colorize,
            decode_urls: config.decode_urls,
            hide_error: config.hide_error,
            hide_redirect: config.hide_redirect,
        }
    }
}

/// Writes sites as colorized trees
pub struct Printer<W: Write = Stdout> {
    out: W,
    options: PrinterOptions,
    theme: Theme,
}

impl Printer<Stdout> {
    /// Printer writing to standard output
    pub fn new(options: PrinterOptions) -> Self {
        Self::with_writer(io::stdout(), options)
    }
}

impl<W: Write> Printer<W> {
    pub fn with_writer(out: W, options: PrinterOptions) -> Self {
        Self {
            out,
            options,
            theme: Theme::default(),
        }
    }

    /// Replaces the default theme; ignored while colorizing is off
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints every site in the given order
    pub fn print<'a>(&mut self, sites: impl IntoIterator<Item = &'a Site>) -> io::Result<()> {
        for site in sites {
            self.print_site(site)?;
        }
        self.out.flush()
    }

    /// Prints one site: its error line, or its pages followed by its problems
    pub fn print_site(&mut self, site: &Site) -> io::Result<()> {
        if let Some(err) = site.error() {
            let line = format!("report {:?} has error {:?}", site.name(), err.to_string());
            return self.write_line(Ink::Danger, &line);
        }

        let mut pages: Vec<&Page> = site.pages().iter().collect();
        pages.sort_by(|a, b| a.location().cmp(b.location()));
        for page in pages {
            self.print_page(page)?;
        }

        if !site.problems().is_empty() {
            let header = format!("found problems on the site {:?}", site.name());
            self.write_line(Ink::Danger, &header)?;
            for (i, problem) in site.problems().iter().enumerate() {
                let line = format!("- [{}] {} `{}`", i, problem.message, problem.context);
                self.write_line(Ink::Danger, &line)?;
            }
        }
        Ok(())
    }

    fn print_page(&mut self, page: &Page) -> io::Result<()> {
        let header = self.entry(&page.link);
        self.write_line(Ink::for_link(&page.link), &header)?;

        let mut links: Vec<&Link> = page.links.iter().collect();
        links.sort_by_key(|link| link.status_code);
        let last = links.len().saturating_sub(1);
        for (i, link) in links.into_iter().enumerate() {
            let glyph = if i == last { LAST_BRANCH } else { BRANCH };
            let line = format!("{}{}", glyph, self.entry(link));
            self.write_line(Ink::for_link(link), &line)?;
        }
        Ok(())
    }

    /// `[code] location -> (error) -> redirect`, minus the hidden suffixes
    fn entry(&self, link: &Link) -> String {
        let mut line = format!("[{}] {}", link.status_code, link.location);
        if !self.options.hide_error {
            if let Some(error) = &link.error {
                line.push_str(&format!(" -> ({})", error));
            }
        }
        if !self.options.hide_redirect {
            if let Some(redirect) = &link.redirect {
                line.push_str(&format!(" -> {}", redirect));
            }
        }
        line
    }

    fn write_line(&mut self, ink: Ink, line: &str) -> io::Result<()> {
        let line = if self.options.decode_urls {
            decode(line)
        } else {
            Cow::Borrowed(line)
        };
        if self.options.colorize {
            writeln!(self.out, "{}", self.theme.paint(ink, &line))
        } else {
            writeln!(self.out, "{}", line)
        }
    }
}

/// Percent-decodes `line`, keeping it as is when the result is not UTF-8
fn decode(line: &str) -> Cow<'_, str> {
    urlencoding::decode(line).unwrap_or(Cow::Borrowed(line))
}
