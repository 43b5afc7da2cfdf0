//! Page and link records of a finished site graph

/// Outcome class of a link, derived from its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 3xx
    Warning,
    /// 0, anything below 200, and 4xx/5xx
    Danger,
}

impl StatusClass {
    /// Classifies an HTTP status code
    ///
    /// # Examples
    ///
    /// ```
    /// use sitecheck::report::StatusClass;
    ///
    /// assert_eq!(StatusClass::of(0), StatusClass::Danger);
    /// assert_eq!(StatusClass::of(204), StatusClass::Success);
    /// assert_eq!(StatusClass::of(301), StatusClass::Warning);
    /// assert_eq!(StatusClass::of(503), StatusClass::Danger);
    /// ```
    pub fn of(status_code: u16) -> Self {
        match status_code {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Warning,
            _ => StatusClass::Danger,
        }
    }
}

/// Any URL discovered during a crawl, with its resolved outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Canonical absolute URL, the link's identity within a site
    pub location: String,
    /// Last observed status code, 0 when the URL never resolved
    pub status_code: u16,
    pub redirect: Option<String>,
    pub error: Option<String>,
    /// Same host as the page it was found on
    pub internal: bool,
    /// Location of the page this link was found on; a page's own link names itself
    pub page: String,
}

impl Link {
    /// Outcome class of this link
    pub fn class(&self) -> StatusClass {
        StatusClass::of(self.status_code)
    }
}

/// A visited URL and the links found on its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub link: Link,
    /// Distinct links in order of first discovery
    pub links: Vec<Link>,
}

impl Page {
    pub fn location(&self) -> &str {
        &self.link.location
    }
}
