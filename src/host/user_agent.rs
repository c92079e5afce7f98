//! Coarse browser and OS labels derived from a user-agent string.
//!
//! Checks are ordered substring matches; the first match wins.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Edge,
    IE,
    Chrome,
    Firefox,
    Others,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Edge => "Edge",
            Browser::IE => "IE",
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Others => "Others",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsVersion {
    Windows10,
    Windows81,
    Windows8,
    Windows7,
    Ios,
    Mac,
    Other,
}

impl OsVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsVersion::Windows10 => "10",
            OsVersion::Windows81 => "8.1",
            OsVersion::Windows8 => "8",
            OsVersion::Windows7 => "7",
            OsVersion::Ios => "iOS",
            OsVersion::Mac => "Mac",
            OsVersion::Other => "Other",
        }
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Chromium-based Edge also carries "Chrome", so "Edg" must come first
const BROWSER_PATTERNS: &[(&str, Browser)] = &[
    ("Edg", Browser::Edge),
    ("MSIE", Browser::IE),
    ("Trident", Browser::IE),
    ("Chrome", Browser::Chrome),
    ("Firefox", Browser::Firefox),
];

const WINDOWS_PATTERNS: &[(&str, OsVersion)] = &[
    ("Windows NT 10.0", OsVersion::Windows10),
    ("Windows NT 6.3", OsVersion::Windows81),
    ("Windows NT 6.2", OsVersion::Windows8),
    ("Windows NT 6.1", OsVersion::Windows7),
];

const CHROME_TOKEN: &str = "Chrome";

pub fn browser_name(user_agent: &str) -> Browser {
    BROWSER_PATTERNS
        .iter()
        .find(|(pattern, _)| user_agent.contains(pattern))
        .map(|(_, browser)| *browser)
        .unwrap_or(Browser::Others)
}

pub fn os_version(user_agent: &str) -> OsVersion {
    if let Some((_, os)) = WINDOWS_PATTERNS
        .iter()
        .find(|(pattern, _)| user_agent.contains(pattern))
    {
        return *os;
    }
    if user_agent.contains("MAC") {
        if user_agent.contains("LIKE MAC") {
            return OsVersion::Ios;
        }
        return OsVersion::Mac;
    }
    OsVersion::Other
}

/// The `Chrome/<version>` token with its slash dropped, e.g. `Chrome120.0.0.0`.
/// Empty if the user agent has no Chrome token.
pub fn browser_version(user_agent: &str) -> String {
    let Some(start) = user_agent.find(CHROME_TOKEN) else {
        return String::new();
    };
    let token = user_agent[start..].split(' ').next().unwrap_or_default();
    token.replacen('/', "", 1)
}
