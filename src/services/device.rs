// src/services/device.rs
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static MOBILE_UA: LazyLock<Regex> =
    LazyLock::new(|| ci("Android|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini"));
static IPAD_UA: LazyLock<Regex> = LazyLock::new(|| ci("iPad"));

// Checked in order; the first match wins.
static OS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("Windows", "Windows"),
        ("Mac", "macOS"),
        ("Linux", "Linux"),
        ("Android", "Android"),
        ("iPhone|iPad|iPod", "iOS"),
    ]
    .into_iter()
    .map(|(pattern, os)| (ci(pattern), os))
    .collect()
});

static CHROME: LazyLock<Regex> = LazyLock::new(|| ci("Chrome"));
static EDGE: LazyLock<Regex> = LazyLock::new(|| ci("Edge"));
static FIREFOX: LazyLock<Regex> = LazyLock::new(|| ci("Firefox"));
static SAFARI: LazyLock<Regex> = LazyLock::new(|| ci("Safari"));

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("valid regex")
}

pub const TABLET_MIN_WIDTH: u32 = 768;
pub const DESKTOP_MIN_WIDTH: u32 = 1200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Laptop,
    Desktop,
}

impl DeviceType {
    pub fn label(self) -> &'static str {
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
            DeviceType::Laptop => "Laptop",
            DeviceType::Desktop => "Desktop",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub os: String,
    pub browser: String,
    pub screen_size: String,
    pub is_online: bool,
    pub last_seen: String,
}

/// What the browser can tell us that the user agent cannot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClientHints {
    pub screen: Option<(u32, u32)>,
    pub touch: bool,
}

impl ClientHints {
    /// Parse a `WIDTHxHEIGHT` screen string. Anything else is ignored.
    pub fn parse_screen(raw: &str) -> Option<(u32, u32)> {
        let (w, h) = raw.trim().split_once(['x', 'X'])?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

pub fn detect_device_type(user_agent: &str, hints: ClientHints) -> DeviceType {
    let width = hints.screen.map(|(w, _)| w);

    if MOBILE_UA.is_match(user_agent) {
        let wide_touch = hints.touch && width.is_some_and(|w| w >= TABLET_MIN_WIDTH);
        if IPAD_UA.is_match(user_agent) || wide_touch {
            return DeviceType::Tablet;
        }
        return DeviceType::Mobile;
    }

    match width {
        // Without a reported screen the device is assumed to be a desktop.
        None => DeviceType::Desktop,
        Some(w) if w < DESKTOP_MIN_WIDTH => DeviceType::Laptop,
        Some(_) => DeviceType::Desktop,
    }
}

pub fn detect_os(user_agent: &str) -> &'static str {
    OS_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(user_agent))
        .map_or("Unknown", |(_, os)| *os)
}

pub fn detect_browser(user_agent: &str) -> &'static str {
    let chrome = CHROME.is_match(user_agent);
    if chrome && !EDGE.is_match(user_agent) {
        "Chrome"
    } else if FIREFOX.is_match(user_agent) {
        "Firefox"
    } else if SAFARI.is_match(user_agent) && !chrome {
        "Safari"
    } else if EDGE.is_match(user_agent) {
        "Edge"
    } else {
        "Unknown"
    }
}

/// Describe the device that sent the request.
pub fn current_device(user_agent: &str, hints: ClientHints, now: DateTime<Local>) -> Device {
    let device_type = detect_device_type(user_agent, hints);
    let os = detect_os(user_agent);

    Device {
        id: "current-device".to_string(),
        name: format!("{os} {}", device_type.label()),
        device_type,
        os: os.to_string(),
        browser: detect_browser(user_agent).to_string(),
        screen_size: hints
            .screen
            .map_or_else(|| "unknown".to_string(), |(w, h)| format!("{w}x{h}")),
        is_online: true,
        last_seen: now.format("%H:%M:%S").to_string(),
    }
}

// (id, name, type, os, browser, screen, online, last seen)
#[rustfmt::skip]
const DEMO_DEVICES: [(&str, &str, DeviceType, &str, &str, &str, bool, &str); 3] = [
    ("device-1", "iPhone 14 Pro", DeviceType::Mobile, "iOS", "Safari", "393x852", true, "2 minutes ago"),
    ("device-2", "MacBook Pro", DeviceType::Laptop, "macOS", "Chrome", "1440x900", false, "15 minutes ago"),
    ("device-3", "Samsung Galaxy S23", DeviceType::Mobile, "Android", "Chrome", "360x780", true, "Just now"),
];

/// Demo devices shown next to the current one.
pub fn mock_devices() -> Vec<Device> {
    DEMO_DEVICES
        .iter()
        .map(|&(id, name, device_type, os, browser, screen, is_online, seen)| Device {
            id: id.to_string(),
            name: name.to_string(),
            device_type,
            os: os.to_string(),
            browser: browser.to_string(),
            screen_size: screen.to_string(),
            is_online,
            last_seen: seen.to_string(),
        })
        .collect()
}

/// The current device first, then the demo devices.
pub fn connected_devices(current: Device) -> Vec<Device> {
    std::iter::once(current).chain(mock_devices()).collect()
}
