use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, SecondsFormat, Timelike};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const TEMP_MIN: f64 = 28.0;
pub const TEMP_MAX: f64 = 85.0;
pub const MEMORY_TOTAL_GB: f64 = 16.0;
pub const STORAGE_TOTAL_GB: f64 = 512.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CpuMetrics {
    pub usage: f64,
    pub cores: usize,
    pub temperature: f64,
    pub speed: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacityMetrics {
    pub used: f64,
    pub total: f64,
    pub available: f64,
    pub usage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub download: u32,
    pub upload: u32,
    pub latency: u32,
    pub connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMetrics {
    pub threats: u32,
    pub firewall: bool,
    pub antivirus: bool,
    pub updates: bool,
    pub last_scan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub name: String,
    pub cpu: f64,
    pub memory: f64,
    pub pid: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetrics {
    pub total: u32,
    pub top_processes: Vec<ProcessInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub category: String,
    pub memory_usage: u32,
    pub cpu_usage: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserMetrics {
    pub tabs: Vec<BrowserTab>,
    pub total_memory: u32,
    pub total_cpu: f64,
    pub tab_count: usize,
}

/// One synthetic snapshot of the "machine".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub cpu: CpuMetrics,
    pub memory: CapacityMetrics,
    pub network: NetworkMetrics,
    pub storage: CapacityMetrics,
    pub security: SecurityMetrics,
    pub processes: ProcessMetrics,
    pub browser: BrowserMetrics,
    pub sampled_at: String,
}

/// Anything that can produce a metrics snapshot. A reader of real OS
/// counters can replace [`SyntheticMetrics`] without touching the routes.
pub trait MetricsSource: Send + Sync {
    fn sample(&self) -> SystemMetrics;
}

/// Pseudo-random generator shaped by time of day.
#[derive(Debug, Clone, Default)]
pub struct SyntheticMetrics;

// (name, pid, cpu base, cpu spread, memory base, memory spread)
const TOP_PROCESSES: [(&str, u32, f64, f64, f64, f64); 5] = [
    ("chrome.exe", 1234, 5.0, 15.0, 100.0, 200.0),
    ("node.exe", 5678, 3.0, 10.0, 50.0, 150.0),
    ("explorer.exe", 9012, 1.0, 5.0, 50.0, 100.0),
    ("System", 3456, 2.0, 8.0, 40.0, 80.0),
    ("Windows Security", 7890, 1.0, 3.0, 30.0, 60.0),
];

// (title, url, category, base memory, base cpu)
#[rustfmt::skip]
const TAB_TEMPLATES: [(&str, &str, &str, f64, f64); 15] = [
    ("System Monitor AI - Dashboard", "http://localhost:5174/dashboard", "Development", 45.0, 3.5),
    ("GitHub - Repository", "https://github.com/microsoft/vscode", "Development", 35.0, 2.8),
    ("Stack Overflow - React Hooks Question", "https://stackoverflow.com/questions/react-hooks", "Development", 28.0, 1.5),
    ("YouTube - React Tutorial", "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "Media", 120.0, 15.2),
    ("Gmail - Inbox (3)", "https://mail.google.com/mail/u/0/#inbox", "Communication", 32.0, 1.8),
    ("Facebook - Home", "https://www.facebook.com/home", "Social", 85.0, 8.5),
    ("Twitter / X - Timeline", "https://twitter.com/home", "Social", 42.0, 4.2),
    ("Amazon - Shopping Cart", "https://www.amazon.com/cart", "Shopping", 38.0, 2.1),
    ("Netflix - Continue Watching", "https://www.netflix.com/browse", "Media", 95.0, 12.8),
    ("LinkedIn - Feed", "https://www.linkedin.com/feed", "Professional", 48.0, 3.2),
    ("Reddit - Popular", "https://www.reddit.com/r/popular", "Social", 55.0, 5.5),
    ("Google Docs - Untitled Document", "https://docs.google.com/document/d/1234567890/edit", "Productivity", 62.0, 4.8),
    ("Spotify - Web Player", "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M", "Media", 75.0, 6.2),
    ("Discord - General Chat", "https://discord.com/channels/1234567890/1234567890", "Communication", 68.0, 7.1),
    ("WhatsApp Web", "https://web.whatsapp.com/", "Communication", 52.0, 3.8),
];

impl MetricsSource for SyntheticMetrics {
    fn sample(&self) -> SystemMetrics {
        self.sample_at(Local::now())
    }
}

impl SyntheticMetrics {
    pub fn sample_at(&self, now: DateTime<Local>) -> SystemMetrics {
        let mut rng = rand::rng();
        let hour = now.hour();
        let business_hours = (10..=16).contains(&hour);

        let base_cpu: f64 = if business_hours { 25.0 } else { 15.0 };
        let base_memory: f64 = if business_hours { 60.0 } else { 40.0 };

        let cpu_usage = (base_cpu + rng.random_range(-10.0..10.0)).clamp(5.0, 95.0);
        let afternoon = if (15..=17).contains(&hour) { 3.0 } else { 0.0 };
        let jitter: f64 = rng.random_range(-2.0..2.0);
        let temperature =
            (32.0 + cpu_usage / 100.0 * 25.0 + afternoon + jitter).clamp(TEMP_MIN, TEMP_MAX);

        let memory_usage: f64 = base_memory + rng.random_range(0.0..20.0);
        let memory_used = MEMORY_TOTAL_GB * memory_usage / 100.0;

        let storage_used: f64 = rng.random_range(100.0..300.0);

        let scan_age = chrono::Duration::seconds(rng.random_range(0..86_400));

        let top_processes: Vec<ProcessInfo> = TOP_PROCESSES
            .iter()
            .map(|&(name, pid, cpu, cpu_spread, mem, mem_spread)| ProcessInfo {
                name: name.to_string(),
                cpu: cpu + rng.random_range(0.0..cpu_spread),
                memory: mem + rng.random_range(0.0..mem_spread),
                pid,
            })
            .collect();

        SystemMetrics {
            cpu: CpuMetrics {
                usage: cpu_usage,
                cores: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8),
                temperature: (temperature * 10.0).round() / 10.0,
                speed: 2.4 + rng.random_range(0.0..1.6),
                status: performance_status(cpu_usage).to_string(),
            },
            memory: CapacityMetrics {
                used: memory_used,
                total: MEMORY_TOTAL_GB,
                available: MEMORY_TOTAL_GB - memory_used,
                usage: memory_usage,
            },
            network: NetworkMetrics {
                download: rng.random_range(50..150),
                upload: rng.random_range(20..70),
                latency: rng.random_range(10..60),
                connections: rng.random_range(10..60),
            },
            storage: CapacityMetrics {
                used: storage_used,
                total: STORAGE_TOTAL_GB,
                available: STORAGE_TOTAL_GB - storage_used,
                usage: storage_used / STORAGE_TOTAL_GB * 100.0,
            },
            security: SecurityMetrics {
                threats: rng.random_range(0..=2),
                firewall: true,
                antivirus: true,
                updates: rng.random_bool(0.7),
                last_scan: (now - scan_age).to_rfc3339_opts(SecondsFormat::Secs, false),
            },
            processes: ProcessMetrics { total: rng.random_range(50..150), top_processes },
            browser: browser_metrics(&mut rng),
            sampled_at: now.to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

fn browser_metrics(rng: &mut impl Rng) -> BrowserMetrics {
    let mut templates = TAB_TEMPLATES.to_vec();
    templates.shuffle(rng);
    let count = rng.random_range(3..=8);

    let tabs: Vec<BrowserTab> = templates
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, (title, url, category, mem, cpu))| BrowserTab {
            id: (i + 1).to_string(),
            title: title.to_string(),
            url: url.to_string(),
            domain: domain_of(url),
            category: category.to_string(),
            memory_usage: (mem + rng.random_range(-10.0..10.0)).floor().max(10.0) as u32,
            cpu_usage: (cpu + rng.random_range(-1.0..1.0)).max(0.1),
            is_active: i == 0,
        })
        .collect();

    BrowserMetrics {
        total_memory: tabs.iter().map(|t| t.memory_usage).sum(),
        total_cpu: tabs.iter().map(|t| t.cpu_usage).sum(),
        tab_count: tabs.len(),
        tabs,
    }
}

fn domain_of(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    let host = rest.split(['/', ':', '?', '#']).next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

pub fn performance_status(usage: f64) -> &'static str {
    if usage < 50.0 {
        "Excellent"
    } else if usage < 75.0 {
        "Good"
    } else if usage < 90.0 {
        "Warning"
    } else {
        "Critical"
    }
}

/// Holds the latest snapshot and refreshes it on demand or on a timer.
#[derive(Clone)]
pub struct MetricsManager {
    source: Arc<dyn MetricsSource>,
    inner: Arc<RwLock<SystemMetrics>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new(Arc::new(SyntheticMetrics))
    }
}

impl MetricsManager {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        let first = source.sample();
        Self { source, inner: Arc::new(RwLock::new(first)) }
    }

    pub async fn get_metrics(&self) -> SystemMetrics {
        self.inner.read().await.clone()
    }

    pub async fn refresh(&self) -> SystemMetrics {
        let snapshot = self.source.sample();
        *self.inner.write().await = snapshot.clone();
        snapshot
    }

    /// Refresh every `period` until the returned ticker is cancelled or dropped.
    pub fn spawn_ticker(&self, period: Duration) -> MetricsTicker {
        let token = CancellationToken::new();
        let manager = self.clone();
        let cancel = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        manager.refresh().await;
                        debug!("metrics refreshed");
                    }
                }
            }
            info!("metrics ticker stopped");
        });

        MetricsTicker { token, handle: Some(handle) }
    }
}

pub struct MetricsTicker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl MetricsTicker {
    /// Cancel and wait for the refresh loop to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for MetricsTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
