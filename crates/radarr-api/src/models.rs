use serde::{Deserialize, Serialize};

// --- Movies ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub sort_title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub tmdb_id: i64,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub root_folder_path: String,
    #[serde(default)]
    pub size_on_disk: i64,
    #[serde(default)]
    pub runtime: i32,
    #[serde(default)]
    pub quality_profile_id: i64,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub in_cinemas: Option<String>,
    #[serde(default)]
    pub digital_release: Option<String>,
    #[serde(default)]
    pub physical_release: Option<String>,
}

// --- Queue ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadItem {
    pub id: i64,
    #[serde(default)]
    pub movie_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tracked_download_status: String,
    #[serde(default)]
    pub tracked_download_state: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub sizeleft: f64,
    #[serde(default)]
    pub timeleft: Option<String>,
    #[serde(default)]
    pub estimated_completion_time: Option<String>,
    #[serde(default)]
    pub download_client: String,
    #[serde(default)]
    pub download_id: Option<String>,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub indexer: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl DownloadItem {
    /// Fraction downloaded, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.size <= 0.0 {
            return 0.0;
        }
        ((self.size - self.sizeleft) / self.size).clamp(0.0, 1.0)
    }

    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
            || self.tracked_download_state.eq_ignore_ascii_case("imported")
    }

    pub fn is_failed(&self) -> bool {
        self.status.eq_ignore_ascii_case("failed")
            || self.tracked_download_status.eq_ignore_ascii_case("error")
            || self.tracked_download_state.eq_ignore_ascii_case("failedPending")
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed() && !self.is_failed()
    }
}

/// The download queue, with the filters callers usually want.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadItemCollection {
    items: Vec<DownloadItem>,
}

impl DownloadItemCollection {
    pub fn new(items: Vec<DownloadItem>) -> Self {
        Self { items }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DownloadItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[DownloadItem] {
        &self.items
    }

    pub fn active(&self) -> Self {
        self.filtered(DownloadItem::is_active)
    }

    pub fn completed(&self) -> Self {
        self.filtered(DownloadItem::is_completed)
    }

    pub fn failed(&self) -> Self {
        self.filtered(DownloadItem::is_failed)
    }

    /// Items closest to finishing first; ties broken by queue id.
    pub fn sort_by_priority(&self) -> Self {
        let mut items = self.items.clone();
        items.sort_by(|a, b| {
            b.progress()
                .total_cmp(&a.progress())
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { items }
    }

    fn filtered(&self, keep: impl Fn(&DownloadItem) -> bool) -> Self {
        Self {
            items: self.items.iter().filter(|&i| keep(i)).cloned().collect(),
        }
    }
}

impl From<Page<DownloadItem>> for DownloadItemCollection {
    fn from(page: Page<DownloadItem>) -> Self {
        Self::new(page.records)
    }
}

impl IntoIterator for DownloadItemCollection {
    type Item = DownloadItem;
    type IntoIter = std::vec::IntoIter<DownloadItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DownloadItemCollection {
    type Item = &'a DownloadItem;
    type IntoIter = std::slice::Iter<'a, DownloadItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// --- Paging ---

/// One page of a paged Radarr listing (`queue`, `history`, `wanted/missing`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub page_size: u32,
    pub total_records: u64,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub sort_direction: Option<String>,
    pub records: Vec<T>,
}

// --- System ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSummary {
    pub version: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub build_time: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub is_debug: bool,
    #[serde(default)]
    pub is_production: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_docker: bool,
    #[serde(default)]
    pub os_name: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub runtime_version: String,
    #[serde(default)]
    pub database_type: String,
    #[serde(default)]
    pub url_base: String,
    #[serde(default)]
    pub authentication: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub source: String,
    #[serde(rename = "type")]
    pub check_type: String,
    pub message: String,
    #[serde(default)]
    pub wiki_url: String,
}

impl HealthCheckResult {
    pub fn is_error(&self) -> bool {
        self.check_type.eq_ignore_ascii_case("error")
    }
}

// --- History ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: i64,
    pub movie_id: i64,
    #[serde(default)]
    pub source_title: String,
    pub event_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub download_id: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

// --- Commands ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandStatus {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub command_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub queued: Option<String>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub ended: Option<String>,
}
