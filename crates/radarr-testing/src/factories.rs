//! Radarr-shaped JSON payloads for seeding the fake.
//!
//! Every factory returns a `serde_json::Value` laid out the way the real
//! server sends it, so seeded responses travel through the same decoding
//! path as production ones. `*_with` variants shallow-merge an object of
//! overrides on top of the defaults.

use radarr_api::Endpoint;
use serde_json::{Map, Value, json};

const TITLES: [(&str, i32); 5] = [
    ("The Matrix", 1999),
    ("Inception", 2010),
    ("Interstellar", 2014),
    ("Arrival", 2016),
    ("Blade Runner 2049", 2017),
];

/// Merge top-level keys of `overrides` into `base`. Non-object overrides are ignored.
pub fn merge(mut base: Value, overrides: Value) -> Value {
    if let (Value::Object(base_map), Value::Object(over)) = (&mut base, overrides) {
        for (k, v) in over {
            base_map.insert(k, v);
        }
    }
    base
}

/// A paged envelope as returned by `queue`, `history` and `wanted/missing`.
pub fn page(records: Vec<Value>, page: u64, page_size: u64) -> Value {
    json!({
        "page": page,
        "pageSize": page_size,
        "sortKey": Value::Null,
        "sortDirection": "default",
        "totalRecords": records.len(),
        "records": records,
    })
}

pub struct MovieFactory;

impl MovieFactory {
    pub fn make(id: i64) -> Value {
        let (title, year) = TITLES[(id.unsigned_abs() as usize).wrapping_sub(1) % TITLES.len()];
        let slug = title.to_lowercase().replace(' ', "-");
        json!({
            "id": id,
            "title": title,
            "originalTitle": title,
            "sortTitle": title.to_lowercase(),
            "year": year,
            "status": "released",
            "overview": format!("Sample overview for {title}."),
            "monitored": true,
            "hasFile": true,
            "isAvailable": true,
            "tmdbId": id.saturating_add(600),
            "imdbId": format!("tt{:07}", id.saturating_add(100_000)),
            "path": format!("/movies/{slug} ({year})"),
            "rootFolderPath": "/movies",
            "sizeOnDisk": 4_294_967_296_i64,
            "runtime": 120,
            "qualityProfileId": 1,
            "genres": ["Science Fiction"],
            "tags": [],
            "added": "2024-01-01T00:00:00Z",
        })
    }

    pub fn make_with(id: i64, overrides: Value) -> Value {
        merge(Self::make(id), overrides)
    }

    /// `count` movies with ids `1..=count`.
    pub fn make_many(count: usize) -> Vec<Value> {
        (1..=count as i64).map(Self::make).collect()
    }

    /// A monitored movie without a file, as listed by `wanted/missing`.
    pub fn missing(id: i64) -> Value {
        Self::make_with(id, json!({ "hasFile": false, "sizeOnDisk": 0 }))
    }
}

pub struct DownloadFactory;

impl DownloadFactory {
    /// Status cycles by id: downloading, completed, failed.
    pub fn make(id: i64) -> Value {
        let (status, tracked_status, tracked_state, sizeleft) = match id.rem_euclid(3) {
            1 => ("downloading", "ok", "downloading", 1_073_741_824_i64),
            2 => ("completed", "ok", "importPending", 0),
            _ => ("failed", "error", "failedPending", 2_147_483_648),
        };
        json!({
            "id": id,
            "movieId": id,
            "title": format!("Sample.Movie.{id}.2160p.WEB-DL"),
            "status": status,
            "trackedDownloadStatus": tracked_status,
            "trackedDownloadState": tracked_state,
            "size": 4_294_967_296_i64,
            "sizeleft": sizeleft,
            "timeleft": "00:10:00",
            "downloadClient": "Transmission",
            "downloadId": format!("hash{id:04}"),
            "protocol": "torrent",
            "indexer": "Sample Indexer",
            "errorMessage": Value::Null,
        })
    }

    pub fn make_with(id: i64, overrides: Value) -> Value {
        merge(Self::make(id), overrides)
    }

    pub fn make_many(count: usize) -> Vec<Value> {
        (1..=count as i64).map(Self::make).collect()
    }
}

pub struct SystemStatusFactory;

impl SystemStatusFactory {
    pub fn make() -> Value {
        json!({
            "appName": "Radarr",
            "instanceName": "Radarr",
            "version": "5.2.6.8376",
            "branch": "master",
            "buildTime": "2024-01-01T00:00:00Z",
            "startTime": "2024-01-02T00:00:00Z",
            "isDebug": false,
            "isProduction": true,
            "isAdmin": false,
            "isDocker": false,
            "osName": "ubuntu",
            "osVersion": "22.04",
            "runtimeVersion": "6.0.25",
            "databaseType": "sqLite",
            "urlBase": "",
            "authentication": "forms",
        })
    }

    pub fn make_with(overrides: Value) -> Value {
        merge(Self::make(), overrides)
    }
}

pub struct HistoryFactory;

impl HistoryFactory {
    pub fn make(id: i64) -> Value {
        let event = if id % 2 == 0 {
            "downloadFolderImported"
        } else {
            "grabbed"
        };
        json!({
            "id": id,
            "movieId": id,
            "sourceTitle": format!("Sample.Movie.{id}.1080p.BluRay"),
            "eventType": event,
            "date": "2024-01-01T00:00:00Z",
            "downloadId": format!("hash{id:04}"),
            "data": {},
        })
    }

    pub fn make_many(count: usize) -> Vec<Value> {
        (1..=count as i64).map(Self::make).collect()
    }
}

pub struct CommandFactory;

impl CommandFactory {
    pub fn make(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "commandName": name,
            "status": "queued",
            "result": "unknown",
            "trigger": "manual",
            "queued": "2024-01-01T00:00:00Z",
        })
    }
}

/// The built-in answer for `endpoint` when nothing was seeded.
///
/// `Value::Null` for endpoints this fake does not know.
pub fn default_response(endpoint: &str, args: &Map<String, Value>) -> Value {
    let int_arg = |key: &str, fallback: i64| {
        args.get(key).and_then(Value::as_i64).unwrap_or(fallback)
    };

    let Some(endpoint) = Endpoint::from_name(endpoint) else {
        return Value::Null;
    };

    match endpoint {
        Endpoint::Movies => Value::Array(MovieFactory::make_many(5)),
        Endpoint::Movie => MovieFactory::make(int_arg("id", 1)),
        Endpoint::Downloads => page(DownloadFactory::make_many(3), 1, 100),
        Endpoint::SystemSummary => SystemStatusFactory::make(),
        Endpoint::Calendar => {
            let release = args.get("start").cloned().unwrap_or(Value::Null);
            Value::Array(
                (1..=2)
                    .map(|id| {
                        MovieFactory::make_with(
                            id,
                            json!({ "inCinemas": release.clone(), "digitalRelease": release.clone() }),
                        )
                    })
                    .collect(),
            )
        }
        Endpoint::History => {
            let (page_no, size) = (int_arg("page", 1), int_arg("pageSize", 20));
            let records = HistoryFactory::make_many(size.clamp(0, 3) as usize);
            page(records, page_no as u64, size as u64)
        }
        Endpoint::Wanted => {
            let (page_no, size) = (int_arg("page", 1), int_arg("pageSize", 20));
            let records = (1..=size.clamp(0, 2)).map(MovieFactory::missing).collect();
            page(records, page_no as u64, size as u64)
        }
        Endpoint::Command => {
            let name = args.get("name").and_then(Value::as_str).unwrap_or("Unknown");
            CommandFactory::make(1, name)
        }
        Endpoint::Health => Value::Array(Vec::new()),
    }
}
