//! Clinic schedule configuration.
//!
//! Each clinic has a schedule document (rooms, weekly hours, snapping
//! granularities) that arrives asynchronously. Until it does, the resolver
//! serves frozen defaults: an in-flight drag must never see granularity
//! values flip from a committed value back to "unknown", only the single
//! transition default -> loaded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::clinic::ClinicConfig;

fn default_create_granularity() -> u32 {
    5
}

fn default_move_granularity() -> u32 {
    1
}

fn default_slot_duration() -> u32 {
    15
}

/// Which kind of gesture is asking for a snapping step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Placing a new appointment on an empty slot.
    Create,
    /// Repositioning an existing appointment.
    Move,
}

/// Per-clinic snapping configuration.
///
/// Moves default to 1 minute for maximum repositioning precision; creation
/// snaps coarser so new bookings land on tidy times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularitySettings {
    #[serde(default = "default_create_granularity")]
    pub create_granularity: u32,
    #[serde(default = "default_move_granularity")]
    pub move_granularity: u32,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u32,
}

impl GranularitySettings {
    pub fn granularity_for(&self, kind: GestureKind) -> u32 {
        match kind {
            GestureKind::Create => self.create_granularity.max(1),
            GestureKind::Move => self.move_granularity.max(1),
        }
    }
}

impl Default for GranularitySettings {
    fn default() -> Self {
        Self {
            create_granularity: default_create_granularity(),
            move_granularity: default_move_granularity(),
            slot_duration_minutes: default_slot_duration(),
        }
    }
}

/// The full per-clinic schedule document as fetched from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(flatten)]
    pub clinic: ClinicConfig,
    #[serde(default)]
    pub granularity: GranularitySettings,
}

/// Resolved granularity view handed to the UI each frame.
#[derive(Debug, Clone)]
pub struct ResolvedGranularity {
    pub settings: Arc<GranularitySettings>,
    pub is_loading: bool,
}

#[derive(Debug)]
enum ClinicEntry {
    /// Fetch in flight; defaults are served meanwhile.
    Pending,
    /// Document loaded; stays loaded for the rest of the session.
    Loaded(Arc<ClinicConfig>, Arc<GranularitySettings>),
    /// Fetch failed; defaults are served and no snap happens later.
    Failed,
}

struct FetchResult {
    clinic_id: String,
    document: Result<ScheduleDocument>,
}

/// Owns the async boundary between the schedule-document store and the UI
/// loop. `request` spawns a fetch, `poll` drains completions; both are cheap
/// enough to call every frame.
pub struct ScheduleConfigService {
    config_dir: PathBuf,
    runtime: tokio::runtime::Runtime,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
    entries: HashMap<String, ClinicEntry>,
    /// Shared default instance so consumers see a reference-stable value
    /// across frames while a fetch is pending.
    defaults: Arc<GranularitySettings>,
}

impl ScheduleConfigService {
    pub fn new(config_dir: PathBuf) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("Failed to start schedule config runtime")?;
        let (tx, rx) = channel();
        Ok(Self {
            config_dir,
            runtime,
            tx,
            rx,
            entries: HashMap::new(),
            defaults: Arc::new(GranularitySettings::default()),
        })
    }

    /// Begin loading the schedule document for `clinic_id` unless a fetch is
    /// already pending or resolved.
    pub fn request(&mut self, clinic_id: &str) {
        if self.entries.contains_key(clinic_id) {
            return;
        }
        self.entries
            .insert(clinic_id.to_string(), ClinicEntry::Pending);

        let path = self.config_dir.join(format!("{clinic_id}.json"));
        let tx = self.tx.clone();
        let clinic_id = clinic_id.to_string();
        log::info!("Loading schedule config for clinic '{clinic_id}' from {path:?}");
        self.runtime.spawn(async move {
            let document = load_document(&path).await;
            // Receiver dropping just means the app is shutting down.
            let _ = tx.send(FetchResult {
                clinic_id,
                document,
            });
        });
    }

    /// Drain completed fetches into the entry table. Called once per frame.
    pub fn poll(&mut self) {
        while let Ok(result) = self.rx.try_recv() {
            match result.document {
                Ok(doc) => {
                    log::info!(
                        "Schedule config loaded for clinic '{}' ({} rooms)",
                        result.clinic_id,
                        doc.clinic.rooms.len()
                    );
                    self.entries.insert(
                        result.clinic_id,
                        ClinicEntry::Loaded(Arc::new(doc.clinic), Arc::new(doc.granularity)),
                    );
                }
                Err(err) => {
                    log::error!(
                        "Schedule config for clinic '{}' failed to load: {err:#}",
                        result.clinic_id
                    );
                    self.entries.insert(result.clinic_id, ClinicEntry::Failed);
                }
            }
        }
    }

    /// Granularity settings for a clinic; frozen defaults while loading.
    pub fn resolve(&self, clinic_id: &str) -> ResolvedGranularity {
        match self.entries.get(clinic_id) {
            Some(ClinicEntry::Loaded(_, granularity)) => ResolvedGranularity {
                settings: Arc::clone(granularity),
                is_loading: false,
            },
            Some(ClinicEntry::Pending) => ResolvedGranularity {
                settings: Arc::clone(&self.defaults),
                is_loading: true,
            },
            Some(ClinicEntry::Failed) | None => ResolvedGranularity {
                settings: Arc::clone(&self.defaults),
                is_loading: false,
            },
        }
    }

    /// Loaded clinic data (rooms/hours), if the document has arrived.
    pub fn clinic(&self, clinic_id: &str) -> Option<Arc<ClinicConfig>> {
        match self.entries.get(clinic_id) {
            Some(ClinicEntry::Loaded(clinic, _)) => Some(Arc::clone(clinic)),
            _ => None,
        }
    }

    /// Install an already-available document (startup seed, tests).
    pub fn insert_loaded(&mut self, document: ScheduleDocument) {
        self.entries.insert(
            document.clinic.id.clone(),
            ClinicEntry::Loaded(
                Arc::new(document.clinic),
                Arc::new(document.granularity),
            ),
        );
    }
}

async fn load_document(path: &std::path::Path) -> Result<ScheduleDocument> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read schedule document {path:?}"))?;
    let document: ScheduleDocument = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse schedule document {path:?}"))?;
    Ok(document)
}
