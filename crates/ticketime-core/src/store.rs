//! Persistent ticket store.
//!
//! One JSON document under `.ticketime/tickets.json` owns every ticket
//! together with its cached [`DeadlineSet`] and [`CompletionState`]. The
//! deadline engine is only consulted on create, reset, and reschedule; reads
//! return the cached values.
//!
//! Mutations follow a load → modify → write-temp → rename cycle under an
//! exclusive [`StoreLock`]. A failed operation never writes, so a rejected
//! reschedule leaves the previous deadline set in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::config::STATE_DIR;
use crate::countdown::Countdown;
use crate::engine::DeadlineEngine;
use crate::error::{DeadlineError, ErrorCode};
use crate::lock::{DEFAULT_LOCK_TIMEOUT, LockError, StoreLock, StoreReadLock};
use crate::model::{
    Category, CompletionState, DeadlineKind, DeadlineSet, Ticket, TicketDraft, derive_ticket_id,
};

pub const STORE_FILE: &str = "tickets.json";
pub const LOCK_FILE: &str = "lock";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("ticket store not initialized at {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt ticket store {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode ticket store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("ticket not found: {0}")]
    NotFound(String),

    #[error("ambiguous ticket id '{key}' matches {}", matches.join(", "))]
    Ambiguous { key: String, matches: Vec<String> },

    #[error("duplicate ticket number: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Deadline(#[from] DeadlineError),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized(_) => ErrorCode::NotInitialized,
            Self::Io(_) | Self::Encode(_) => ErrorCode::StoreWriteFailed,
            Self::Corrupt { .. } => ErrorCode::StoreCorrupt,
            Self::Lock(err) => err.code(),
            Self::NotFound(_) => ErrorCode::TicketNotFound,
            Self::Ambiguous { .. } => ErrorCode::AmbiguousId,
            Self::Duplicate(_) => ErrorCode::DuplicateTicket,
            Self::Deadline(err) => err.code(),
        }
    }
}

/// A ticket with its cached deadlines and completion flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEntry {
    pub ticket: Ticket,
    /// Absent for Special tickets until they are scheduled.
    #[serde(default)]
    pub deadlines: Option<DeadlineSet>,
    #[serde(default)]
    pub completed: CompletionState,
}

impl TicketEntry {
    #[must_use]
    pub fn deadline(&self, kind: DeadlineKind) -> Option<DateTime<Utc>> {
        self.deadlines.map(|set| set.get(kind))
    }

    /// Countdown for every deadline, in display order.
    #[must_use]
    pub fn countdowns(&self, now: DateTime<Utc>) -> Vec<(DeadlineKind, Countdown)> {
        DeadlineKind::ALL
            .into_iter()
            .map(|kind| {
                let countdown =
                    Countdown::evaluate(self.deadline(kind), self.completed.is_completed(kind), now);
                (kind, countdown)
            })
            .collect()
    }

    /// True when the case expiration has passed without being checked off.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        Countdown::evaluate(
            self.deadline(DeadlineKind::CaseExpiration),
            self.completed.case_expiration,
            now,
        )
        .is_expired()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    tickets: Vec<TicketEntry>,
}

/// Sort orders offered by listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NumberAsc,
    NumberDesc,
    CreatedAsc,
    CreatedDesc,
}

impl FromStr for SortOrder {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "number" | "number-asc" => Ok(Self::NumberAsc),
            "number-desc" => Ok(Self::NumberDesc),
            "created" | "created-asc" => Ok(Self::CreatedAsc),
            "created-desc" => Ok(Self::CreatedDesc),
            _ => Err(DeadlineError::Validation(format!(
                "unknown sort '{s}' (expected number[-desc] or created[-desc])"
            ))),
        }
    }
}

/// Filters for [`TicketStore::list`]. Empty query lists everything in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub category: Option<Category>,
    /// Case-insensitive substring of the ticket number.
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
}

impl ListQuery {
    fn matches(&self, entry: &TicketEntry) -> bool {
        if self.category.is_some_and(|c| c != entry.ticket.category) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                entry.ticket.number_key().contains(&needle.to_lowercase())
            }
            _ => true,
        }
    }
}

/// Per-category counts for the stats view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub fault: usize,
    pub requirement: usize,
    pub special: usize,
    pub unscheduled: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone)]
pub struct TicketStore {
    state_dir: PathBuf,
    engine: DeadlineEngine,
}

impl TicketStore {
    /// Create the state directory and an empty store if missing.
    pub fn init(project_root: &Path, engine: DeadlineEngine) -> Result<Self, StoreError> {
        let store = Self::at(project_root, engine);
        fs::create_dir_all(&store.state_dir)?;
        let _lock = StoreLock::acquire(&store.lock_path(), DEFAULT_LOCK_TIMEOUT)?;
        if !store.data_path().exists() {
            store.write(&StoreDocument {
                version: FORMAT_VERSION,
                tickets: Vec::new(),
            })?;
            info!(path = %store.data_path().display(), "initialized ticket store");
        }
        Ok(store)
    }

    /// Open an existing store.
    pub fn open(project_root: &Path, engine: DeadlineEngine) -> Result<Self, StoreError> {
        let store = Self::at(project_root, engine);
        if !store.data_path().exists() {
            return Err(StoreError::NotInitialized(store.state_dir));
        }
        Ok(store)
    }

    fn at(project_root: &Path, engine: DeadlineEngine) -> Self {
        Self {
            state_dir: project_root.join(STATE_DIR),
            engine,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &DeadlineEngine {
        &self.engine
    }

    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.state_dir.join(STORE_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE)
    }

    /// Validate `draft`, compute its deadlines, and persist it.
    ///
    /// A Special draft carrying a schedule must schedule strictly after `now`.
    pub fn create(&self, draft: TicketDraft, now: DateTime<Utc>) -> Result<TicketEntry, StoreError> {
        self.mutate(|doc| {
            let key = draft.ticket_number.trim().to_lowercase();
            if let Some(existing) = doc.tickets.iter().find(|e| e.ticket.number_key() == key) {
                warn!(ticket = %existing.ticket.ticket_number, "duplicate ticket number rejected");
                return Err(StoreError::Duplicate(existing.ticket.ticket_number.clone()));
            }

            let id = unique_id(doc, &key, now);
            let ticket = draft.into_ticket(id, self.engine.calendar())?;
            let deadlines = match ticket.scheduled_follow_up {
                Some(scheduled) => Some(self.engine.reschedule(&ticket, scheduled, now)?),
                None if ticket.category == Category::Special => None,
                None => Some(self.engine.compute_deadlines(&ticket)?),
            };

            let entry = TicketEntry {
                ticket,
                deadlines,
                completed: CompletionState::default(),
            };
            info!(
                id = %entry.ticket.id,
                ticket = %entry.ticket.ticket_number,
                category = %entry.ticket.category,
                "created ticket"
            );
            doc.tickets.push(entry.clone());
            Ok(entry)
        })
    }

    /// Look a ticket up by id, unique id prefix, or ticket number.
    pub fn get(&self, key: &str) -> Result<TicketEntry, StoreError> {
        let doc = self.read()?;
        let index = resolve(&doc, key)?;
        Ok(doc.tickets[index].clone())
    }

    pub fn list(&self, query: &ListQuery) -> Result<Vec<TicketEntry>, StoreError> {
        let doc = self.read()?;
        let mut entries: Vec<TicketEntry> =
            doc.tickets.into_iter().filter(|e| query.matches(e)).collect();

        match query.sort {
            Some(SortOrder::NumberAsc) => entries.sort_by_key(|e| e.ticket.number_key()),
            Some(SortOrder::NumberDesc) => {
                entries.sort_by_key(|e| std::cmp::Reverse(e.ticket.number_key()));
            }
            Some(SortOrder::CreatedAsc) => entries.sort_by_key(|e| e.ticket.case_created_at),
            Some(SortOrder::CreatedDesc) => {
                entries.sort_by_key(|e| std::cmp::Reverse(e.ticket.case_created_at));
            }
            None => {}
        }
        Ok(entries)
    }

    /// Delete a ticket together with its deadlines and flags.
    pub fn remove(&self, key: &str) -> Result<TicketEntry, StoreError> {
        self.mutate(|doc| {
            let index = resolve(doc, key)?;
            let entry = doc.tickets.remove(index);
            info!(id = %entry.ticket.id, ticket = %entry.ticket.ticket_number, "removed ticket");
            Ok(entry)
        })
    }

    pub fn set_completed(
        &self,
        key: &str,
        kind: DeadlineKind,
        completed: bool,
    ) -> Result<TicketEntry, StoreError> {
        self.mutate(|doc| {
            let index = resolve(doc, key)?;
            let entry = &mut doc.tickets[index];
            if entry.deadlines.is_none() {
                return Err(missing_schedule(&entry.ticket).into());
            }
            entry.completed.set(kind, completed);
            debug!(id = %entry.ticket.id, deadline = %kind, completed, "updated completion flag");
            Ok(entry.clone())
        })
    }

    /// Recompute the recurring follow-up from `now` and clear its flag.
    pub fn reset_recurring(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<TicketEntry, StoreError> {
        self.mutate(|doc| {
            let index = resolve(doc, key)?;
            let entry = &mut doc.tickets[index];
            let current = entry
                .deadlines
                .ok_or_else(|| missing_schedule(&entry.ticket))?;
            let recurring = self.engine.reset_recurring(&entry.ticket, now)?;

            entry.deadlines = Some(current.with_recurring(recurring));
            entry.completed.recurring_follow_up = false;
            info!(id = %entry.ticket.id, %recurring, "reset recurring follow-up");
            Ok(entry.clone())
        })
    }

    /// Move a Special ticket's follow-up and replace its whole deadline set.
    ///
    /// All completion flags are cleared since every deadline moves.
    pub fn reschedule(
        &self,
        key: &str,
        scheduled: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<TicketEntry, StoreError> {
        self.mutate(|doc| {
            let index = resolve(doc, key)?;
            let entry = &mut doc.tickets[index];
            let deadlines = self.engine.reschedule(&entry.ticket, scheduled, now)?;

            entry.ticket.scheduled_follow_up = Some(scheduled);
            entry.deadlines = Some(deadlines);
            entry.completed.clear();
            info!(id = %entry.ticket.id, %scheduled, "rescheduled ticket");
            Ok(entry.clone())
        })
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<TicketStats, StoreError> {
        let doc = self.read()?;
        let mut stats = TicketStats::default();
        for entry in &doc.tickets {
            stats.total += 1;
            match entry.ticket.category {
                Category::Fault => stats.fault += 1,
                Category::Requirement => stats.requirement += 1,
                Category::Special => stats.special += 1,
            }
            if entry.deadlines.is_none() {
                stats.unscheduled += 1;
            }
            if entry.is_overdue(now) {
                stats.overdue += 1;
            }
        }
        Ok(stats)
    }

    fn read(&self) -> Result<StoreDocument, StoreError> {
        let _lock = StoreReadLock::acquire(&self.lock_path(), DEFAULT_LOCK_TIMEOUT)?;
        self.load()
    }

    fn mutate<R>(
        &self,
        apply: impl FnOnce(&mut StoreDocument) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path(), DEFAULT_LOCK_TIMEOUT)?;
        let mut doc = self.load()?;
        let result = apply(&mut doc)?;
        self.write(&doc)?;
        Ok(result)
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        let path = self.data_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotInitialized(self.state_dir.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt { path, source })
    }

    fn write(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let path = self.data_path();
        let tmp = path.with_extension("json.tmp");
        let doc = StoreDocument {
            version: FORMAT_VERSION,
            tickets: doc.tickets.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&doc).map_err(StoreError::Encode)?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn missing_schedule(ticket: &Ticket) -> DeadlineError {
    DeadlineError::MissingSchedule {
        ticket_number: ticket.ticket_number.clone(),
        category: ticket.category,
    }
}

fn unique_id(doc: &StoreDocument, number_key: &str, now: DateTime<Utc>) -> String {
    let mut salt = 0_u64;
    loop {
        let id = derive_ticket_id(number_key, now, salt);
        if !doc.tickets.iter().any(|e| e.ticket.id == id) {
            return id;
        }
        salt += 1;
    }
}

fn resolve(doc: &StoreDocument, key: &str) -> Result<usize, StoreError> {
    let key = key.trim();
    if let Some(index) = doc.tickets.iter().position(|e| e.ticket.id == key) {
        return Ok(index);
    }

    let lowered = key.to_lowercase();
    if let Some(index) = doc
        .tickets
        .iter()
        .position(|e| e.ticket.number_key() == lowered)
    {
        return Ok(index);
    }

    let prefix = if lowered.starts_with("tk-") {
        lowered
    } else {
        format!("tk-{lowered}")
    };
    let matches: Vec<usize> = doc
        .tickets
        .iter()
        .enumerate()
        .filter(|(_, e)| !key.is_empty() && e.ticket.id.starts_with(&prefix))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(StoreError::NotFound(key.to_string())),
        _ => Err(StoreError::Ambiguous {
            key: key.to_string(),
            matches: matches
                .iter()
                .map(|i| doc.tickets[*i].ticket.id.clone())
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid rfc3339")
            .with_timezone(&Utc)
    }

    fn store() -> (TempDir, TicketStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = TicketStore::init(dir.path(), DeadlineEngine::default()).expect("init");
        (dir, store)
    }

    fn draft(number: &str, category: &str, case: &str) -> TicketDraft {
        TicketDraft {
            ticket_number: number.to_string(),
            category: category.to_string(),
            case_created_at: case.to_string(),
            task_created_at: case.to_string(),
            scheduled_follow_up: None,
        }
    }

    #[test]
    fn open_requires_init() {
        let dir = TempDir::new().expect("tempdir");
        let err = TicketStore::open(dir.path(), DeadlineEngine::default()).expect_err("missing");
        assert!(matches!(err, StoreError::NotInitialized(_)));
        assert_eq!(err.code(), ErrorCode::NotInitialized);
    }

    #[test]
    fn init_is_idempotent() {
        let (dir, store) = store();
        let now = at("2024-01-02T09:00:00-05:00");
        store
            .create(draft("INC-1", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        let again = TicketStore::init(dir.path(), DeadlineEngine::default()).expect("re-init");
        assert_eq!(again.list(&ListQuery::default()).expect("list").len(), 1);
    }

    #[test]
    fn create_computes_and_persists_deadlines() {
        let (dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let created = store
            .create(draft("INC-1", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        let set = created.deadlines.expect("fault deadlines");
        assert_eq!(set.case_expiration, at("2024-01-02T11:00:00-05:00"));

        let reopened = TicketStore::open(dir.path(), DeadlineEngine::default()).expect("open");
        let fetched = reopened.get(&created.ticket.id).expect("get");
        assert_eq!(fetched, created);
    }

    #[test]
    fn duplicate_ticket_numbers_are_case_insensitive() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        store
            .create(draft("INC-1", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        let err = store
            .create(draft(" inc-1 ", "requirement", "2024-01-02T09:00:00-05:00"), now)
            .expect_err("duplicate");
        assert!(matches!(err, StoreError::Duplicate(ref n) if n == "INC-1"));
        assert_eq!(store.list(&ListQuery::default()).expect("list").len(), 1);
    }

    #[test]
    fn invalid_draft_is_not_persisted() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let err = store
            .create(draft("INC-1", "outage", "2024-01-02T09:00:00-05:00"), now)
            .expect_err("bad category");
        assert_eq!(err.code(), ErrorCode::InvalidCategory);
        let err = store
            .create(draft("INC-2", "fault", "noon-ish"), now)
            .expect_err("bad timestamp");
        assert_eq!(err.code(), ErrorCode::InvalidTimestamp);
        assert!(store.list(&ListQuery::default()).expect("list").is_empty());
    }

    #[test]
    fn special_ticket_starts_unscheduled() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let entry = store
            .create(draft("SP-1", "special", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        assert!(entry.deadlines.is_none());
        assert_eq!(
            entry.countdowns(now)[0].1,
            Countdown::Unscheduled
        );

        let err = store.reset_recurring("SP-1", now).expect_err("unscheduled");
        assert_eq!(err.code(), ErrorCode::MissingSchedule);
        let err = store
            .set_completed("SP-1", DeadlineKind::ClientFollowUp, true)
            .expect_err("unscheduled");
        assert_eq!(err.code(), ErrorCode::MissingSchedule);
    }

    #[test]
    fn special_draft_with_past_schedule_is_rejected() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let mut special = draft("SP-1", "special", "2024-01-02T09:00:00-05:00");
        special.scheduled_follow_up = Some("2024-01-02T09:00:00-05:00".to_string());
        let err = store.create(special, now).expect_err("past schedule");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn reschedule_replaces_set_and_clears_flags() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let mut special = draft("SP-1", "special", "2024-01-02T09:00:00-05:00");
        special.scheduled_follow_up = Some("2024-01-03T10:00:00-05:00".to_string());
        store.create(special, now).expect("create");
        store
            .set_completed("sp-1", DeadlineKind::InternalFollowUp, true)
            .expect("check");

        let moved = store
            .reschedule("SP-1", at("2024-01-04T10:00:00-05:00"), now)
            .expect("reschedule");
        let set = moved.deadlines.expect("scheduled");
        assert_eq!(set.case_expiration, at("2024-01-05T10:00:00-05:00"));
        assert_eq!(set.recurring_follow_up, at("2024-01-04T09:30:00-05:00"));
        assert_eq!(moved.completed, CompletionState::default());
        assert_eq!(
            moved.ticket.scheduled_follow_up,
            Some(at("2024-01-04T10:00:00-05:00"))
        );
    }

    #[test]
    fn rejected_reschedule_leaves_store_untouched() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let mut special = draft("SP-1", "special", "2024-01-02T09:00:00-05:00");
        special.scheduled_follow_up = Some("2024-01-03T10:00:00-05:00".to_string());
        let before = store.create(special, now).expect("create");

        let err = store
            .reschedule("SP-1", at("2024-01-01T10:00:00-05:00"), now)
            .expect_err("past");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(store.get("SP-1").expect("get"), before);
    }

    #[test]
    fn reschedule_of_fault_is_rejected() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        store
            .create(draft("INC-1", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        let err = store
            .reschedule("INC-1", at("2024-01-03T10:00:00-05:00"), now)
            .expect_err("fault");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn reset_replaces_only_recurring_and_clears_its_flag() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let created = store
            .create(draft("REQ-1", "requirement", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        store
            .set_completed("REQ-1", DeadlineKind::RecurringFollowUp, true)
            .expect("check recurring");
        store
            .set_completed("REQ-1", DeadlineKind::ClientFollowUp, true)
            .expect("check client");

        let reset = store
            .reset_recurring("REQ-1", at("2024-01-05T20:00:00-05:00"))
            .expect("reset");
        let before = created.deadlines.expect("set");
        let after = reset.deadlines.expect("set");
        assert_eq!(after.recurring_follow_up, at("2024-01-08T08:30:00-05:00"));
        assert_eq!(after.case_expiration, before.case_expiration);
        assert_eq!(after.client_follow_up, before.client_follow_up);
        assert!(!reset.completed.recurring_follow_up);
        assert!(reset.completed.client_follow_up);
    }

    #[test]
    fn lookup_by_prefix_and_number() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        let created = store
            .create(draft("INC-77", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        let id = created.ticket.id.clone();

        assert_eq!(store.get(&id).expect("id").ticket.id, id);
        assert_eq!(store.get(&id[..6]).expect("prefix").ticket.id, id);
        assert_eq!(store.get(&id[3..7]).expect("bare prefix").ticket.id, id);
        assert_eq!(store.get("inc-77").expect("number").ticket.id, id);
        assert!(matches!(
            store.get("nope"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn remove_deletes_everything() {
        let (_dir, store) = store();
        let now = at("2024-01-02T09:30:00-05:00");
        store
            .create(draft("INC-1", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("create");
        let removed = store.remove("INC-1").expect("remove");
        assert_eq!(removed.ticket.ticket_number, "INC-1");
        assert!(matches!(store.get("INC-1"), Err(StoreError::NotFound(_))));

        // The number is free again.
        store
            .create(draft("inc-1", "fault", "2024-01-02T09:00:00-05:00"), now)
            .expect("re-create");
    }

    #[test]
    fn list_filters_searches_and_sorts() {
        let (_dir, store) = store();
        let now = at("2024-01-03T09:30:00-05:00");
        store
            .create(draft("B-200", "fault", "2024-01-02T10:00:00-05:00"), now)
            .expect("b");
        store
            .create(draft("A-300", "requirement", "2024-01-02T09:00:00-05:00"), now)
            .expect("a");
        store
            .create(draft("C-100", "fault", "2024-01-02T11:00:00-05:00"), now)
            .expect("c");

        let numbers = |query: &ListQuery| -> Vec<String> {
            store
                .list(query)
                .expect("list")
                .into_iter()
                .map(|e| e.ticket.ticket_number)
                .collect()
        };

        assert_eq!(numbers(&ListQuery::default()), ["B-200", "A-300", "C-100"]);
        assert_eq!(
            numbers(&ListQuery {
                category: Some(Category::Fault),
                ..ListQuery::default()
            }),
            ["B-200", "C-100"]
        );
        assert_eq!(
            numbers(&ListQuery {
                search: Some("00".to_string()),
                sort: Some(SortOrder::NumberDesc),
                ..ListQuery::default()
            }),
            ["C-100", "B-200", "A-300"]
        );
        assert_eq!(
            numbers(&ListQuery {
                search: Some("a-".to_string()),
                ..ListQuery::default()
            }),
            ["A-300"]
        );
        assert_eq!(
            numbers(&ListQuery {
                sort: Some(SortOrder::CreatedAsc),
                ..ListQuery::default()
            }),
            ["A-300", "B-200", "C-100"]
        );
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("number".parse::<SortOrder>().expect("p"), SortOrder::NumberAsc);
        assert_eq!(
            "created_desc".parse::<SortOrder>().expect("p"),
            SortOrder::CreatedDesc
        );
        assert!("priority".parse::<SortOrder>().is_err());
    }

    #[test]
    fn stats_count_categories_and_overdue() {
        let (_dir, store) = store();
        let created_at = at("2024-01-02T09:30:00-05:00");
        store
            .create(draft("F-1", "fault", "2024-01-02T09:00:00-05:00"), created_at)
            .expect("f1");
        store
            .create(draft("F-2", "fault", "2024-01-02T09:00:00-05:00"), created_at)
            .expect("f2");
        store
            .create(draft("R-1", "requirement", "2024-01-02T09:00:00-05:00"), created_at)
            .expect("r1");
        store
            .create(draft("S-1", "special", "2024-01-02T09:00:00-05:00"), created_at)
            .expect("s1");
        store
            .set_completed("F-2", DeadlineKind::CaseExpiration, true)
            .expect("check");

        // Faults expire at 11:00, the requirement at 13:00.
        let stats = store.stats(at("2024-01-02T12:00:00-05:00")).expect("stats");
        assert_eq!(
            stats,
            TicketStats {
                total: 4,
                fault: 2,
                requirement: 1,
                special: 1,
                unscheduled: 1,
                overdue: 1,
            }
        );
    }

    #[test]
    fn corrupt_file_is_reported() {
        let (_dir, store) = store();
        fs::write(store.data_path(), b"{ not json").expect("clobber");
        let err = store.list(&ListQuery::default()).expect_err("corrupt");
        assert_eq!(err.code(), ErrorCode::StoreCorrupt);
    }
}
