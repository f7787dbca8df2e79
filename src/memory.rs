//! In-process store used by unit and router tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    adjustments::{
        repo::AdjustmentStore,
        repo_types::{PendingMacroAdjustment, PENDING},
    },
    checkins::{
        repo::{CheckInStore, NewCheckIn},
        repo_types::CheckIn,
    },
    error::{AppError, AppResult},
    profiles::{
        repo::ProfileStore,
        repo_types::{Profile, Role, SubscriptionStatus},
    },
    versioning::{kind::RecordKind, record::RawRecord, store::RecordStore},
};

#[derive(Default)]
struct Tables {
    records: Vec<(RecordKind, RawRecord)>,
    profiles: Vec<Profile>,
    check_ins: Vec<CheckIn>,
    adjustments: Vec<PendingMacroAdjustment>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    profile_writes_fail: AtomicBool,
}

impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut guard = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    pub fn add_profile(&self, email: &str, role: Role) -> Uuid {
        let user_id = Uuid::new_v4();
        self.with(|t| {
            t.profiles.push(Profile {
                user_id,
                email: email.into(),
                display_name: None,
                role,
                onboarding_completed: false,
                subscription_status: SubscriptionStatus::Inactive,
                created_at: OffsetDateTime::now_utc(),
            })
        });
        user_id
    }

    pub fn mark_onboarded(&self, user_id: Uuid) {
        self.with(|t| {
            if let Some(p) = t.profiles.iter_mut().find(|p| p.user_id == user_id) {
                p.onboarding_completed = true;
            }
        });
    }

    /// Makes every later profile write fail, as a lost database would.
    pub fn fail_profile_writes(&self, fail: bool) {
        self.profile_writes_fail.store(fail, Ordering::SeqCst);
    }

    fn profile_write_failure(&self) -> AppResult<()> {
        if self.profile_writes_fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("profile write failed")));
        }
        Ok(())
    }

    pub fn add_check_in_at(&self, user_id: Uuid, created_at: OffsetDateTime) {
        self.with(|t| {
            t.check_ins.push(CheckIn {
                id: Uuid::new_v4(),
                user_id,
                week_number: 1,
                notes: None,
                created_at,
                photos: vec![],
            })
        });
    }

    pub fn add_adjustment(&self, user_id: Uuid, created_at: OffsetDateTime, status: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|t| {
            t.adjustments.push(PendingMacroAdjustment {
                id,
                user_id,
                status: status.into(),
                calorie_target: 2000,
                protein_g: 150,
                carbs_g: 200,
                fat_g: 60,
                reason: Some("weight plateau".into()),
                created_at,
            })
        });
        id
    }
}

fn chain<'a>(
    t: &'a mut Tables,
    user_id: Uuid,
    kind: RecordKind,
) -> impl Iterator<Item = &'a mut RawRecord> {
    t.records
        .iter_mut()
        .filter(move |(k, r)| *k == kind && r.user_id == user_id)
        .map(|(_, r)| r)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn latest(&self, user_id: Uuid, kind: RecordKind) -> AppResult<Option<RawRecord>> {
        Ok(self.with(|t| chain(t, user_id, kind).max_by_key(|r| r.version).map(|r| r.clone())))
    }

    async fn history(&self, user_id: Uuid, kind: RecordKind) -> AppResult<Vec<RawRecord>> {
        let mut rows: Vec<RawRecord> = self.with(|t| chain(t, user_id, kind).map(|r| r.clone()).collect());
        rows.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(rows)
    }

    async fn try_append(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        payload: Value,
    ) -> AppResult<RawRecord> {
        Ok(self.with(|t| {
            let next = chain(t, user_id, kind).map(|r| r.version).max().unwrap_or(0) + 1;
            let row = RawRecord {
                id: Uuid::new_v4(),
                user_id,
                version: next,
                payload,
                created_at: OffsetDateTime::now_utc(),
            };
            t.records.push((kind, row.clone()));
            row
        }))
    }

    async fn merge_latest(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        patch: Map<String, Value>,
    ) -> AppResult<Option<RawRecord>> {
        Ok(self.with(|t| {
            let row = chain(t, user_id, kind).max_by_key(|r| r.version)?;
            if let Value::Object(fields) = &mut row.payload {
                fields.extend(patch);
            } else {
                row.payload = Value::Object(patch);
            }
            Some(row.clone())
        }))
    }

    async fn try_append_onboarding(
        &self,
        user_id: Uuid,
        payload: Value,
    ) -> AppResult<Option<RawRecord>> {
        self.with(|t| {
            let kind = RecordKind::Onboarding;
            let Some(idx) = t.profiles.iter().position(|p| p.user_id == user_id) else {
                return Ok(None);
            };
            // Both writes happen after this point or neither does.
            self.profile_write_failure()?;
            let next = chain(t, user_id, kind).map(|r| r.version).max().unwrap_or(0) + 1;
            let row = RawRecord {
                id: Uuid::new_v4(),
                user_id,
                version: next,
                payload,
                created_at: OffsetDateTime::now_utc(),
            };
            t.records.push((kind, row.clone()));
            t.profiles[idx].onboarding_completed = true;
            Ok(Some(row))
        })
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.with(|t| t.profiles.iter().find(|p| p.user_id == user_id).cloned()))
    }

    async fn list_clients(&self) -> AppResult<Vec<Profile>> {
        Ok(self.with(|t| {
            t.profiles
                .iter()
                .filter(|p| p.role == Role::Client)
                .cloned()
                .collect()
        }))
    }

    async fn set_subscription_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Option<Profile>> {
        self.profile_write_failure()?;
        Ok(self.with(|t| {
            let p = t.profiles.iter_mut().find(|p| p.user_id == user_id)?;
            p.subscription_status = status;
            Some(p.clone())
        }))
    }
}

#[async_trait]
impl CheckInStore for MemoryStore {
    async fn insert(&self, new: NewCheckIn) -> AppResult<CheckIn> {
        let mut photos = new.photos;
        photos.sort_by_key(|p| p.photo_type);
        let check_in = CheckIn {
            id: new.id,
            user_id: new.user_id,
            week_number: new.week_number,
            notes: new.notes,
            created_at: OffsetDateTime::now_utc(),
            photos,
        };
        self.with(|t| t.check_ins.push(check_in.clone()));
        Ok(check_in)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<CheckIn>> {
        let mut rows: Vec<CheckIn> = self.with(|t| {
            t.check_ins
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect()
        });
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn last_check_in_at(&self, user_id: Uuid) -> AppResult<Option<OffsetDateTime>> {
        Ok(self.with(|t| {
            t.check_ins
                .iter()
                .filter(|c| c.user_id == user_id)
                .map(|c| c.created_at)
                .max()
        }))
    }

    async fn last_check_in_times(
        &self,
        user_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, OffsetDateTime>> {
        Ok(self.with(|t| {
            let mut out: HashMap<Uuid, OffsetDateTime> = HashMap::new();
            for c in t.check_ins.iter().filter(|c| user_ids.contains(&c.user_id)) {
                let slot = out.entry(c.user_id).or_insert(c.created_at);
                *slot = (*slot).max(c.created_at);
            }
            out
        }))
    }
}

#[async_trait]
impl AdjustmentStore for MemoryStore {
    async fn list_pending(&self, user_id: Uuid) -> AppResult<Vec<PendingMacroAdjustment>> {
        let mut rows: Vec<PendingMacroAdjustment> = self.with(|t| {
            t.adjustments
                .iter()
                .filter(|a| a.user_id == user_id && a.status == PENDING)
                .cloned()
                .collect()
        });
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn count_pending(&self, user_id: Uuid) -> AppResult<i64> {
        Ok(self.list_pending(user_id).await?.len() as i64)
    }

    async fn pending_counts(&self, user_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>> {
        let mut out = HashMap::new();
        for &id in user_ids {
            let n = self.count_pending(id).await?;
            if n > 0 {
                out.insert(id, n);
            }
        }
        Ok(out)
    }
}
