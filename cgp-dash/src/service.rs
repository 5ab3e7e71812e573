//! Data service: the shared application state
//!
//! Holds the entity collections behind a `RwLock` and keeps them in sync
//! with the optional backing store. The lock is only held for in-memory
//! changes, never across a store call. Concurrent edits are last write wins.
//!
//! Store write policy:
//! - inserts adopt the row returned by the store; a failed insert leaves
//!   local state unchanged and surfaces as [`Error::Store`]
//! - updates and deletes are applied locally first; store failures are
//!   only logged
//! - records with fixture ids (`l1`, `c1`, ...) are never written remotely
//! - activity entries are appended locally and sent in a spawned task

use chrono::{Local, Utc};
use cgp_common::entity_store::ACTIVITY_FEED_LIMIT;
use cgp_common::events::{DashboardEvent, EventBus};
use cgp_common::pipeline::{apply_transition, creation_activity};
use cgp_common::rows::{self, is_store_id, Table};
use cgp_common::{
    ActivityDraft, ActivityLog, CommissionRate, Course, CourseDraft, EntityStore, Error,
    GlobalGoal, Lead, LeadDraft, LeadStatus, Notification, NotificationKind, Result,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::{Direction, SelectQuery, StoreError, StoreResult, TableStore};

/// Counts reported after a reload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub remote: bool,
    pub backend: String,
    pub courses: usize,
    pub leads: usize,
    pub instructors: usize,
    pub sellers: usize,
    pub commission_rates: usize,
    pub notifications: usize,
    pub activities: usize,
}

pub struct DataService {
    entities: RwLock<EntityStore>,
    store: Option<Arc<dyn TableStore>>,
    events: EventBus,
}

fn store_error(table: Table, e: StoreError) -> Error {
    Error::Store(format!("{}: {}", table, e))
}

impl DataService {
    /// Service starting from the built-in fixtures
    ///
    /// With no store every change stays in memory.
    pub fn new(store: Option<Arc<dyn TableStore>>, events: EventBus) -> Self {
        Self {
            entities: RwLock::new(EntityStore::from_fixtures()),
            store,
            events,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.store.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store
            .as_ref()
            .map(|s| s.backend_name())
            .unwrap_or("fixtures")
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Run `f` against the current collections
    pub async fn read<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        let entities = self.entities.read().await;
        f(&entities)
    }

    pub async fn snapshot(&self) -> EntityStore {
        self.entities.read().await.clone()
    }

    // ========================================
    // Loading
    // ========================================

    async fn load<R, M>(store: &dyn TableStore, table: Table, query: SelectQuery) -> Option<Vec<M>>
    where
        R: DeserializeOwned,
        M: From<R>,
    {
        let rows = match store.select(table, &query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to load {}: {}", table, e);
                return None;
            }
        };

        let total = rows.len();
        let models: Vec<M> = rows
            .into_iter()
            .filter_map(|row| match rows::decode::<R>(row) {
                Ok(decoded) => Some(M::from(decoded)),
                Err(e) => {
                    warn!("Skipping malformed {} row: {}", table, e);
                    None
                }
            })
            .collect();
        debug!(table = %table, total = total, loaded = models.len(), "Table loaded");
        Some(models)
    }

    /// Reload every collection from the store
    ///
    /// Tables that fail to load keep their current contents. Without a
    /// store this is a no-op that reports the fixture counts.
    pub async fn refresh(&self) -> RefreshSummary {
        if let Some(store) = &self.store {
            let store = store.as_ref();
            info!("Synchronizing data with the {} store", store.backend_name());

            let instructors = Self::load::<rows::InstructorRow, _>(store, Table::Instructors, SelectQuery::all()).await;
            let sellers = Self::load::<rows::SellerRow, _>(store, Table::Sellers, SelectQuery::all()).await;
            let courses = Self::load::<rows::CourseRow, _>(store, Table::Courses, SelectQuery::all()).await;
            let leads = Self::load::<rows::LeadRow, _>(store, Table::Leads, SelectQuery::all()).await;
            let rates = Self::load::<rows::CommissionRow, _>(store, Table::CommissionRates, SelectQuery::all()).await;
            let goal = Self::load::<rows::GoalRow, GlobalGoal>(store, Table::GlobalGoals, SelectQuery::all().limit(1)).await;
            let notifications = Self::load::<rows::NotificationRow, _>(
                store,
                Table::Notifications,
                SelectQuery::all().order("data", Direction::Desc),
            )
            .await;
            let activities = Self::load::<rows::ActivityRow, _>(
                store,
                Table::ActivityLogs,
                SelectQuery::all()
                    .order("timestamp", Direction::Desc)
                    .limit(ACTIVITY_FEED_LIMIT),
            )
            .await;

            let mut entities = self.entities.write().await;
            if let Some(v) = instructors {
                entities.instructors = v;
            }
            if let Some(v) = sellers {
                entities.sellers = v;
            }
            if let Some(v) = courses {
                entities.courses = v;
            }
            if let Some(v) = leads {
                entities.leads = v;
            }
            if let Some(v) = rates {
                entities.commission_rates = v;
            }
            // an empty goal table keeps the current goal
            if let Some(g) = goal.and_then(|g| g.into_iter().next()) {
                entities.global_goal = g;
            }
            if let Some(v) = notifications {
                entities.notifications = v;
            }
            if let Some(v) = activities {
                entities.activities = v;
            }
        } else {
            warn!("No store configured, using built-in sample data");
        }

        let summary = self.read(|e| self.summary_of(e)).await;
        info!(
            backend = %summary.backend,
            courses = summary.courses,
            leads = summary.leads,
            sellers = summary.sellers,
            "Data loaded"
        );
        self.events.emit_lossy(DashboardEvent::DataRefreshed {
            remote: summary.remote,
            timestamp: Utc::now(),
        });
        summary
    }

    fn summary_of(&self, e: &EntityStore) -> RefreshSummary {
        RefreshSummary {
            remote: self.is_remote(),
            backend: self.backend_name().to_string(),
            courses: e.courses.len(),
            leads: e.leads.len(),
            instructors: e.instructors.len(),
            sellers: e.sellers.len(),
            commission_rates: e.commission_rates.len(),
            notifications: e.notifications.len(),
            activities: e.activities.len(),
        }
    }

    // ========================================
    // Store helpers
    // ========================================

    /// Insert remotely and return the stored row, or `None` in fixture mode
    async fn insert_row(&self, table: Table, payload: Value) -> Result<Option<Value>> {
        match &self.store {
            Some(store) => store
                .insert(table, payload)
                .await
                .map(Some)
                .map_err(|e| store_error(table, e)),
            None => Ok(None),
        }
    }

    async fn update_row(&self, table: Table, id: &str, patch: Value) {
        if let Some(store) = &self.store {
            if is_store_id(id) {
                if let Err(e) = store.update(table, id, patch).await {
                    warn!("Failed to update {} row {}: {}", table, id, e);
                }
            }
        }
    }

    async fn delete_row(&self, table: Table, id: &str) {
        if let Some(store) = &self.store {
            if is_store_id(id) {
                if let Err(e) = store.delete(table, id).await {
                    warn!("Failed to delete {} row {}: {}", table, id, e);
                }
            }
        }
    }

    fn local_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Append an activity entry locally and send it to the store in the
    /// background
    pub async fn log_activity(&self, draft: ActivityDraft) -> ActivityLog {
        let log = draft.stamp(Self::local_id(), Utc::now());
        self.entities.write().await.push_activity(log.clone());

        if let Some(store) = self.store.clone() {
            let payload = rows::activity_insert(&log);
            tokio::spawn(async move {
                if let Err(e) = store.insert(Table::ActivityLogs, payload).await {
                    warn!("Failed to store activity log: {}", e);
                }
            });
        }

        self.events.emit_lossy(DashboardEvent::ActivityLogged {
            activity: log.clone(),
        });
        log
    }

    // ========================================
    // Leads
    // ========================================

    /// Fill the price and interest of a lead from its course
    async fn price_from_course(&self, draft: &mut LeadDraft) {
        let Some(course_id) = draft.course_id.clone() else {
            return;
        };
        let course = self.read(|e| e.course(&course_id).cloned()).await;
        if let Some(course) = course {
            if draft.interest.trim().is_empty() {
                draft.interest = course.title.clone();
            }
            if draft.standard_value == 0.0 {
                draft.standard_value = course.seat_price * draft.quantity.unwrap_or(1) as f64;
            }
        }
    }

    pub async fn add_lead(&self, mut draft: LeadDraft) -> Result<Lead> {
        draft.validate()?;
        self.price_from_course(&mut draft).await;

        let local = draft.into_lead(Self::local_id(), Local::now().date_naive());
        let lead = match self.insert_row(Table::Leads, rows::lead_insert(&local)).await? {
            Some(row) => Lead::from(rows::decode::<rows::LeadRow>(row)?),
            None => local,
        };

        let activity = {
            let mut entities = self.entities.write().await;
            entities.upsert_lead(lead.clone());
            creation_activity(&entities, &lead)
        };
        info!(lead_id = %lead.id, organization = %lead.organization, "Lead created");

        self.events.emit_lossy(DashboardEvent::LeadCreated {
            lead: lead.clone(),
            timestamp: Utc::now(),
        });
        self.log_activity(activity).await;
        Ok(lead)
    }

    pub async fn update_lead(&self, id: &str, mut draft: LeadDraft) -> Result<Lead> {
        draft.validate()?;

        let lead = {
            let mut entities = self.entities.write().await;
            let existing = entities
                .lead(id)
                .ok_or_else(|| Error::NotFound(format!("Lead {}", id)))?;
            draft.status = draft.status.or(Some(existing.status));
            let lead = draft.into_lead(id.to_string(), existing.created_on);
            entities.upsert_lead(lead.clone());
            lead
        };

        self.update_row(Table::Leads, id, rows::lead_update(&lead)).await;
        self.events.emit_lossy(DashboardEvent::LeadUpdated {
            lead: lead.clone(),
            timestamp: Utc::now(),
        });
        Ok(lead)
    }

    /// Move a lead to another pipeline stage
    pub async fn move_lead(&self, id: &str, target: LeadStatus, reason: Option<&str>) -> Result<Lead> {
        let change = {
            let mut entities = self.entities.write().await;
            apply_transition(&mut entities, id, target, reason)?
        };
        info!(lead_id = id, from = %change.previous, to = %target, "Lead moved");

        self.update_row(Table::Leads, id, rows::lead_update(&change.lead)).await;
        self.events.emit_lossy(DashboardEvent::LeadStageChanged {
            lead_id: id.to_string(),
            from: change.previous,
            to: target,
            timestamp: Utc::now(),
        });
        if let Some(activity) = change.activity {
            self.log_activity(activity).await;
        }
        Ok(change.lead)
    }

    // ========================================
    // Courses
    // ========================================

    pub async fn add_course(&self, draft: CourseDraft) -> Result<Course> {
        draft.validate()?;
        let local = draft.into_course(Self::local_id());
        let course = match self.insert_row(Table::Courses, rows::course_payload(&local)).await? {
            Some(row) => Course::from(rows::decode::<rows::CourseRow>(row)?),
            None => local,
        };

        self.entities.write().await.courses.push(course.clone());
        info!(course_id = %course.id, title = %course.title, "Course created");
        self.events.emit_lossy(DashboardEvent::CourseChanged {
            course_id: course.id.clone(),
            timestamp: Utc::now(),
        });
        Ok(course)
    }

    pub async fn update_course(&self, id: &str, draft: CourseDraft) -> Result<Course> {
        draft.validate()?;
        let course = draft.into_course(id.to_string());
        if !self.entities.write().await.replace_course(course.clone()) {
            return Err(Error::NotFound(format!("Course {}", id)));
        }

        self.update_row(Table::Courses, id, rows::course_payload(&course)).await;
        self.events.emit_lossy(DashboardEvent::CourseChanged {
            course_id: id.to_string(),
            timestamp: Utc::now(),
        });
        Ok(course)
    }

    pub async fn delete_course(&self, id: &str) -> Result<()> {
        if !self.entities.write().await.remove_course(id) {
            return Err(Error::NotFound(format!("Course {}", id)));
        }
        self.delete_row(Table::Courses, id).await;
        info!(course_id = id, "Course deleted");
        self.events.emit_lossy(DashboardEvent::CourseDeleted {
            course_id: id.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ========================================
    // Commissions and goal
    // ========================================

    /// Add a rate; its `id` is replaced by the generated one
    pub async fn add_commission_rate(&self, mut rate: CommissionRate) -> Result<CommissionRate> {
        rate.validate()?;
        rate.id = Self::local_id();
        let rate = match self
            .insert_row(Table::CommissionRates, rows::commission_insert(&rate))
            .await?
        {
            Some(row) => CommissionRate::from(rows::decode::<rows::CommissionRow>(row)?),
            None => rate,
        };

        let count = {
            let mut entities = self.entities.write().await;
            entities.commission_rates.push(rate.clone());
            entities.commission_rates.len()
        };
        self.events.emit_lossy(DashboardEvent::CommissionRatesChanged {
            count,
            timestamp: Utc::now(),
        });
        Ok(rate)
    }

    pub async fn delete_commission_rate(&self, id: &str) -> Result<()> {
        let count = {
            let mut entities = self.entities.write().await;
            if !entities.remove_commission_rate(id) {
                return Err(Error::NotFound(format!("Commission rate {}", id)));
            }
            entities.commission_rates.len()
        };
        self.delete_row(Table::CommissionRates, id).await;
        self.events.emit_lossy(DashboardEvent::CommissionRatesChanged {
            count,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    pub async fn update_goal(&self, goal: GlobalGoal) -> Result<GlobalGoal> {
        goal.validate()?;
        self.entities.write().await.global_goal = goal.clone();

        if let Some(store) = &self.store {
            if let Err(e) = Self::store_goal(store.as_ref(), &goal).await {
                warn!("Failed to update global goal: {}", e);
            }
        }
        info!(target_revenue = goal.target_revenue, "Global goal updated");
        self.events.emit_lossy(DashboardEvent::GoalUpdated {
            target_revenue: goal.target_revenue,
            timestamp: Utc::now(),
        });
        Ok(goal)
    }

    /// Patch every goal row, or insert the first one into an empty table
    async fn store_goal(store: &dyn TableStore, goal: &GlobalGoal) -> StoreResult<()> {
        let patch = rows::goal_update(goal);
        let existing = store.select(Table::GlobalGoals, &SelectQuery::all().limit(1)).await?;
        if existing.is_empty() {
            debug!("Goal table empty, inserting first row");
            store.insert(Table::GlobalGoals, patch).await.map(|_| ())
        } else {
            store.update_all(Table::GlobalGoals, patch).await
        }
    }

    // ========================================
    // Notifications
    // ========================================

    /// Add a notification locally, then store it best-effort
    pub async fn add_notification(
        &self,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification> {
        if title.trim().is_empty() {
            return Err(Error::InvalidInput("Notification title is required".to_string()));
        }
        let notification = Notification {
            id: Self::local_id(),
            title: title.trim().to_string(),
            message: message.trim().to_string(),
            kind,
            date: Utc::now(),
            read: false,
        };
        self.entities
            .write()
            .await
            .push_notification(notification.clone());

        if let Some(store) = &self.store {
            let payload = rows::notification_insert(&notification);
            if let Err(e) = store.insert(Table::Notifications, payload).await {
                warn!("Failed to store notification: {}", e);
            }
        }
        self.events.emit_lossy(DashboardEvent::NotificationAdded {
            notification: notification.clone(),
        });
        Ok(notification)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<()> {
        if !self.entities.write().await.mark_notification_read(id) {
            return Err(Error::NotFound(format!("Notification {}", id)));
        }
        self.update_row(Table::Notifications, id, serde_json::json!({ "lida": true }))
            .await;
        Ok(())
    }
}
