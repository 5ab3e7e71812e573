//! # CGP Common Library
//!
//! Shared code for the CGP sales dashboard including:
//! - Domain models (leads, courses, sellers, commissions, goals)
//! - Row mapping between the remote store's snake_case tables and the models
//! - Built-in fixture data
//! - Pipeline stage transitions and derived metrics
//! - Course projection, commission resolution and dashboard analytics
//! - Event types and the EventBus
//! - Configuration loading

pub mod analytics;
pub mod commission;
pub mod config;
pub mod entity_store;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod rows;

pub use entity_store::EntityStore;
pub use error::{Error, Result};
pub use models::{
    ActivityDraft, ActivityKind, ActivityLog, BonusTier, CommissionKind, CommissionRate, Course,
    CourseDraft, CourseStatus, GlobalGoal, GoalPeriod, Instructor, Lead, LeadDraft, LeadStatus,
    Notification, NotificationKind, Seller,
};
