use crate::domain::anomaly::WorkPolicy;
use crate::domain::events::EventPublisher;
use crate::repo::{AttendanceRepository, LeaveRequestRepository, NotificationRepository};
use std::sync::Arc;

/// Shared handles the domain handlers work through. The pool itself is
/// registered separately for the auth/employee adapters, teacher-style.
#[derive(Clone)]
pub struct AppState {
    pub attendance: Arc<dyn AttendanceRepository>,
    pub leaves: Arc<dyn LeaveRequestRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub events: Arc<dyn EventPublisher>,
    pub policy: WorkPolicy,
}
