use std::sync::Arc;

use crate::notifications::Dispatcher;
use crate::preferences::PreferenceService;

/// State shared by the preference service's handlers.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct PreferencesState {
    pub service: Arc<PreferenceService>,
}

/// State shared by the notification service's handlers.
#[derive(Clone)]
pub struct NotificationsState {
    pub dispatcher: Arc<Dispatcher>,
}
