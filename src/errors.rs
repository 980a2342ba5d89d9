use thiserror::Error;

/// Error depicting errors that occur while creating the weather dashboard
///
#[derive(Debug, Error)]
#[error("error while creating dashboard: {0}")]
pub struct DashboardError(pub String);
