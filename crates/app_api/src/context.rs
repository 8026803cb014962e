use frost_app::AppState;

/// Shared state handed to every frontend operation.
#[derive(Clone)]
pub struct AppContext {
    pub app_state: AppState,
}

impl AppContext {
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }
}
