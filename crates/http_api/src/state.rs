use rand::RngCore;

use app_api::AppContext;

/// Header carrying the opaque session id on every session-scoped request.
pub const SESSION_HEADER: &str = "x-frost-session";

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
}

impl HttpState {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }
}

/// Id of the session a request acts on, set by the session middleware.
#[derive(Clone, Debug)]
pub struct SessionId(pub String);

pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
