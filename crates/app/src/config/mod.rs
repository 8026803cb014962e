use serde::{Deserialize, Serialize};

/// Date selection as it arrives from a request: a named range, or explicit
/// `YYYY-MM-DD` bounds.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RangeParams {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}
