use serde::Deserialize;

/// The `{success, errors, result, result_info}` envelope of the v4 REST API.
/// Some endpoints omit `success`; only an explicit `false` marks a failure.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
}

fn default_success() -> bool {
    true
}

impl ApiMessage {
    /// Error codes the API uses for rejected credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self.code, 6003 | 9103 | 9106 | 10000)
    }
}

pub(crate) fn join_messages(messages: &[ApiMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{} ({})", m.message, m.code))
        .collect::<Vec<_>>()
        .join("; ")
}
