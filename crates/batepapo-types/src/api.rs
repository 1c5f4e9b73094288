use serde::Deserialize;

// -- Participants --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinRequest {
    pub name: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    /// Kept raw: anything that is not a non-negative integer means "no limit".
    pub limit: Option<String>,
}

impl MessageQuery {
    pub fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}
