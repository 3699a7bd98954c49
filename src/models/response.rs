use serde::Deserialize;

/// Body the supplier service sends alongside an error status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extracts the message from a raw body. Bodies that are empty or not the
    /// expected shape yield `None`.
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
    }
}
