//! Request types for the preview server.

use serde::Deserialize;

/// Body of the topic form posted to `/report`.
#[derive(Debug, Deserialize)]
pub struct TopicForm {
    /// Market topic as typed by the user.
    #[serde(default)]
    pub topic: String,
}
