//! Request bodies and small factories for tests.

use serde_json::json;
use uuid::Uuid;

/// Create a register request body.
pub fn register_request(display_name: &str) -> serde_json::Value {
    json!({ "display_name": display_name })
}

/// Create a course request body.
pub fn create_course_request(title: &str) -> serde_json::Value {
    json!({ "title": title, "description": "Created by tests" })
}

/// Create a module or lesson request body.
pub fn titled_request(title: &str) -> serde_json::Value {
    json!({ "title": title })
}

/// Create a reorder request body.
pub fn reorder_request(ordered_ids: &[Uuid]) -> serde_json::Value {
    json!({ "ordered_ids": ordered_ids })
}

/// Create a lesson completion request body.
pub fn completion_request(completed: bool) -> serde_json::Value {
    json!({ "completed": completed })
}

/// Create a post or comment request body.
pub fn body_request(body: &str) -> serde_json::Value {
    json!({ "body": body })
}

/// Unique display name so leaderboard assertions can find test users.
pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Pull the `id` field out of each element of a JSON array.
pub fn ids_of(items: &serde_json::Value) -> Vec<Uuid> {
    items
        .as_array()
        .expect("array")
        .iter()
        .map(|item| {
            item["id"]
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .expect("id")
        })
        .collect()
}
