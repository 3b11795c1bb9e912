use serde::{Deserialize, Serialize};

pub type TaskId = String;

/// A single task. Local and remote tasks share this shape; `created_at` is only ever
/// set for local tasks and `order` only once a manual reorder has happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    /// Builds a fresh local task: millisecond timestamp id, RFC 3339 creation time and
    /// `order` pointing at the end of `existing`.
    pub fn new_local(title: impl Into<String>, existing: &[Task]) -> Self {
        let now = chrono::Utc::now();
        let mut stamp = now.timestamp_millis();
        while existing.iter().any(|task| task.id == stamp.to_string()) {
            stamp += 1;
        }
        Self {
            id: stamp.to_string(),
            title: title.into(),
            completed: false,
            order: Some(existing.len() as i64),
            created_at: Some(now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        }
    }

    pub fn sort_order(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Field-merge: every field present in `patch` overwrites the current value.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(order) = patch.order {
            self.order = Some(order);
        }
    }
}

/// Partial task fields. Used as the local update payload and as the remote PUT body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// Body of a remote create request; the service assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

/// One entry of the remote reorder cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: TaskId,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Pending => !task.completed,
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "pending" => Ok(Filter::Pending),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// The mock service hands out string ids, but numeric ids are accepted as well.
fn deserialize_id<'de, D>(deserializer: D) -> Result<TaskId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!("invalid task id: {other}"))),
    }
}
