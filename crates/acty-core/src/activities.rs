//! Activity records and the in-memory list a view keeps.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::api::{ApiClient, ApiError};

const ACTIVITIES_PATH: &str = "/activities";

/// Server-assigned activity identifier.
///
/// Servers send either numbers or strings; both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityId {
    Number(i64),
    Text(String),
}

impl ActivityId {
    /// Parses user input, preferring the numeric form.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| ActivityId::Text(trimmed.to_string()), ActivityId::Number)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityId::Number(n) => write!(f, "{n}"),
            ActivityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ActivityId {
    fn from(id: i64) -> Self {
        ActivityId::Number(id)
    }
}

/// An activity as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    #[serde(alias = "name")]
    pub content: String,
    pub date: String,
}

/// A new activity, before the server assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub content: String,
    pub date: String,
}

impl NewActivity {
    pub fn new(content: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            date: date.into(),
        }
    }

    /// Both fields are required; incomplete input is never submitted.
    pub fn is_complete(&self) -> bool {
        missing_field(&self.content, &self.date).is_none()
    }

    /// Name of the first empty required field.
    pub fn missing_field(&self) -> Option<&'static str> {
        missing_field(&self.content, &self.date)
    }
}

/// Body of a PATCH or PUT on an existing activity.
pub type ActivityPatch = NewActivity;

fn missing_field(content: &str, date: &str) -> Option<&'static str> {
    if content.trim().is_empty() {
        Some("content")
    } else if date.trim().is_empty() {
        Some("date")
    } else {
        None
    }
}

/// Activity endpoints on top of an [`ApiClient`].
pub struct ActivitiesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ActivitiesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /activities`, in server order.
    pub async fn list(&self) -> Result<Vec<Activity>, ApiError> {
        self.client.get(ACTIVITIES_PATH).await
    }

    /// `POST /activities`. Returns the stored record with its id.
    pub async fn create(&self, activity: &NewActivity) -> Result<Activity, ApiError> {
        self.client.post(ACTIVITIES_PATH, activity).await
    }

    /// `PATCH /activities/:id`.
    pub async fn update(
        &self,
        id: &ActivityId,
        patch: &ActivityPatch,
    ) -> Result<Activity, ApiError> {
        self.client.patch(&item_path(id)?, patch).await
    }

    /// `PUT /activities/:id`.
    pub async fn replace(
        &self,
        id: &ActivityId,
        activity: &ActivityPatch,
    ) -> Result<Activity, ApiError> {
        self.client.put(&item_path(id)?, activity).await
    }

    /// `DELETE /activities/:id`.
    pub async fn delete(&self, id: &ActivityId) -> Result<(), ApiError> {
        self.client.delete(&item_path(id)?).await
    }
}

/// Path of a single activity, with the id encoded as one path segment.
///
/// Ids that would resolve to another resource (empty, `.`, `..`) are
/// rejected before anything is sent.
fn item_path(id: &ActivityId) -> Result<String, ApiError> {
    let raw = id.to_string();
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(ApiError::invalid_request(format!("invalid activity id: {raw:?}")));
    }

    // byte_serialize writes spaces as '+' and a literal '+' as %2B
    let segment = form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    Ok(format!("{ACTIVITIES_PATH}/{segment}"))
}

/// The activities a view currently shows.
///
/// Updates are applied from server responses only; nothing is cached beyond
/// the lifetime of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityList {
    items: Vec<Activity>,
}

impl ActivityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with a freshly fetched list.
    pub fn replace_all(&mut self, items: Vec<Activity>) {
        self.items = items;
    }

    /// Appends the record the server returned for a create.
    pub fn apply_created(&mut self, activity: Activity) {
        self.items.push(activity);
    }

    /// Merges the server's record into the entry with `id`.
    /// Returns false when no entry has that id.
    pub fn apply_updated(&mut self, id: &ActivityId, updated: Activity) -> bool {
        match self.items.iter_mut().find(|a| &a.id == id) {
            Some(existing) => {
                *existing = updated;
                true
            }
            None => false,
        }
    }

    /// Removes every entry with `id`. Returns how many were removed.
    pub fn apply_deleted(&mut self, id: &ActivityId) -> usize {
        let before = self.items.len();
        self.items.retain(|a| &a.id != id);
        before - self.items.len()
    }

    pub fn get(&self, id: &ActivityId) -> Option<&Activity> {
        self.items.iter().find(|a| &a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Activity] {
        &self.items
    }
}

impl From<Vec<Activity>> for ActivityList {
    fn from(items: Vec<Activity>) -> Self {
        Self { items }
    }
}
