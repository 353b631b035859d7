use serde::{Deserialize, Serialize};

/// A story item from the HN API.
///
/// `id` and `type` are required; everything else is optional or defaulted
/// because the API omits fields freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnStory {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: Option<String>,
    /// Child comment IDs, in ranked order.
    #[serde(default)]
    pub kids: Vec<i64>,
    #[serde(default)]
    pub descendants: i64,
    #[serde(default)]
    pub score: i64,
    /// Creation time as Unix epoch seconds.
    pub time: Option<i64>,
    pub by: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A comment item from the HN API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnComment {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    /// Comment body as HTML-entity-escaped text. Absent on deleted items.
    pub text: Option<String>,
    pub parent: Option<i64>,
    /// Creation time as Unix epoch seconds.
    pub time: Option<i64>,
    pub by: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub kids: Vec<i64>,
}
