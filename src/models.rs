use serde::{Deserialize, Serialize};

use crate::constants::{CHANNELS_COLLECTION, DEFAULT_LANGUAGE, IDEAS_COLLECTION, TASKS_COLLECTION};

/// A domain type stored in its own document collection
pub trait Collection {
    /// Collection name (the model name in lowercase)
    const NAME: &'static str;
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Creator channel used as context for ideation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelProfile {
    /// Channel name
    pub name: String,
    /// Primary niche or theme
    pub niche: String,
    /// Who the channel is for
    #[serde(default)]
    pub target_audience: Option<String>,
    /// Seed keywords for ideation
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Language code (default "id"); generated text is always Indonesian
    #[serde(default = "default_language")]
    pub language: String,
}

impl Collection for ChannelProfile {
    const NAME: &'static str = CHANNELS_COLLECTION;
}

/// A single templated suggestion for a short video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIdea {
    /// Reference to a channel profile id, never validated
    #[serde(default)]
    pub channel_id: Option<String>,
    pub topic: String,
    pub hook: String,
    pub angle: String,
    pub cta: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub posting_time: String,
}

impl Collection for ContentIdea {
    const NAME: &'static str = IDEAS_COLLECTION;
}

/// Production stage of a video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    #[default]
    Planned,
    Scripting,
    Editing,
    Scheduled,
    Published,
}

/// Production task for a content idea
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoTask {
    /// Reference to a content idea id
    #[serde(default)]
    pub idea_id: Option<String>,
    #[serde(default)]
    pub status: VideoStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Collection for VideoTask {
    const NAME: &'static str = TASKS_COLLECTION;
}

/// Body of `POST /api/ideate`
#[derive(Debug, Clone, Deserialize)]
pub struct IdeationRequest {
    pub niche: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Response of `POST /api/ideate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeationResponse {
    pub ideas: Vec<ContentIdea>,
}
