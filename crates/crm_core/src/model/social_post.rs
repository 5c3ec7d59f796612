//! Social media post domain model.

use crate::model::normalize::{opt_epoch_ms, opt_string_list, string_list};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, Staged, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[serde(alias = "Draft")]
    Draft,
    #[serde(alias = "Scheduled")]
    Scheduled,
    #[default]
    #[serde(alias = "Published")]
    Published,
}

/// Engagement counters reported by the social platforms.
///
/// Stored flat as `engagement_*` keys next to the post fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default, rename = "engagement_likes")]
    pub likes: u64,
    #[serde(default, rename = "engagement_comments")]
    pub comments: u64,
    #[serde(default, rename = "engagement_shares")]
    pub shares: u64,
    #[serde(default, rename = "engagement_impressions")]
    pub impressions: u64,
}

/// Canonical social post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(default, alias = "Name")]
    pub name: String,
    pub content: String,
    #[serde(default, deserialize_with = "string_list")]
    pub platforms: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub media: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, alias = "publishedAt", deserialize_with = "opt_epoch_ms")]
    pub published_at: Option<i64>,
    #[serde(default, alias = "scheduledFor", deserialize_with = "opt_epoch_ms")]
    pub scheduled_for: Option<i64>,
    #[serde(flatten)]
    pub engagement: Engagement,
}

/// Partial post update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialPostPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        deserialize_with = "opt_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub platforms: Option<Vec<String>>,
    #[serde(
        deserialize_with = "opt_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub media: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(
        alias = "publishedAt",
        deserialize_with = "opt_epoch_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<i64>,
    #[serde(
        alias = "scheduledFor",
        deserialize_with = "opt_epoch_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_for: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
}

/// Derived engagement report for one post.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostAnalytics {
    pub post_id: RecordId,
    pub engagement: Engagement,
    /// `(likes + comments + shares) / impressions` as a percentage.
    pub engagement_rate: f64,
}

impl PostAnalytics {
    pub fn from_post(post: &SocialPost) -> Self {
        let engagement = post.engagement;
        let interactions = engagement.likes + engagement.comments + engagement.shares;
        let engagement_rate = if engagement.impressions == 0 {
            0.0
        } else {
            interactions as f64 / engagement.impressions as f64 * 100.0
        };
        Self {
            post_id: post.id,
            engagement,
            engagement_rate,
        }
    }
}

impl Record for SocialPost {
    type Patch = SocialPostPatch;
    const COLLECTION: &'static str = "social_posts";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &SocialPostPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "content", patch.content.as_deref())
    }

    fn from_patch(patch: SocialPostPatch, now_ms: i64) -> Self {
        let status = patch.status.unwrap_or_default();
        let published_at = match (patch.published_at, status) {
            (Some(at), _) => Some(at),
            (None, PostStatus::Published) => Some(now_ms),
            (None, _) => None,
        };
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_else(|| format!("Post {now_ms}")),
            content: patch.content.unwrap_or_default(),
            platforms: patch.platforms.unwrap_or_default(),
            media: patch.media.unwrap_or_default(),
            status,
            published_at,
            scheduled_for: patch.scheduled_for,
            engagement: Engagement::default(),
        }
    }

    fn merge_patch(&mut self, patch: SocialPostPatch, now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.content, patch.content);
        merge_field(&mut self.platforms, patch.platforms);
        merge_field(&mut self.media, patch.media);
        merge_field(&mut self.status, patch.status);
        if patch.published_at.is_some() {
            self.published_at = patch.published_at;
        } else if self.status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now_ms);
        }
        if patch.scheduled_for.is_some() {
            self.scheduled_for = patch.scheduled_for;
        }
        merge_field(&mut self.engagement, patch.engagement);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.content.as_str()]
    }
}

impl Staged for SocialPost {
    type Stage = PostStatus;
    const STAGES: &'static [PostStatus] =
        &[PostStatus::Draft, PostStatus::Scheduled, PostStatus::Published];

    fn stage(&self) -> PostStatus {
        self.status
    }

    fn set_stage(&mut self, stage: PostStatus) {
        self.status = stage;
    }

    fn stage_patch(stage: PostStatus) -> SocialPostPatch {
        SocialPostPatch {
            status: Some(stage),
            ..SocialPostPatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PostAnalytics, PostStatus, SocialPost, SocialPostPatch};
    use crate::model::record::Record;

    #[test]
    fn published_posts_get_publish_timestamp() {
        let patch = SocialPostPatch {
            content: Some("launch day".to_string()),
            ..SocialPostPatch::default()
        };
        let post = SocialPost::from_patch(patch, 1_000);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.published_at, Some(1_000));
    }

    #[test]
    fn engagement_rate_is_zero_without_impressions() {
        let post = SocialPost::from_patch(SocialPostPatch::default(), 0);
        assert_eq!(PostAnalytics::from_post(&post).engagement_rate, 0.0);
    }
}
