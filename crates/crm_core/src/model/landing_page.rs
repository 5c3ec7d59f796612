//! Landing page and funnel domain model.
//!
//! # Responsibility
//! - Define the canonical landing page record, including funnel sections.
//! - Provide pure funnel arithmetic (step conversion and drop-off detection).
//!
//! # Invariants
//! - `slug` is lowercase kebab-case.
//! - Funnel section ids are stable across step updates and reorders.
//! - Rates are percentages rounded to one decimal place.

use crate::model::normalize::{embedded_json, epoch_ms, opt_embedded_json};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, ValidationError, UNASSIGNED_ID,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));
static STEP_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^step(\d+)Completions$").expect("valid step key regex"));

/// Drop-off above this percentage is reported.
pub const DROP_OFF_THRESHOLD: f64 = 50.0;
/// Drop-off above this percentage is reported as `High`.
pub const HIGH_DROP_OFF_THRESHOLD: f64 = 70.0;

/// Page flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    #[default]
    Page,
    Funnel,
}

/// SEO and presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    #[serde(alias = "metaTitle")]
    pub meta_title: String,
    #[serde(alias = "metaDescription")]
    pub meta_description: String,
    pub favicon: String,
    #[serde(alias = "customCSS")]
    pub custom_css: String,
}

/// One page section; for funnels, one funnel step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelSection {
    pub id: String,
    /// Block type such as `hero`, `form` or `checkout`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub order: u32,
    #[serde(alias = "stepNumber")]
    pub step_number: u32,
    pub content: Value,
}

/// Partial update for one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelSectionPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl FunnelSection {
    /// Merges `patch`; `id`, `order` and `step_number` are kept.
    pub fn merge_patch(&mut self, patch: FunnelSectionPatch) {
        merge_field(&mut self.kind, patch.kind);
        merge_field(&mut self.title, patch.title);
        merge_field(&mut self.content, patch.content);
    }
}

/// Stored funnel counters: page views and completions per step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFunnelCounters")]
pub struct FunnelCounters {
    pub total_views: u64,
    /// Completions for step 1, step 2, ... in order.
    pub step_completions: Vec<u64>,
}

/// Accepts both the canonical shape and legacy `stepNCompletions` keys.
#[derive(Deserialize)]
struct RawFunnelCounters {
    #[serde(default, alias = "totalViews")]
    total_views: u64,
    #[serde(default)]
    step_completions: Option<Vec<u64>>,
    #[serde(flatten)]
    legacy: BTreeMap<String, Value>,
}

impl From<RawFunnelCounters> for FunnelCounters {
    fn from(raw: RawFunnelCounters) -> Self {
        let step_completions = match raw.step_completions {
            Some(steps) => steps,
            None => {
                let mut numbered: Vec<(u32, u64)> = raw
                    .legacy
                    .iter()
                    .filter_map(|(key, value)| {
                        let step = STEP_KEY_RE.captures(key)?.get(1)?.as_str().parse().ok()?;
                        Some((step, value.as_u64().unwrap_or(0)))
                    })
                    .collect();
                numbered.sort_by_key(|(step, _)| *step);
                numbered.into_iter().map(|(_, count)| count).collect()
            }
        };
        Self {
            total_views: raw.total_views,
            step_completions,
        }
    }
}

/// Conversion between two consecutive funnel steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRate {
    pub from_step: usize,
    pub to_step: usize,
    /// Percentage of `from_step` completions that completed `to_step`.
    pub rate: f64,
}

/// Severity of a funnel drop-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOffSeverity {
    Medium,
    High,
}

/// Funnel stage losing more than half of its visitors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropOffPoint {
    /// 1-based stage index; stage 1 is the page view stage.
    pub step: usize,
    pub drop_off_rate: f64,
    pub severity: DropOffSeverity,
}

/// Counters plus derived conversion and drop-off figures.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelReport {
    pub counters: FunnelCounters,
    pub conversion_rates: Vec<ConversionRate>,
    pub drop_off_points: Vec<DropOffPoint>,
}

impl FunnelCounters {
    /// Conversion from each step to the next.
    pub fn conversion_rates(&self) -> Vec<ConversionRate> {
        self.step_completions
            .windows(2)
            .enumerate()
            .map(|(index, pair)| ConversionRate {
                from_step: index + 1,
                to_step: index + 2,
                rate: percentage(pair[1] as f64, pair[0]),
            })
            .collect()
    }

    /// Stages in `[views, step1, step2, ...]` losing more than 50%.
    pub fn drop_off_points(&self) -> Vec<DropOffPoint> {
        let stages: Vec<u64> = std::iter::once(self.total_views)
            .chain(self.step_completions.iter().copied())
            .collect();

        stages
            .windows(2)
            .enumerate()
            .filter_map(|(index, pair)| {
                let lost = pair[0] as f64 - pair[1] as f64;
                let drop_off_rate = percentage(lost, pair[0]);
                if drop_off_rate <= DROP_OFF_THRESHOLD {
                    return None;
                }
                let severity = if drop_off_rate > HIGH_DROP_OFF_THRESHOLD {
                    DropOffSeverity::High
                } else {
                    DropOffSeverity::Medium
                };
                Some(DropOffPoint {
                    step: index + 1,
                    drop_off_rate,
                    severity,
                })
            })
            .collect()
    }

    pub fn report(&self) -> FunnelReport {
        FunnelReport {
            counters: self.clone(),
            conversion_rates: self.conversion_rates(),
            drop_off_points: self.drop_off_points(),
        }
    }
}

/// `numerator / denominator * 100`, rounded to one decimal; `0` for empty stages.
fn percentage(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator / denominator as f64 * 1000.0).round() / 10.0
}

/// Canonical landing page record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default, alias = "isPublished")]
    pub is_published: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default, rename = "type")]
    pub kind: PageKind,
    #[serde(default)]
    pub settings: PageSettings,
    #[serde(default, deserialize_with = "embedded_json")]
    pub sections: Vec<FunnelSection>,
    #[serde(default, deserialize_with = "embedded_json")]
    pub analytics: FunnelCounters,
    #[serde(default, alias = "createdAt", deserialize_with = "epoch_ms")]
    pub created_at: i64,
    #[serde(default, alias = "updatedAt", deserialize_with = "epoch_ms")]
    pub updated_at: i64,
}

/// Partial landing page update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingPagePatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(alias = "isPublished", skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PageKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<PageSettings>,
    #[serde(
        deserialize_with = "opt_embedded_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub sections: Option<Vec<FunnelSection>>,
    #[serde(
        deserialize_with = "opt_embedded_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub analytics: Option<FunnelCounters>,
}

impl LandingPage {
    pub fn is_funnel(&self) -> bool {
        self.kind == PageKind::Funnel
    }

    /// Funnel report derived from stored counters.
    pub fn funnel_report(&self) -> FunnelReport {
        self.analytics.report()
    }
}

impl Record for LandingPage {
    type Patch = LandingPagePatch;
    const COLLECTION: &'static str = "landing_pages";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &LandingPagePatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "name", patch.name.as_deref())?;
        require_text(Self::COLLECTION, "slug", patch.slug.as_deref())
    }

    fn from_patch(patch: LandingPagePatch, now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_default(),
            description: patch.description.unwrap_or_default(),
            slug: patch.slug.unwrap_or_default(),
            is_published: patch.is_published.unwrap_or(false),
            views: patch.views.unwrap_or(0),
            kind: patch.kind.unwrap_or_default(),
            settings: patch.settings.unwrap_or_default(),
            sections: patch.sections.unwrap_or_default(),
            analytics: patch.analytics.unwrap_or_default(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    fn merge_patch(&mut self, patch: LandingPagePatch, now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.description, patch.description);
        merge_field(&mut self.slug, patch.slug);
        merge_field(&mut self.is_published, patch.is_published);
        merge_field(&mut self.views, patch.views);
        merge_field(&mut self.kind, patch.kind);
        merge_field(&mut self.settings, patch.settings);
        merge_field(&mut self.sections, patch.sections);
        merge_field(&mut self.analytics, patch.analytics);
        self.updated_at = now_ms;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !SLUG_RE.is_match(self.slug.as_str()) {
            return Err(ValidationError::InvalidValue {
                collection: Self::COLLECTION,
                field: "slug",
                message: format!("`{}` is not lowercase kebab-case", self.slug),
            });
        }
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.slug.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::{DropOffSeverity, FunnelCounters};
    use serde_json::json;

    fn counters(total_views: u64, steps: &[u64]) -> FunnelCounters {
        FunnelCounters {
            total_views,
            step_completions: steps.to_vec(),
        }
    }

    #[test]
    fn conversion_rates_round_to_one_decimal() {
        let rates = counters(1000, &[300, 100, 0, 0]).conversion_rates();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].rate, 33.3);
        assert_eq!(rates[1].rate, 0.0);
        assert_eq!(rates[2].rate, 0.0);
    }

    #[test]
    fn drop_off_thresholds_are_strict() {
        // views->1: 50% (not reported), 1->2: 70% (medium), 2->3: 80% (high)
        let points = counters(200, &[100, 30, 6]).drop_off_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].step, 2);
        assert_eq!(points[0].severity, DropOffSeverity::Medium);
        assert_eq!(points[1].step, 3);
        assert_eq!(points[1].severity, DropOffSeverity::High);
    }

    #[test]
    fn legacy_step_keys_are_normalized() {
        let value = json!({
            "totalViews": 500,
            "step2Completions": 40,
            "step1Completions": 120
        });
        let decoded: FunnelCounters = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, counters(500, &[120, 40]));
    }
}
