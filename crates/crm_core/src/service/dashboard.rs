//! Dashboard summary figures.
//!
//! # Invariants
//! - Averages over empty sets are `0.0`, never NaN.

use crate::model::campaign::{Campaign, CampaignStatus};
use crate::model::contact::Contact;
use crate::model::form::{Form, PublishStatus};
use crate::model::workflow::Workflow;
use crate::repo::{RecordRepository, RepoResult};
use crate::service::resource_service::ResourceService;
use serde::Serialize;

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_contacts: usize,
    pub active_campaigns: usize,
    pub total_forms: usize,
    pub active_workflows: usize,
    pub average_conversion_rate: f64,
    pub average_open_rate: f64,
}

impl DashboardStats {
    /// Computes figures from already-loaded collections.
    pub fn collect(
        contacts: &[Contact],
        campaigns: &[Campaign],
        forms: &[Form],
        workflows: &[Workflow],
    ) -> Self {
        Self {
            total_contacts: contacts.len(),
            active_campaigns: campaigns
                .iter()
                .filter(|campaign| campaign.status == CampaignStatus::Active)
                .count(),
            total_forms: forms.len(),
            active_workflows: workflows
                .iter()
                .filter(|workflow| workflow.status == PublishStatus::Active)
                .count(),
            average_conversion_rate: mean(forms.iter().map(|form| form.conversion_rate)),
            average_open_rate: mean(campaigns.iter().map(|campaign| campaign.open_rate)),
        }
    }

    /// Loads every collection through its service and computes figures.
    pub fn load<C, M, F, W>(
        contacts: &ResourceService<Contact, C>,
        campaigns: &ResourceService<Campaign, M>,
        forms: &ResourceService<Form, F>,
        workflows: &ResourceService<Workflow, W>,
    ) -> RepoResult<Self>
    where
        C: RecordRepository<Contact>,
        M: RecordRepository<Campaign>,
        F: RecordRepository<Form>,
        W: RecordRepository<Workflow>,
    {
        Ok(Self::collect(
            &contacts.get_all()?,
            &campaigns.get_all()?,
            &forms.get_all()?,
            &workflows.get_all()?,
        ))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
