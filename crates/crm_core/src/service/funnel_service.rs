//! Funnel use-case service.
//!
//! # Responsibility
//! - Report conversion and drop-off figures for funnel pages.
//! - Edit and reorder funnel steps stored in a page's sections.
//!
//! # Invariants
//! - Step edits preserve the step id.
//! - Reordering renumbers `order` from 0 and `step_number` from 1.

use crate::model::landing_page::{
    FunnelReport, FunnelSection, FunnelSectionPatch, LandingPage, LandingPagePatch,
};
use crate::model::record::RecordId;
use crate::repo::{RecordRepository, RepoError};
use crate::service::resource_service::ResourceService;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for funnel use-cases.
#[derive(Debug)]
pub enum FunnelError {
    /// Page exists but is a plain page.
    NotAFunnel(RecordId),
    /// Step id is not among the page's sections.
    StepNotFound { page_id: RecordId, step_id: String },
    Repo(RepoError),
}

impl Display for FunnelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAFunnel(id) => write!(f, "landing page {id} is not a funnel"),
            Self::StepNotFound { page_id, step_id } => {
                write!(f, "funnel step `{step_id}` not found on page {page_id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FunnelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FunnelError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Funnel facade over landing page storage.
pub struct FunnelService<S: RecordRepository<LandingPage>> {
    pages: ResourceService<LandingPage, S>,
}

impl<S: RecordRepository<LandingPage>> FunnelService<S> {
    pub fn new(repo: S) -> Self {
        Self {
            pages: ResourceService::new(repo),
        }
    }

    /// Plain CRUD over landing pages.
    pub fn pages(&self) -> &ResourceService<LandingPage, S> {
        &self.pages
    }

    /// Stored counters plus conversion rates and drop-off points.
    pub fn get_funnel_analytics(&self, id: RecordId) -> Result<FunnelReport, FunnelError> {
        let page = self.load_funnel(id)?;
        Ok(page.funnel_report())
    }

    /// Merges `patch` into one funnel step.
    pub fn update_funnel_step(
        &self,
        id: RecordId,
        step_id: &str,
        patch: FunnelSectionPatch,
    ) -> Result<LandingPage, FunnelError> {
        let page = self.pages.get_by_id(id)?;
        let mut sections = page.sections;
        let section = sections
            .iter_mut()
            .find(|section| section.id == step_id)
            .ok_or_else(|| FunnelError::StepNotFound {
                page_id: id,
                step_id: step_id.to_string(),
            })?;
        section.merge_patch(patch);

        Ok(self.pages.update(id, sections_patch(sections))?)
    }

    /// Rewrites section order to match `step_order`.
    ///
    /// Sections not named in `step_order` are dropped from the page.
    pub fn reorder_funnel_steps(
        &self,
        id: RecordId,
        step_order: &[&str],
    ) -> Result<LandingPage, FunnelError> {
        let page = self.pages.get_by_id(id)?;
        let mut reordered = Vec::with_capacity(step_order.len());
        for (index, step_id) in step_order.iter().enumerate() {
            let mut section = page
                .sections
                .iter()
                .find(|section| section.id == *step_id)
                .cloned()
                .ok_or_else(|| FunnelError::StepNotFound {
                    page_id: id,
                    step_id: (*step_id).to_string(),
                })?;
            section.order = index as u32;
            section.step_number = index as u32 + 1;
            reordered.push(section);
        }

        Ok(self.pages.update(id, sections_patch(reordered))?)
    }

    fn load_funnel(&self, id: RecordId) -> Result<LandingPage, FunnelError> {
        let page = self.pages.get_by_id(id)?;
        if !page.is_funnel() {
            return Err(FunnelError::NotAFunnel(id));
        }
        Ok(page)
    }
}

fn sections_patch(sections: Vec<FunnelSection>) -> LandingPagePatch {
    LandingPagePatch {
        sections: Some(sections),
        ..LandingPagePatch::default()
    }
}
