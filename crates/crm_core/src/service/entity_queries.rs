//! Entity-specific read helpers layered on `ResourceService`.

use crate::model::appointment::Appointment;
use crate::model::landing_page::LandingPage;
use crate::model::record::RecordId;
use crate::model::section_block::SectionBlock;
use crate::model::social_post::{PostAnalytics, SocialPost};
use crate::repo::{RecordRepository, RepoResult};
use crate::service::resource_service::ResourceService;

impl<S: RecordRepository<Appointment>> ResourceService<Appointment, S> {
    /// Appointments starting at or after `start` and ending at or before `end`.
    pub fn get_by_date_range(&self, start: i64, end: i64) -> RepoResult<Vec<Appointment>> {
        self.find(|appointment| appointment.within(start, end))
    }

    /// Appointments linked to one contact.
    pub fn get_for_contact(&self, contact_id: RecordId) -> RepoResult<Vec<Appointment>> {
        self.find(|appointment| appointment.contact_id == Some(contact_id))
    }
}

impl<S: RecordRepository<SocialPost>> ResourceService<SocialPost, S> {
    /// Engagement report for one post.
    pub fn get_analytics(&self, id: RecordId) -> RepoResult<PostAnalytics> {
        let post = self.get_by_id(id)?;
        Ok(PostAnalytics::from_post(&post))
    }
}

impl<S: RecordRepository<SectionBlock>> ResourceService<SectionBlock, S> {
    pub fn get_by_type(&self, kind: &str) -> RepoResult<Vec<SectionBlock>> {
        self.find(|block| block.kind == kind)
    }
}

impl<S: RecordRepository<LandingPage>> ResourceService<LandingPage, S> {
    /// The published page served at `slug`, if any.
    pub fn get_by_slug(&self, slug: &str) -> RepoResult<Option<LandingPage>> {
        Ok(self
            .find(|page| page.is_published && page.slug == slug)?
            .into_iter()
            .next())
    }
}
