//! Core domain logic for the CRM.
//! Records, storage backends, use-case services and headless view state.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{ConfigError, CoreConfig, StorageConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::appointment::{Appointment, AppointmentStatus};
pub use model::campaign::{Campaign, CampaignStatus};
pub use model::contact::{Contact, ContactStage};
pub use model::form::{Form, PublishStatus};
pub use model::landing_page::{FunnelReport, LandingPage};
pub use model::record::{Record, RecordId, Staged, ValidationError};
pub use model::section_block::SectionBlock;
pub use model::sms::{OutgoingMessage, SmsConversation, SmsMessage};
pub use model::social_post::SocialPost;
pub use model::workflow::Workflow;
pub use repo::memory_repo::MemoryRepository;
pub use repo::remote_repo::{RemoteClient, RemoteRepository};
pub use repo::sqlite_repo::SqliteRecordRepository;
pub use repo::{RecordRepository, RepoError, RepoResult};
pub use service::dashboard::DashboardStats;
pub use service::funnel_service::{FunnelError, FunnelService};
pub use service::resource_service::ResourceService;
pub use service::sms_service::SmsService;
pub use view::editor::EditorSession;
pub use view::list_view::{ListView, ViewState};
pub use view::pipeline::PipelineBoard;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
