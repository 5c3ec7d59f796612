use crm_core::model::section_block::SectionBlock;
use crm_core::model::social_post::SocialPostPatch;
use crm_core::{Appointment, MemoryRepository, ResourceService, SocialPost};
use serde_json::json;

#[test]
fn date_range_keeps_appointments_fully_inside() {
    let appointments: Vec<Appointment> = serde_json::from_value(json!([
        {"id": 1, "title": "Intro call", "start": 1000, "end": 2000, "contactId": 7},
        {"id": 2, "title": "Demo", "start": 1500, "end": 3500},
        {"id": 3, "title": "Review", "start": 3000, "end": 3200, "contactId": 7}
    ]))
    .unwrap();
    let service = ResourceService::new(MemoryRepository::with_records(appointments));

    let in_range: Vec<_> = service
        .get_by_date_range(1000, 3200)
        .unwrap()
        .iter()
        .map(|appointment| appointment.id)
        .collect();
    assert_eq!(in_range, vec![1, 3]);

    let for_contact = service.get_for_contact(7).unwrap();
    assert_eq!(for_contact.len(), 2);
}

#[test]
fn post_analytics_derive_engagement_rate() {
    let service = ResourceService::new(MemoryRepository::<SocialPost>::new());
    let post = service
        .create(SocialPostPatch {
            content: Some("Launch day".into()),
            ..SocialPostPatch::default()
        })
        .unwrap();
    assert!(post.published_at.is_some());

    let stored: SocialPost = serde_json::from_value(json!({
        "id": post.id,
        "content": "Launch day",
        "engagement_likes": 30,
        "engagement_comments": 15,
        "engagement_shares": 5,
        "engagement_impressions": 1000
    }))
    .unwrap();
    let service = ResourceService::new(MemoryRepository::with_records(vec![stored]));

    let analytics = service.get_analytics(post.id).unwrap();
    assert_eq!(analytics.engagement.likes, 30);
    assert_eq!(analytics.engagement_rate, 5.0);
    assert!(service.get_analytics(99).unwrap_err().is_not_found());
}

#[test]
fn section_blocks_filter_by_type() {
    let blocks: Vec<SectionBlock> = serde_json::from_value(json!([
        {"id": 1, "name": "Big hero", "type": "hero", "content": {"heading": "Hi"}},
        {"id": 2, "name": "Quotes", "type": "testimonials"},
        {"id": 3, "name": "Small hero", "type": "hero"}
    ]))
    .unwrap();
    let service = ResourceService::new(MemoryRepository::with_records(blocks));

    let heroes = service.get_by_type("hero").unwrap();
    assert_eq!(heroes.len(), 2);
    assert_eq!(heroes[0].content["heading"], "Hi");
}
