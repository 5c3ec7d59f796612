use crm_core::model::landing_page::{DropOffSeverity, FunnelSectionPatch};
use crm_core::{FunnelError, FunnelService, LandingPage, MemoryRepository};
use serde_json::json;

fn service() -> FunnelService<MemoryRepository<LandingPage>> {
    // Legacy payloads carry sections as a JSON string.
    let sections = json!([
        {"id": "optin", "type": "form", "title": "Opt in", "order": 0, "stepNumber": 1},
        {"id": "watch", "type": "video", "title": "Watch", "order": 1, "stepNumber": 2},
        {"id": "buy", "type": "checkout", "title": "Buy", "order": 2, "stepNumber": 3}
    ])
    .to_string();
    let pages: Vec<LandingPage> = serde_json::from_value(json!([
        {
            "id": 1,
            "name": "Webinar funnel",
            "slug": "webinar",
            "isPublished": true,
            "type": "funnel",
            "sections": sections,
            "analytics": {
                "totalViews": 1000,
                "step1Completions": 400,
                "step2Completions": 200,
                "step3Completions": 50
            }
        },
        {"id": 2, "name": "About", "slug": "about", "isPublished": true}
    ]))
    .unwrap();
    FunnelService::new(MemoryRepository::with_records(pages))
}

#[test]
fn analytics_report_conversion_and_drop_off() {
    let report = service().get_funnel_analytics(1).unwrap();

    let rates: Vec<_> = report.conversion_rates.iter().map(|rate| rate.rate).collect();
    assert_eq!(rates, vec![50.0, 25.0]);

    // views->optin 60%, optin->watch exactly 50%, watch->buy 75%
    assert_eq!(report.drop_off_points.len(), 2);
    assert_eq!(report.drop_off_points[0].step, 1);
    assert_eq!(report.drop_off_points[0].drop_off_rate, 60.0);
    assert_eq!(report.drop_off_points[0].severity, DropOffSeverity::Medium);
    assert_eq!(report.drop_off_points[1].step, 3);
    assert_eq!(report.drop_off_points[1].severity, DropOffSeverity::High);
}

#[test]
fn analytics_on_plain_page_is_rejected() {
    let err = service().get_funnel_analytics(2).unwrap_err();
    assert!(matches!(err, FunnelError::NotAFunnel(2)));
}

#[test]
fn analytics_on_missing_page_is_not_found() {
    match service().get_funnel_analytics(9).unwrap_err() {
        FunnelError::Repo(err) => assert!(err.is_not_found()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn step_update_keeps_id_and_position() {
    let service = service();
    let page = service
        .update_funnel_step(
            1,
            "watch",
            FunnelSectionPatch {
                title: Some("Watch the replay".into()),
                ..FunnelSectionPatch::default()
            },
        )
        .unwrap();

    let step = &page.sections[1];
    assert_eq!(step.id, "watch");
    assert_eq!(step.title, "Watch the replay");
    assert_eq!(step.kind, "video");
    assert_eq!(step.step_number, 2);
    assert_eq!(service.pages().get_by_id(1).unwrap(), page);
}

#[test]
fn unknown_step_is_reported() {
    let err = service()
        .update_funnel_step(1, "upsell", FunnelSectionPatch::default())
        .unwrap_err();
    assert!(matches!(err, FunnelError::StepNotFound { page_id: 1, .. }));
}

#[test]
fn reorder_renumbers_and_drops_unlisted_steps() {
    let page = service()
        .reorder_funnel_steps(1, &["buy", "optin"])
        .unwrap();

    let layout: Vec<_> = page
        .sections
        .iter()
        .map(|section| (section.id.as_str(), section.order, section.step_number))
        .collect();
    assert_eq!(layout, vec![("buy", 0, 1), ("optin", 1, 2)]);
}

#[test]
fn published_page_is_found_by_slug() {
    let service = service();
    let page = service.pages().get_by_slug("about").unwrap().unwrap();
    assert_eq!(page.id, 2);
    assert!(service.pages().get_by_slug("missing").unwrap().is_none());
}
