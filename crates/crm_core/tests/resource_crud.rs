use crm_core::model::campaign::{CampaignPatch, CampaignStatus};
use crm_core::model::contact::ContactPatch;
use crm_core::{
    Campaign, Contact, MemoryRepository, RecordRepository, RepoError, ResourceService,
    ValidationError,
};

fn campaigns() -> ResourceService<Campaign, MemoryRepository<Campaign>> {
    ResourceService::new(MemoryRepository::new())
}

fn named(name: &str) -> CampaignPatch {
    CampaignPatch {
        name: Some(name.to_string()),
        ..CampaignPatch::default()
    }
}

#[test]
fn create_assigns_sequential_ids_from_one() {
    let service = campaigns();
    let a = service.create(named("A")).unwrap();
    let b = service.create(named("B")).unwrap();

    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
}

#[test]
fn create_merges_over_entity_defaults() {
    let service = campaigns();
    let created = service.create(named("Launch")).unwrap();

    assert_eq!(created.status, CampaignStatus::Draft);
    assert_eq!(created.sent, 0);
    assert_eq!(created.open_rate, 0.0);
    assert!(created.created_at > 0);
    assert_eq!(service.get_by_id(created.id).unwrap(), created);
}

#[test]
fn create_ids_stay_strictly_increasing_after_deletes() {
    let service = campaigns();
    let mut last = 0;
    for round in 0..5 {
        let created = service.create(named(&format!("c{round}"))).unwrap();
        assert!(created.id > last);
        last = created.id;
        if round % 2 == 0 {
            service.delete(created.id).unwrap();
        }
    }
}

#[test]
fn create_without_required_field_is_rejected_before_storage() {
    let service = ResourceService::new(MemoryRepository::<Contact>::new());
    let err = service
        .create(ContactPatch {
            name: Some("Ada".into()),
            ..ContactPatch::default()
        })
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingField { field: "email", .. })
    ));
    assert!(service.get_all().unwrap().is_empty());
}

#[test]
fn update_overwrites_present_fields_and_keeps_the_rest() {
    let service = campaigns();
    let created = service
        .create(CampaignPatch {
            name: Some("Spring".into()),
            subject: Some("Hello".into()),
            recipients: Some(300),
            ..CampaignPatch::default()
        })
        .unwrap();

    let updated = service
        .update(
            created.id,
            CampaignPatch {
                subject: Some("Hello again".into()),
                status: Some(CampaignStatus::Scheduled),
                ..CampaignPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.subject, "Hello again");
    assert_eq!(updated.status, CampaignStatus::Scheduled);
    assert_eq!(updated.name, "Spring");
    assert_eq!(updated.recipients, 300);
    assert_eq!(service.get_by_id(created.id).unwrap(), updated);
}

#[test]
fn update_missing_record_is_not_found() {
    let service = campaigns();
    let err = service.update(7, named("ghost")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn deleted_record_is_not_found() {
    let service = campaigns();
    let created = service.create(named("A")).unwrap();

    assert!(service.delete(created.id).unwrap());
    let err = service.get_by_id(created.id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            collection: "campaigns",
            id: 1
        }
    ));
}

#[test]
fn delete_unknown_id_leaves_collection_unchanged() {
    let service = campaigns();
    service.create(named("A")).unwrap();
    service.create(named("B")).unwrap();
    let before = service.get_all().unwrap();

    let err = service.delete(99).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(service.get_all().unwrap(), before);
}

#[test]
fn get_all_returns_independent_copies() {
    let service = campaigns();
    service.create(named("A")).unwrap();

    let mut first = service.get_all().unwrap();
    let second = service.get_all().unwrap();
    assert_eq!(first, second);

    first[0].name = "changed locally".into();
    assert_eq!(service.get_all().unwrap()[0].name, "A");
    assert_eq!(service.repo().list_records().unwrap(), second);
}

#[test]
fn find_filters_in_stored_order() {
    let service = campaigns();
    for name in ["Alpha", "Beta", "Alpine"] {
        service.create(named(name)).unwrap();
    }

    let found = service.find(|campaign| campaign.name.starts_with("Al")).unwrap();
    let ids: Vec<_> = found.iter().map(|campaign| campaign.id).collect();
    assert_eq!(ids, vec![1, 3]);
}
