use crm_core::model::contact::ContactPatch;
use crm_core::model::workflow::WorkflowPatch;
use crm_core::view::editor::EditorMode;
use crm_core::view::list_view::LoadOutcome;
use crm_core::{
    Contact, EditorSession, ListView, MemoryRepository, PublishStatus, RepoError,
    ResourceService, ViewState, Workflow,
};
use std::time::Duration;

fn contacts() -> ResourceService<Contact, MemoryRepository<Contact>> {
    let service = ResourceService::new(MemoryRepository::new());
    for (name, company) in [("Ada", "Engines"), ("Grace", "Navy"), ("Linus", "Kernel Co")] {
        let mut patch = ContactPatch::new(name, format!("{}@example.com", name.to_lowercase()));
        patch.company = Some(company.to_string());
        service.create(patch).unwrap();
    }
    service
}

#[test]
fn list_view_loads_and_filters_by_search_term() {
    let service = contacts();
    let mut view = ListView::new();

    assert_eq!(view.load(&service), LoadOutcome::Applied);
    assert_eq!(view.state(), &ViewState::Ready);
    assert_eq!(view.visible().len(), 3);

    view.set_search("kernel");
    let names: Vec<_> = view.visible().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Linus"]);

    view.set_search("");
    assert_eq!(view.visible().len(), 3);
}

#[test]
fn list_view_reflects_mutations_after_reload() {
    let service = contacts();
    let mut view = ListView::new();
    view.load(&service);

    service.delete(2).unwrap();
    assert_eq!(view.records().len(), 3);
    view.load(&service);
    assert_eq!(view.records().len(), 2);
}

#[test]
fn slow_storage_still_resolves_latest_load() {
    let repo = MemoryRepository::<Contact>::new().with_latency(Duration::from_millis(5));
    let service = ResourceService::new(repo);
    service
        .create(ContactPatch::new("Ada", "ada@example.com"))
        .unwrap();

    let mut view = ListView::new();
    let stale = view.begin_load();
    let stale_result = service.get_all();
    let fresh = view.retry();
    let fresh_result = service.get_all();

    assert_eq!(view.finish_load(fresh, fresh_result), LoadOutcome::Applied);
    assert_eq!(view.finish_load(stale, stale_result), LoadOutcome::Stale);
    assert_eq!(view.records().len(), 1);
}

#[test]
fn editor_creates_then_switches_to_edit_mode() {
    let service = ResourceService::new(MemoryRepository::<Workflow>::new());
    let mut editor = EditorSession::<Workflow>::new();
    editor.patch_mut().name = Some("Welcome series".into());
    editor.patch_mut().trigger_type = Some("form_submitted".into());

    let created = editor.submit(&service).unwrap();
    assert_eq!(editor.mode(), EditorMode::Edit(created.id));
    assert_eq!(created.status, PublishStatus::Draft);

    editor.patch_mut().status = Some(PublishStatus::Active);
    let updated = editor.submit(&service).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, PublishStatus::Active);
    assert_eq!(updated.trigger_type, "form_submitted");
    assert_eq!(editor.record(), Some(&updated));
}

#[test]
fn editor_keeps_draft_after_validation_failure() {
    let service = ResourceService::new(MemoryRepository::<Workflow>::new());
    let mut editor = EditorSession::<Workflow>::new();
    *editor.patch_mut() = WorkflowPatch {
        trigger_type: Some("tag_added".into()),
        ..WorkflowPatch::default()
    };

    let err = editor.submit(&service).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(editor.mode(), EditorMode::Create);
    assert!(editor.last_error().is_some());
    assert_eq!(editor.draft().trigger_type.as_deref(), Some("tag_added"));

    editor.patch_mut().name = Some("Tagged".into());
    assert!(editor.submit(&service).is_ok());
    assert!(editor.last_error().is_none());
}

#[test]
fn editor_on_existing_record_updates_in_place() {
    let service = contacts();
    let existing = service.get_by_id(1).unwrap();
    let mut editor = EditorSession::edit(existing);
    editor.patch_mut().score = Some(95);

    let updated = editor.submit(&service).unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.score, 95);
    assert_eq!(updated.company, "Engines");
    assert_eq!(service.get_all().unwrap().len(), 3);
}
