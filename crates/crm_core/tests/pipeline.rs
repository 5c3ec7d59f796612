use crm_core::model::record::RecordId;
use crm_core::repo::remote_repo::RemoteError;
use crm_core::view::pipeline::MoveOutcome;
use crm_core::{
    Contact, ContactStage, MemoryRepository, PipelineBoard, RecordRepository, RepoError,
    RepoResult, ResourceService,
};
use serde_json::json;

fn seeded() -> MemoryRepository<Contact> {
    let contacts: Vec<Contact> = serde_json::from_value(json!([
        {"id": 1, "name": "Ada", "email": "ada@example.com", "stage": "Lead"},
        {"id": 2, "name": "Grace", "email": "grace@example.com", "stage": "Qualified"}
    ]))
    .unwrap();
    MemoryRepository::with_records(contacts)
}

fn column_sizes(board: &PipelineBoard<Contact>) -> Vec<(ContactStage, usize)> {
    board
        .columns()
        .into_iter()
        .map(|column| (column.stage, column.records.len()))
        .collect()
}

/// Memory storage whose updates always fail.
struct RejectingUpdates(MemoryRepository<Contact>);

impl RecordRepository<Contact> for RejectingUpdates {
    fn list_records(&self) -> RepoResult<Vec<Contact>> {
        self.0.list_records()
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Contact>> {
        self.0.get_record(id)
    }

    fn insert_record(&self, record: Contact) -> RepoResult<Contact> {
        self.0.insert_record(record)
    }

    fn update_record(&self, _record: &Contact) -> RepoResult<Contact> {
        Err(RepoError::Remote(RemoteError {
            collection: "contacts",
            operation: "update",
            message: "backend unavailable".into(),
        }))
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        self.0.delete_record(id)
    }
}

#[test]
fn update_stage_moves_record_between_columns() {
    let service = ResourceService::new(seeded());
    service.update_stage(1, ContactStage::Qualified).unwrap();

    assert_eq!(service.get_by_id(1).unwrap().stage, ContactStage::Qualified);
    let board = PipelineBoard::load(&service).unwrap();
    let sizes = column_sizes(&board);
    assert!(sizes.contains(&(ContactStage::Qualified, 2)));
    assert!(sizes.contains(&(ContactStage::Lead, 0)));
}

#[test]
fn get_by_stage_uses_exact_match() {
    let service = ResourceService::new(seeded());
    let leads = service.get_by_stage(ContactStage::Lead).unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].id, 1);
    assert!(service.get_by_stage(ContactStage::Customer).unwrap().is_empty());
}

#[test]
fn drop_persists_and_refreshes_local_copy() {
    let service = ResourceService::new(seeded());
    let mut board = PipelineBoard::load(&service).unwrap();

    let outcome = board
        .move_record(1, ContactStage::Proposal, &service)
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Moved);
    assert_eq!(service.get_by_id(1).unwrap().stage, ContactStage::Proposal);
    assert_eq!(
        column_sizes(&board),
        vec![
            (ContactStage::Lead, 0),
            (ContactStage::Qualified, 1),
            (ContactStage::Proposal, 1),
            (ContactStage::Customer, 0)
        ]
    );
}

#[test]
fn drop_into_same_column_or_unknown_id_is_a_no_op() {
    let service = ResourceService::new(seeded());
    let mut board = PipelineBoard::load(&service).unwrap();

    assert_eq!(
        board.move_record(2, ContactStage::Qualified, &service).unwrap(),
        MoveOutcome::Unchanged
    );
    assert_eq!(
        board.move_record(77, ContactStage::Customer, &service).unwrap(),
        MoveOutcome::Unchanged
    );
}

#[test]
fn failed_drop_rolls_back_local_stage() {
    let service = ResourceService::new(RejectingUpdates(seeded()));
    let mut board = PipelineBoard::load(&service).unwrap();
    let before = column_sizes(&board);

    let err = board
        .move_record(1, ContactStage::Customer, &service)
        .unwrap_err();
    assert!(matches!(err, RepoError::Remote(_)));
    assert_eq!(column_sizes(&board), before);
    assert_eq!(board.records()[0].stage, ContactStage::Lead);
    assert_eq!(service.get_by_id(1).unwrap().stage, ContactStage::Lead);
}
