use wardplan_core::db::open_db_in_memory;
use wardplan_core::{
    build_template, KeyValueStore, LinkDraft, ProjectService, ProjectServiceError,
    ProjectTemplate, SqliteKeyValueStore, StageDraft, StoreError, StoreResult, DEFAULT_LINKS,
    STORAGE_KEY,
};

/// Store double simulating a browser that denies storage access.
struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::MissingRequiredTable("local_store"))
    }

    fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::MissingRequiredTable("local_store"))
    }

    fn remove_item(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::MissingRequiredTable("local_store"))
    }
}

#[test]
fn empty_store_yields_default_project_and_persists_it() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let project = service.current_project();
    assert_eq!(project.stages.len(), 9);
    assert!(project
        .stages
        .iter()
        .all(|stage| stage.links.len() == DEFAULT_LINKS.len()));
    assert_eq!(project.items().count(), 1);

    let stored = SqliteKeyValueStore::try_new(&conn)
        .unwrap()
        .get_item(STORAGE_KEY)
        .unwrap();
    assert!(stored.is_some());
}

#[test]
fn persisted_wire_shape_uses_camel_case_keys() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    service.current_project();

    let raw = SqliteKeyValueStore::try_new(&conn)
        .unwrap()
        .get_item(STORAGE_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
    let stage = &value["stages"][0];
    assert!(stage.get("startDate").is_some());
    let item = &stage["links"][0]["items"][0];
    assert_eq!(item["status"], "todo");
    assert_eq!(item["priority"], "high");
}

#[test]
fn second_service_observes_persisted_mutations() {
    let conn = open_db_in_memory().unwrap();
    let mut first = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    first.current_project();
    let added = first.add_stage(StageDraft {
        name: "Medical equipment move-in".to_string(),
        ..StageDraft::default()
    });

    let mut second = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let project = second.current_project();
    assert_eq!(project.stages.len(), 10);
    assert!(project.stage(&added.id).is_some());
}

#[test]
fn load_project_data_replaces_current_project() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    service.current_project();

    let replacement = serde_json::json!({
        "name": "South tower",
        "stages": [
            { "id": "stage-1", "name": "Construction", "links": [] }
        ]
    })
    .to_string();

    let project = service.load_project_data(&replacement).unwrap();
    assert_eq!(project.name, "South tower");
    assert_eq!(project.stages.len(), 1);

    let mut reopened = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert_eq!(reopened.current_project().name, "South tower");
}

#[test]
fn malformed_import_fails_and_leaves_prior_state_untouched() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let original_name = service.current_project().name.clone();

    let err = service.load_project_data("{ not json").unwrap_err();
    assert!(matches!(err, ProjectServiceError::InvalidProjectData(_)));

    assert_eq!(service.current_project().name, original_name);
    assert_eq!(service.current_project().stages.len(), 9);
}

#[test]
fn export_requires_a_loaded_project() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let err = service.export_project_data().unwrap_err();
    assert!(matches!(err, ProjectServiceError::NoCurrentProject));
}

#[test]
fn export_round_trips_through_import() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let exported_from = service.current_project().clone();

    let payload = service.export_project_data().unwrap();

    let other_conn = open_db_in_memory().unwrap();
    let mut other = ProjectService::new(SqliteKeyValueStore::try_new(&other_conn).unwrap());
    let imported = other.load_project_data(&payload).unwrap();
    assert_eq!(*imported, exported_from);
}

#[test]
fn stage_crud_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    service.current_project();

    let stage = service.add_stage(StageDraft {
        name: "Landscaping".to_string(),
        ..StageDraft::default()
    });
    assert!(service.stage(&stage.id).is_some());

    let mut renamed = service.stage(&stage.id).unwrap().clone();
    renamed.status = "done".to_string();
    assert!(service.update_stage(renamed));
    assert_eq!(service.stage(&stage.id).unwrap().status, "done");

    assert!(service.remove_stage(&stage.id));
    assert!(service.stage(&stage.id).is_none());
}

#[test]
fn stage_mutations_without_loaded_project_return_false() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    assert!(!service.remove_stage("stage-anything"));
    assert!(service.stage("stage-anything").is_none());
}

#[test]
fn link_ops_resolve_through_the_stage() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let stage_id = service.current_project().stages[0].id.clone();

    let link = service
        .add_link(
            &stage_id,
            LinkDraft {
                name: "Commissioning".to_string(),
                owner: Some("Hospital lead".to_string()),
                ..LinkDraft::default()
            },
        )
        .unwrap();
    assert!(service.link(&stage_id, &link.id).is_some());
    assert!(!link.color.is_empty());

    assert!(service.remove_link(&stage_id, &link.id));
    assert!(service.link(&stage_id, &link.id).is_none());

    assert!(service
        .add_link(
            "stage-missing",
            LinkDraft {
                name: "Orphan".to_string(),
                ..LinkDraft::default()
            }
        )
        .is_none());
    assert!(!service.remove_link("stage-missing", "link-missing"));
}

#[test]
fn reset_project_restores_the_default_shape() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    service.current_project();
    service.add_stage(StageDraft {
        name: "Extra stage".to_string(),
        ..StageDraft::default()
    });
    assert_eq!(service.current_project().stages.len(), 10);

    let project = service.reset_project();
    assert_eq!(project.stages.len(), 9);

    let mut reopened = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert_eq!(reopened.current_project().stages.len(), 9);
}

#[test]
fn template_application_goes_through_typed_load() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());

    let project = service.load_project(build_template(ProjectTemplate::Community));
    assert_eq!(project.stages.len(), 6);
    assert!(project.stages.iter().all(|stage| stage.links.len() == 5));

    let mut reopened = ProjectService::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert_eq!(reopened.current_project().stages.len(), 6);
}

#[test]
fn denied_storage_keeps_the_session_usable() {
    let mut service = ProjectService::new(FailingStore);

    let project = service.current_project();
    assert_eq!(project.stages.len(), 9);

    let stage = service.add_stage(StageDraft {
        name: "Works without storage".to_string(),
        ..StageDraft::default()
    });
    assert!(service.stage(&stage.id).is_some());
    assert_eq!(service.current_project().stages.len(), 10);

    let project = service.reset_project();
    assert_eq!(project.stages.len(), 9);
}
