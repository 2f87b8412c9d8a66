//! Integration tests for the in-memory project.
//!
//! Every test opens a fresh connection, so projects never share state.

use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;
use verso_core::{
    normalize_key, open_project, LoadOptions, Project, Resource, RevisionQuery, SearchQuery,
    Version, VersionRange,
};
use verso_memory::MemoryWorkspaceConnection;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn new_project() -> Arc<dyn Project> {
    init_tracing();
    let connection = MemoryWorkspaceConnection::default();
    open_project(&connection, "test").await.unwrap()
}

fn create() -> LoadOptions {
    LoadOptions::create_missing()
}

/// Checks that history and revisions agree and returns the history.
async fn check_history(project: &dyn Project, key: &str, len: usize) -> Vec<Version> {
    let history = project
        .load_resource_history(key, &VersionRange::all())
        .await
        .unwrap();
    assert_eq!(history.len(), len);

    let revisions = project
        .load_resource_revisions(key, &RevisionQuery::new(history.clone()))
        .await
        .unwrap();
    assert_eq!(revisions.len(), len);
    for (revision, expected) in revisions.iter().zip(&history) {
        assert_eq!(revision.updated(), Some(expected));
    }
    history
}

#[tokio::test]
async fn test_load_missing_resource_without_create() {
    let project = new_project().await;
    let resource = project
        .load_resource("README.txt", &LoadOptions::default())
        .await
        .unwrap();
    assert!(resource.is_none());
}

#[tokio::test]
async fn test_create_empty_resource() {
    let project = new_project().await;
    let resource = project
        .load_resource("README.txt", &create())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(resource.key(), "README.txt");
    assert!(resource.properties().is_empty());
    let created = resource.created().unwrap();
    let updated = resource.updated().unwrap();
    assert_eq!(created, updated);

    // Loading again returns the same revision.
    let again = project
        .load_resource("/README.txt", &create())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again, resource);
    check_history(project.as_ref(), "README.txt", 1).await;
}

#[tokio::test]
async fn test_create_resource_creates_ancestors() {
    let project = new_project().await;
    project
        .load_resource("docs/help/introduction", &create())
        .await
        .unwrap();

    for key in ["docs", "docs/help", "docs/help/introduction"] {
        let resource = project
            .load_resource(key, &LoadOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resource.key(), key);
    }
}

#[tokio::test]
async fn test_stored_key_is_normalized() {
    let project = new_project().await;
    for raw in ["a//b\\c/", "/about/", "\\\\docs\\help", "README.txt"] {
        let stored = project.store_resource(Resource::new(raw)).await.unwrap();
        let key = normalize_key(raw);
        assert_eq!(stored.key(), key);

        let loaded = project
            .load_resource(raw, &LoadOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.key(), key);
    }
}

#[tokio::test]
async fn test_load_resources_keyed_by_normalized_key() {
    let project = new_project().await;
    let keys: Vec<String> = [
        "about",
        "about/team",
        "about/news",
        "docs",
        "docs/help",
        "docs/help/introduction",
        "/path/to/resource",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect();

    let resources = project.load_resources(&keys, &create()).await.unwrap();
    assert_eq!(resources.len(), keys.len());
    for key in &keys {
        let key = normalize_key(key);
        assert_eq!(resources[&key].key(), key);
    }

    // Unknown keys are left out instead of failing.
    let missing = vec!["nowhere".to_string(), "about".to_string()];
    let resources = project
        .load_resources(&missing, &LoadOptions::default())
        .await
        .unwrap();
    assert_eq!(resources.len(), 1);
    assert!(resources.contains_key("about"));
}

#[tokio::test]
async fn test_load_child_resources() {
    let project = new_project().await;
    let keys: Vec<String> = [
        "about/team",
        "about/news",
        "about/news/x",
        "aboutus",
        "docs/help",
        "/path/to/resource",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect();
    project.load_resources(&keys, &create()).await.unwrap();

    let children = project.load_child_resources("about").await.unwrap();
    let names: HashSet<&str> = children.keys().map(String::as_str).collect();
    assert_eq!(names, HashSet::from(["about/team", "about/news"]));
    for (key, child) in &children {
        assert_eq!(child.key(), key);
    }

    let roots = project.load_child_resources("").await.unwrap();
    let names: HashSet<&str> = roots.keys().map(String::as_str).collect();
    assert_eq!(names, HashSet::from(["about", "aboutus", "docs", "path"]));

    assert!(project
        .load_child_resources("about/team")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_store_appends_revisions() {
    let project = new_project().await;
    let first = project
        .store_resource(Resource::new("README.txt").with_property("label", "v1"))
        .await
        .unwrap();
    assert_eq!(first.created(), first.updated());

    let mut edit = first.copy();
    edit.set_property("label", "v2");
    let second = project.store_resource(edit).await.unwrap();

    assert_eq!(second.created(), first.created());
    assert_ne!(second.updated(), first.updated());
    assert_eq!(
        second
            .updated()
            .unwrap()
            .compare_to(first.updated().unwrap()),
        std::cmp::Ordering::Greater
    );

    let mut third = second.copy();
    third.set_property("label", "v3");
    project.store_resource(third).await.unwrap();
    check_history(project.as_ref(), "README.txt", 3).await;
}

#[tokio::test]
async fn test_readme_revisions_scenario() {
    let project = new_project().await;
    let resource = project
        .load_resource("README.txt", &create())
        .await
        .unwrap()
        .unwrap();
    check_history(project.as_ref(), "README.txt", 1).await;

    let mut copy = resource.copy();
    copy.set_property("label", "Hello, world!");
    copy.set_property("description", "This is a short description");
    project.store_resource(copy).await.unwrap();

    let history = check_history(project.as_ref(), "README.txt", 2).await;
    let revisions = project
        .load_resource_revisions("README.txt", &RevisionQuery::new(history))
        .await
        .unwrap();
    assert!(revisions[0].properties().is_empty());
    assert_eq!(
        revisions[1].property("label"),
        Some(&json!("Hello, world!"))
    );
    assert_ne!(revisions[0].properties(), revisions[1].properties());
}

#[tokio::test]
async fn test_returned_resources_are_copies() {
    let project = new_project().await;
    let mut stored = project
        .store_resource(Resource::new("README.txt").with_property("label", "kept"))
        .await
        .unwrap();
    stored.set_property("label", "changed locally");

    let loaded = project
        .load_resource("README.txt", &LoadOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.property("label"), Some(&json!("kept")));
}

#[tokio::test]
async fn test_delete_resource_is_idempotent() {
    let project = new_project().await;
    project
        .store_resource(Resource::new("README.txt"))
        .await
        .unwrap();

    assert!(project.delete_resource("/README.txt/").await.unwrap());
    assert!(!project.delete_resource("README.txt").await.unwrap());
    assert!(project
        .load_resource("README.txt", &LoadOptions::default())
        .await
        .unwrap()
        .is_none());
    assert!(project
        .load_resource_history("README.txt", &VersionRange::all())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_load_modified_resources() {
    let project = new_project().await;
    let a1 = project
        .store_resource(Resource::new("a").with_property("n", 1))
        .await
        .unwrap();
    let b1 = project
        .store_resource(Resource::new("b").with_property("n", 1))
        .await
        .unwrap();
    let mut edit = a1.copy();
    edit.set_property("n", 2);
    let a2 = project.store_resource(edit).await.unwrap();

    let all = project
        .load_modified_resources(&VersionRange::all())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["a"], a2);
    assert_eq!(all["b"], b1);

    // Up to b1: only the first revision of "a" qualifies.
    let early = project
        .load_modified_resources(&VersionRange::until(b1.updated().unwrap().clone()))
        .await
        .unwrap();
    assert_eq!(early["a"], a1);
    assert_eq!(early["b"], b1);

    let late = project
        .load_modified_resources(&VersionRange::since(a2.updated().unwrap().clone()))
        .await
        .unwrap();
    assert_eq!(late.len(), 1);
    assert_eq!(late["a"], a2);
}

#[tokio::test]
async fn test_history_range() {
    let project = new_project().await;
    let mut versions = Vec::new();
    for n in 0..4 {
        let stored = project
            .store_resource(Resource::new("log").with_property("n", n))
            .await
            .unwrap();
        versions.push(stored.updated().unwrap().clone());
    }

    let middle = project
        .load_resource_history(
            "log",
            &VersionRange::between(versions[1].clone(), versions[2].clone()),
        )
        .await
        .unwrap();
    assert_eq!(middle, versions[1..3].to_vec());

    assert!(project
        .load_resource_history("missing", &VersionRange::all())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_revisions_match_by_id_or_timestamp() {
    let project = new_project().await;
    let mut stored = Vec::new();
    for n in 0..3 {
        stored.push(
            project
                .store_resource(Resource::new("doc").with_property("n", n))
                .await
                .unwrap(),
        );
    }
    let first = stored[0].updated().unwrap();
    let last = stored[2].updated().unwrap();

    let query = RevisionQuery::new(vec![
        Version::at(last.timestamp()),
        Version::from_id(first.version_id()),
    ]);
    let revisions = project
        .load_resource_revisions("doc", &query)
        .await
        .unwrap();
    assert_eq!(revisions, vec![stored[0].clone(), stored[2].clone()]);
}

#[tokio::test]
async fn test_search_is_unsupported() {
    let project = new_project().await;
    let err = project
        .search_resources(&SearchQuery::new("Hello"))
        .await
        .unwrap_err();
    assert!(err.is_unsupported());
}

#[tokio::test]
async fn test_concurrent_stores_keep_every_revision() {
    let project = new_project().await;
    let mut tasks = JoinSet::new();
    for n in 0..16 {
        let project = project.clone();
        tasks.spawn(async move {
            project
                .store_resource(Resource::new("shared").with_property("n", n))
                .await
                .unwrap()
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    let history = check_history(project.as_ref(), "shared", 16).await;
    let ids: HashSet<String> = history.iter().map(Version::version_id).collect();
    assert_eq!(ids.len(), 16);
    for pair in history.windows(2) {
        assert!(pair[0].timestamp() < pair[1].timestamp());
    }
}

#[tokio::test]
async fn test_id_only_range_past_ten_revisions() {
    let project = new_project().await;
    let mut ids = Vec::new();
    for n in 0..12 {
        let stored = project
            .store_resource(Resource::new("log").with_property("n", n))
            .await
            .unwrap();
        ids.push(stored.updated().unwrap().version_id());
    }

    let from_tenth = project
        .load_resource_history("log", &VersionRange::since(Version::from_id(ids[9].clone())))
        .await
        .unwrap();
    let found: Vec<String> = from_tenth.iter().map(Version::version_id).collect();
    assert_eq!(found, ids[9..].to_vec());

    let until_eleventh = project
        .load_resource_history("log", &VersionRange::until(Version::from_id(ids[10].clone())))
        .await
        .unwrap();
    assert_eq!(until_eleventh.len(), 11);
}
