//! Repository Integration Tests
//!
//! Tests for EntryRepository with in-memory SQLite database.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;

    use crate::domain::ordering::{append_key, place_between, GAP};
    use crate::domain::{DomainError, Entry, EntryPatch};
    use crate::repository::{
        open_repository, EntryPositioningOperations, EntryRepository, EntryStore, Reposition,
        Repository,
    };

    fn setup_test_db() -> EntryRepository {
        // Use in-memory database for tests
        open_repository(Path::new(":memory:"), Duration::from_secs(5)).expect("Failed to init test DB")
    }

    fn entry(id: &str, content: &str) -> Entry {
        Entry::new(id.to_string(), content.to_string(), false, Utc::now())
    }

    async fn seed(repo: &EntryRepository, id: &str, key: f64) -> Entry {
        repo.create(&entry(id, id).at_key(key)).await.expect("Failed to create")
    }

    fn move_request(target: &str, back: Option<&str>, front: Option<&str>) -> Reposition {
        Reposition {
            target: target.to_string(),
            back: back.map(str::to_string),
            front: front.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    async fn listed_ids(repo: &EntryRepository) -> Vec<String> {
        repo.list_page(0, 100)
            .await
            .expect("List failed")
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = setup_test_db();

        let created = repo.create(&entry("a", "Find me").at_key(3.5)).await.unwrap();
        assert_eq!(created.content, "Find me");
        assert_eq!(created.key, 3.5);

        let found = repo.find_by_id(&"a".to_string()).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        let repo = setup_test_db();
        seed(&repo, "a", 0.0).await;

        let err = repo.create(&entry("a", "again")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repo = setup_test_db();
        assert!(repo.find_by_id(&"nope".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_key_descending() {
        let repo = setup_test_db();
        seed(&repo, "low", 0.0).await;
        seed(&repo, "high", 20.0).await;
        seed(&repo, "mid", 10.0).await;

        assert_eq!(listed_ids(&repo).await, vec!["high", "mid", "low"]);
    }

    #[tokio::test]
    async fn test_list_pages_are_offset_windows() {
        let repo = setup_test_db();
        for (i, id) in ["e", "d", "c", "b", "a"].iter().enumerate() {
            seed(&repo, id, i as f64).await;
        }

        let first: Vec<_> = repo.list_page(0, 2).await.unwrap().into_iter().map(|e| e.id).collect();
        let second: Vec<_> = repo.list_page(1, 2).await.unwrap().into_iter().map(|e| e.id).collect();
        let third: Vec<_> = repo.list_page(2, 2).await.unwrap().into_iter().map(|e| e.id).collect();
        let past_end = repo.list_page(3, 2).await.unwrap();

        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(second, vec!["c", "d"]);
        assert_eq!(third, vec!["e"]);
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_content_not_key() {
        let repo = setup_test_db();
        seed(&repo, "a", 10.0).await;

        let patch = EntryPatch {
            content: "Updated".to_string(),
            done: true,
            updated_at: Utc::now(),
        };
        let updated = repo.update("a", &patch).await.expect("Update failed");

        assert_eq!(updated.content, "Updated");
        assert!(updated.done);
        assert_eq!(updated.key, 10.0);
        assert_eq!(updated.updated_at, patch.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = setup_test_db();

        let patch = EntryPatch {
            content: "ghost".to_string(),
            done: false,
            updated_at: Utc::now(),
        };
        let err = repo.update("missing", &patch).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(listed_ids(&repo).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let repo = setup_test_db();
        seed(&repo, "a", 0.0).await;

        repo.delete(&"a".to_string()).await.expect("Delete failed");

        assert!(repo.find_by_id(&"a".to_string()).await.unwrap().is_none());
        let again = repo.delete(&"a".to_string()).await.unwrap_err();
        assert!(matches!(again, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_append_uses_gap() {
        let repo = setup_test_db();

        let first = repo.append(&entry("a", "a"), append_key).await.unwrap();
        let second = repo.append(&entry("b", "b"), append_key).await.unwrap();
        let third = repo.append(&entry("c", "c"), append_key).await.unwrap();

        assert_eq!(first.key, 0.0);
        assert_eq!(second.key, first.key + GAP);
        assert_eq!(third.key, second.key + GAP);
        assert_eq!(listed_ids(&repo).await, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_keys() {
        let repo = Arc::new(setup_test_db());

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.append(&entry(&format!("e{}", i), "x"), append_key).await
            }));
        }

        let mut keys = Vec::new();
        for handle in handles {
            keys.push(handle.await.unwrap().unwrap().key);
        }
        keys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        keys.dedup();

        assert_eq!(keys.len(), 16);
        assert_eq!(keys.first().copied(), Some(0.0));
        assert_eq!(keys.last().copied(), Some(15.0 * GAP));
    }

    #[tokio::test]
    async fn test_reposition_to_midpoint() {
        let repo = setup_test_db();
        seed(&repo, "A", 0.0).await;
        seed(&repo, "B", 1.0).await;
        seed(&repo, "C", 2.0).await;

        let moved = repo
            .reposition(&move_request("A", Some("C"), Some("B")), place_between)
            .await
            .unwrap();

        assert_eq!(moved.key, 1.5);
        assert_eq!(listed_ids(&repo).await, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_reposition_with_only_back() {
        let repo = setup_test_db();
        seed(&repo, "A", 0.0).await;
        seed(&repo, "B", 10.0).await;

        let moved = repo
            .reposition(&move_request("A", Some("B"), None), place_between)
            .await
            .unwrap();

        assert_eq!(moved.key, (10.0 + 11.0) / 2.0);
        assert_eq!(listed_ids(&repo).await, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_reposition_missing_neighbor_is_not_found() {
        let repo = setup_test_db();
        seed(&repo, "A", 0.0).await;

        let err = repo
            .reposition(&move_request("A", Some("ghost"), None), place_between)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let unchanged = repo.find_by_id(&"A".to_string()).await.unwrap().unwrap();
        assert_eq!(unchanged.key, 0.0);
    }

    #[tokio::test]
    async fn test_reposition_missing_target_is_not_found() {
        let repo = setup_test_db();
        seed(&repo, "B", 0.0).await;

        let err = repo
            .reposition(&move_request("ghost", Some("B"), None), place_between)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(listed_ids(&repo).await, vec!["B"]);
    }

    #[tokio::test]
    async fn test_reposition_without_neighbors_is_invalid() {
        let repo = setup_test_db();
        seed(&repo, "A", 0.0).await;

        let err = repo
            .reposition(&move_request("A", None, None), place_between)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_repeated_moves_into_same_slot_stay_ordered() {
        let repo = setup_test_db();
        seed(&repo, "top", 1.0).await;
        seed(&repo, "bottom", 0.0).await;

        // Each new entry is dropped right above "bottom", below the previous
        // one, halving the remaining gap every time.
        let mut expected = vec!["top".to_string()];
        let mut front = "top".to_string();
        for i in 0..60 {
            let id = format!("m{}", i);
            seed(&repo, &id, 100.0 + i as f64).await;
            repo.reposition(&move_request(&id, Some("bottom"), Some(&front)), place_between)
                .await
                .unwrap();
            expected.push(id.clone());
            front = id;
        }
        expected.push("bottom".to_string());

        let entries = repo.list_page(0, 100).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, expected);
        for pair in entries.windows(2) {
            assert!(pair[0].key > pair[1].key, "keys must stay strictly ordered");
        }
    }

    #[tokio::test]
    async fn test_renormalize_respaces_in_order() {
        let repo = setup_test_db();
        seed(&repo, "a", 0.25).await;
        seed(&repo, "b", 0.5).await;
        seed(&repo, "c", 7.0).await;

        let count = repo.renormalize(Utc::now()).await.unwrap();

        assert_eq!(count, 3);
        let entries = repo.list_page(0, 10).await.unwrap();
        let keys: Vec<_> = entries.iter().map(|e| (e.id.as_str(), e.key)).collect();
        assert_eq!(keys, vec![("c", 20.0), ("b", 10.0), ("a", 0.0)]);
    }

    #[tokio::test]
    async fn test_update_key() {
        let repo = setup_test_db();
        seed(&repo, "a", 0.0).await;

        let moved = repo.update_key("a", 42.0, Utc::now()).await.unwrap();
        assert_eq!(moved.key, 42.0);

        let err = repo.update_key("ghost", 1.0, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
