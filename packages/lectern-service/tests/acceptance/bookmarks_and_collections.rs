use serde_json::Value;

use lectern_service::{Error, UpdateBookmarkCollectionsRequest};

fn bookmark_collections(body: &str, record_id: i64) -> Option<Vec<i64>> {
	let json: Value = serde_json::from_str(body).expect("Failed to parse bookmarks.");

	json["bookmarks"].as_array()?.iter().find(|item| item["id"] == record_id).map(|item| {
		item["collection_ids"]
			.as_array()
			.expect("Bookmark must carry collection_ids.")
			.iter()
			.map(|id| id.as_i64().expect("Collection id must be an integer."))
			.collect()
	})
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn bookmark_moves_record_out_of_feed_and_back() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping bookmark_moves_record_out_of_feed_and_back; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::interested_user(&service).await;

	service.create_record_bookmark(user_id, 10).await.expect("Failed to bookmark record.");
	// Repeating a bookmark changes nothing.
	service.create_record_bookmark(user_id, 10).await.expect("Failed to repeat bookmark.");

	assert_eq!(service.read_record_feed_count(user_id).await.expect("Failed to count feed."), 91);
	assert!(!super::all_record_feed_ids(&service, user_id).await.contains(&10));
	// Bookmarked records stay available for rating.
	assert!(super::all_feedback_feed_ids(&service, user_id).await.contains(&10));

	service.create_record_bookmark(user_id, 20).await.expect("Failed to bookmark record.");

	let bookmarks =
		service.read_record_bookmarks(user_id).await.expect("Failed to read bookmarks.");

	assert_eq!(super::item_ids(&bookmarks, "bookmarks"), vec![20, 10]);
	assert_eq!(bookmark_collections(&bookmarks, 10), Some(vec![]));

	service.delete_record_bookmark(user_id, 10).await.expect("Failed to remove bookmark.");

	assert_eq!(service.read_record_feed_count(user_id).await.expect("Failed to count feed."), 91);
	assert!(super::all_record_feed_ids(&service, user_id).await.contains(&10));

	let err = service
		.create_record_bookmark(user_id, 999)
		.await
		.expect_err("Expected unknown record to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn collection_links_are_replaced_not_merged() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping collection_links_are_replaced_not_merged; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::interested_user(&service).await;
	let first = service.create_collection(user_id, " Reading ").await.expect("Failed to create.");
	let second = service.create_collection(user_id, "Teaching").await.expect("Failed to create.");

	service
		.update_record_bookmark_collections(
			user_id,
			UpdateBookmarkCollectionsRequest { record_id: 20, collection_ids: vec![second, first] },
		)
		.await
		.expect("Failed to link collections.");

	let bookmarks =
		service.read_record_bookmarks(user_id).await.expect("Failed to read bookmarks.");

	// Linking bookmarks the record as well.
	assert_eq!(bookmark_collections(&bookmarks, 20), Some(vec![first, second]));

	service
		.update_record_bookmark_collections(
			user_id,
			UpdateBookmarkCollectionsRequest { record_id: 20, collection_ids: vec![first] },
		)
		.await
		.expect("Failed to relink collections.");

	let bookmarks =
		service.read_record_bookmarks(user_id).await.expect("Failed to read bookmarks.");

	assert_eq!(bookmark_collections(&bookmarks, 20), Some(vec![first]));

	let collections = service.read_collections(user_id).await.expect("Failed to read collections.");
	let names = collections.iter().map(|collection| collection.name.as_str()).collect::<Vec<_>>();

	assert_eq!(names, vec!["Reading", "Teaching"]);

	service.update_collection(user_id, second, "Seminar").await.expect("Failed to rename.");

	let err = service
		.update_collection(user_id, second, "   ")
		.await
		.expect_err("Expected blank title to fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	service.delete_collection(user_id, first).await.expect("Failed to delete collection.");

	let bookmarks =
		service.read_record_bookmarks(user_id).await.expect("Failed to read bookmarks.");

	// The bookmark outlives its collection.
	assert_eq!(bookmark_collections(&bookmarks, 20), Some(vec![]));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn foreign_collection_rejects_whole_update() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping foreign_collection_rejects_whole_update; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let owner = super::interested_user(&service).await;
	let stranger = super::new_user(&service).await;
	let own = service.create_collection(owner, "Mine").await.expect("Failed to create.");
	let foreign = service.create_collection(stranger, "Theirs").await.expect("Failed to create.");

	service
		.update_record_bookmark_collections(
			owner,
			UpdateBookmarkCollectionsRequest { record_id: 30, collection_ids: vec![own] },
		)
		.await
		.expect("Failed to link collection.");

	let err = service
		.update_record_bookmark_collections(
			owner,
			UpdateBookmarkCollectionsRequest { record_id: 30, collection_ids: vec![foreign] },
		)
		.await
		.expect_err("Expected foreign collection to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	let bookmarks = service.read_record_bookmarks(owner).await.expect("Failed to read bookmarks.");

	assert_eq!(bookmark_collections(&bookmarks, 30), Some(vec![own]));

	let err = service
		.delete_collection(owner, foreign)
		.await
		.expect_err("Expected foreign collection delete to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn expert_bookmarks_list_newest_first() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping expert_bookmarks_list_newest_first; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::new_user(&service).await;

	service.create_expert_bookmark(user_id, 3).await.expect("Failed to bookmark expert.");
	service.create_expert_bookmark(user_id, 1).await.expect("Failed to bookmark expert.");

	let bookmarks =
		service.read_expert_bookmarks(user_id).await.expect("Failed to read expert bookmarks.");

	assert_eq!(super::item_ids(&bookmarks, "bookmarks"), vec![1, 3]);

	service.delete_expert_bookmark(user_id, 1).await.expect("Failed to remove expert bookmark.");

	let bookmarks =
		service.read_expert_bookmarks(user_id).await.expect("Failed to read expert bookmarks.");

	assert_eq!(super::item_ids(&bookmarks, "bookmarks"), vec![3]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
