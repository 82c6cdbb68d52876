use serde_json::Value;

use lectern_service::{Error, FeedRequest, FeedbackRequest};

fn rating(record_id: i64) -> FeedbackRequest {
	FeedbackRequest { record_id, relevance: true, presentation: false, methodology: true }
}

fn visited_flag(body: &str, record_id: i64) -> Option<bool> {
	let json: Value = serde_json::from_str(body).expect("Failed to parse feed.");

	json["records"]
		.as_array()?
		.iter()
		.find(|item| item["id"] == record_id)
		.and_then(|item| item["visited"].as_bool())
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn reading_details_marks_record_visited_once() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping reading_details_marks_record_visited_once; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::interested_user(&service).await;
	let window = FeedRequest { offset: 0, limit: super::MAX_PAGE_LIMIT };
	let first_page =
		service.read_record_feed(user_id, window.clone()).await.expect("Failed to read feed.");
	let record_id = super::item_ids(&first_page.body, "records")[0];

	assert_eq!(visited_flag(&first_page.body, record_id), Some(false));

	for _ in 0..2 {
		let detail = service
			.read_record_details(user_id, record_id)
			.await
			.expect("Failed to read record details.");
		let json: Value = serde_json::from_str(&detail).expect("Failed to parse details.");

		assert_eq!(json["id"], record_id);
		assert!(json.get("visited").is_none());
	}

	let page = service.read_record_feed(user_id, window).await.expect("Failed to read feed.");

	assert_eq!(visited_flag(&page.body, record_id), Some(true));
	assert_eq!(super::item_ids(&page.body, "records"), super::item_ids(&first_page.body, "records"));

	let err = service
		.read_record_details(user_id, 999)
		.await
		.expect_err("Expected unknown record to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	let expert = service.read_expert_details(2).await.expect("Failed to read expert details.");
	let json: Value = serde_json::from_str(&expert).expect("Failed to parse expert details.");

	assert_eq!(json["expert_id"], 2);
	assert_eq!(json["records"].as_array().map(Vec::len), Some(23));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn feedback_requires_profile_and_publishes_once() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping feedback_requires_profile_and_publishes_once; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, ledger) = super::reference_service(&test_db, true).await;
	let user_id = super::interested_user(&service).await;
	let err = service
		.create_feedback(user_id, rating(30))
		.await
		.expect_err("Expected feedback without profile to fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	service
		.create_expert_profile(user_id, super::EXPERT_PROFILE_ORCID)
		.await
		.expect("Failed to create expert profile.");

	assert!(service.create_feedback(user_id, rating(30)).await.expect("Failed to rate."));
	assert!(!service.create_feedback(user_id, rating(30)).await.expect("Failed to re-rate."));

	let recorded = ledger.recorded();

	assert_eq!(recorded.len(), 1);
	assert_eq!(recorded[0].orcid, super::EXPERT_PROFILE_ORCID);
	assert_eq!(recorded[0].bib_hash, super::reference_bib_hash(30));
	assert!(recorded[0].relevance && !recorded[0].presentation && recorded[0].methodology);

	let feedback_feed = super::all_feedback_feed_ids(&service, user_id).await;

	assert_eq!(feedback_feed.len(), 91);
	assert!(!feedback_feed.contains(&30));
	// Rating does not hide the record from the record feed.
	assert!(super::all_record_feed_ids(&service, user_id).await.contains(&30));

	let stored = service.read_feedback(30).await.expect("Failed to read feedback.");

	assert_eq!(stored.len(), 1);
	assert_eq!(stored[0].orcid, super::EXPERT_PROFILE_ORCID);

	let err = service
		.create_feedback(user_id, rating(999))
		.await
		.expect_err("Expected unknown record to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn disabled_ledger_keeps_feedback_local() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping disabled_ledger_keeps_feedback_local; set LECTERN_PG_DSN to run this test.");

		return;
	};
	let (service, ledger) = super::reference_service(&test_db, false).await;
	let user_id = super::new_user(&service).await;

	service
		.create_expert_profile(user_id, super::EXPERT_PROFILE_ORCID)
		.await
		.expect("Failed to create expert profile.");

	assert!(service.create_feedback(user_id, rating(12)).await.expect("Failed to rate."));
	assert!(ledger.recorded().is_empty());
	assert_eq!(service.read_feedback(12).await.expect("Failed to read feedback.").len(), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
