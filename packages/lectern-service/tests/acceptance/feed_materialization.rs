use lectern_service::FeedRequest;

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn reference_counts_follow_interests_and_dislikes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping reference_counts_follow_interests_and_dislikes; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::new_user(&service).await;
	let change = service
		.create_interest(user_id, super::FINANCIAL_ECONOMICS)
		.await
		.expect("Failed to add interest.");

	assert!(change.changed);
	assert_eq!(change.record_count, 78);

	let change = service
		.create_interest(user_id, super::INTERNATIONAL_MARKETS)
		.await
		.expect("Failed to add interest.");

	assert_eq!(change.record_count, 92);

	let repeated = service
		.create_interest(user_id, super::INTERNATIONAL_MARKETS)
		.await
		.expect("Failed to repeat interest.");

	assert!(!repeated.changed);
	assert_eq!(repeated.record_count, 92);

	service.create_record_dislike(user_id, 5).await.expect("Failed to dislike record.");
	service.create_record_dislike(user_id, 80).await.expect("Failed to dislike record.");

	assert_eq!(service.read_record_feed_count(user_id).await.expect("Failed to count feed."), 90);

	let ids = super::all_record_feed_ids(&service, user_id).await;

	assert_eq!(ids.len(), 90);
	assert!(!ids.contains(&5) && !ids.contains(&80));

	// Dislikes survive every later rebuild.
	let change = service
		.delete_interest(user_id, super::INTERNATIONAL_MARKETS)
		.await
		.expect("Failed to remove interest.");

	assert!(change.changed);
	assert_eq!(change.record_count, 77);

	let interests = service.read_interests(user_id).await.expect("Failed to read interests.");

	assert_eq!(interests.record_count, 77);
	assert_eq!(interests.subjects.len(), 1);
	assert_eq!(interests.subjects[0].id, super::FINANCIAL_ECONOMICS);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn record_feed_is_newest_first_with_id_tiebreak() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping record_feed_is_newest_first_with_id_tiebreak; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::interested_user(&service).await;
	let mut expected = (1..=92).collect::<Vec<i64>>();

	expected.sort_by_key(|id| (std::cmp::Reverse(super::reference_year(*id)), *id));

	assert_eq!(super::all_record_feed_ids(&service, user_id).await, expected);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn expert_feed_ranks_by_summed_subject_weight() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping expert_feed_ranks_by_summed_subject_weight; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::interested_user(&service).await;
	let envelope = service
		.read_expert_feed(user_id, FeedRequest { offset: 0, limit: 10 })
		.await
		.expect("Failed to read expert feed.");

	// Weights sum per-subject counts: 24, 25, 25, 24. Records carrying both subjects count twice.
	assert_eq!(super::item_ids(&envelope.body, "experts"), vec![2, 3, 1, 4]);

	let json: serde_json::Value =
		serde_json::from_str(&envelope.body).expect("Failed to parse expert feed.");

	assert_eq!(json["experts"][0]["total_publication_count"], 23);
	assert!(json["experts"][0].get("visited").is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn rebuild_all_feeds_covers_interested_users_only() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping rebuild_all_feeds_covers_interested_users_only; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let first = super::interested_user(&service).await;
	let second = super::new_user(&service).await;

	service
		.create_interest(second, super::INTERNATIONAL_MARKETS)
		.await
		.expect("Failed to add interest.");

	let _idle = super::new_user(&service).await;
	let report = service.rebuild_all_feeds().await.expect("Failed to rebuild all feeds.");

	assert_eq!(report.users, 2);
	assert_eq!(report.records, 92 + 20);
	assert_eq!(service.read_record_feed_count(first).await.expect("Failed to count feed."), 92);
	assert_eq!(service.read_record_feed_count(second).await.expect("Failed to count feed."), 20);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn unknown_subject_interest_is_not_found() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping unknown_subject_interest_is_not_found; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let user_id = super::new_user(&service).await;
	let err = service
		.create_interest(user_id, 999)
		.await
		.expect_err("Expected unknown subject to fail.");

	assert!(matches!(err, lectern_service::Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn concurrent_interest_changes_match_serial_result() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping concurrent_interest_changes_match_serial_result; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;

	for round in 0..10 {
		let user_id = super::new_user(&service).await;
		let (first, second) = tokio::join!(
			service.create_interest(user_id, super::FINANCIAL_ECONOMICS),
			service.create_interest(user_id, super::INTERNATIONAL_MARKETS),
		);

		first.unwrap_or_else(|err| panic!("Round {round}: first interest failed: {err}."));
		second.unwrap_or_else(|err| panic!("Round {round}: second interest failed: {err}."));

		assert_eq!(
			service.read_record_feed_count(user_id).await.expect("Failed to count feed."),
			92,
			"Round {round}."
		);
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn dislike_racing_a_rebuild_stays_out_of_the_feed() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping dislike_racing_a_rebuild_stays_out_of_the_feed; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;

	for round in 0..10 {
		let user_id = super::new_user(&service).await;

		service
			.create_interest(user_id, super::FINANCIAL_ECONOMICS)
			.await
			.expect("Failed to add interest.");

		let (disliked, interest) = tokio::join!(
			service.create_record_dislike(user_id, 5),
			service.create_interest(user_id, super::INTERNATIONAL_MARKETS),
		);

		disliked.unwrap_or_else(|err| panic!("Round {round}: dislike failed: {err}."));
		interest.unwrap_or_else(|err| panic!("Round {round}: interest failed: {err}."));

		let ids = super::all_record_feed_ids(&service, user_id).await;

		assert!(!ids.contains(&5), "Round {round}: disliked record came back.");
		assert_eq!(ids.len(), 91, "Round {round}.");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
