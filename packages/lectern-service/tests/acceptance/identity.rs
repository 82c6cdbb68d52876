use lectern_service::Error;

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn credentials_resolve_only_with_the_right_secret() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping credentials_resolve_only_with_the_right_secret; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(
		super::test_config(test_db.dsn().to_string(), false),
		Default::default(),
	)
	.await;
	let created =
		service.create_user("a sufficiently long secret").await.expect("Failed to create user.");

	assert_eq!(
		service
			.authenticate(created.guid, "a sufficiently long secret")
			.await
			.expect("Failed to authenticate."),
		Some(created.user_id)
	);
	assert_eq!(
		service
			.authenticate(created.guid, "another long secret!")
			.await
			.expect("Failed to authenticate."),
		None
	);
	assert_eq!(
		service
			.authenticate(uuid::Uuid::new_v4(), "a sufficiently long secret")
			.await
			.expect("Failed to authenticate."),
		None
	);

	let err = service.create_user("short").await.expect_err("Expected short secret to fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn deleting_a_user_removes_every_trace() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping deleting_a_user_removes_every_trace; set LECTERN_PG_DSN to run this test.");

		return;
	};
	let (service, _) = super::reference_service(&test_db, false).await;
	let created =
		service.create_user("a sufficiently long secret").await.expect("Failed to create user.");
	let user_id = created.user_id;

	service.create_interest(user_id, super::FINANCIAL_ECONOMICS).await.expect("Failed to add.");
	service.create_record_bookmark(user_id, 4).await.expect("Failed to bookmark.");
	service.create_collection(user_id, "Reading").await.expect("Failed to create collection.");
	service.create_record_dislike(user_id, 8).await.expect("Failed to dislike.");
	service.read_record_details(user_id, 12).await.expect("Failed to read details.");
	service.delete_user(user_id).await.expect("Failed to delete user.");

	assert_eq!(
		service
			.authenticate(created.guid, "a sufficiently long secret")
			.await
			.expect("Failed to authenticate."),
		None
	);

	for table in [
		"interests",
		"record_feed",
		"record_bookmarks",
		"collections",
		"record_dislikes",
		"record_visits",
	] {
		let count: i64 =
			sqlx::query_scalar(&format!("SELECT count(*) FROM {table} WHERE user_id = $1"))
				.bind(user_id)
				.fetch_one(&service.db.pool)
				.await
				.expect("Failed to count rows.");

		assert_eq!(count, 0, "Rows left in {table}.");
	}

	let err = service.delete_user(user_id).await.expect_err("Expected second delete to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn expert_profile_validates_orcid() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping expert_profile_validates_orcid; set LECTERN_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(
		super::test_config(test_db.dsn().to_string(), false),
		Default::default(),
	)
	.await;
	let user_id = super::new_user(&service).await;
	let err = service
		.create_expert_profile(user_id, "0000-0002-1825")
		.await
		.expect_err("Expected malformed ORCiD to fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(service.read_expert_profile(user_id).await.expect("Failed to read profile."), None);

	service
		.create_expert_profile(user_id, "0000-0001-5109-377X")
		.await
		.expect("Failed to create expert profile.");

	assert_eq!(
		service.read_expert_profile(user_id).await.expect("Failed to read profile."),
		Some("0000-0001-5109-377X".to_string())
	);

	service.delete_expert_profile(user_id).await.expect("Failed to delete expert profile.");

	assert_eq!(service.read_expert_profile(user_id).await.expect("Failed to read profile."), None);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
