use serde_json::Value;

use lectern_service::{CatalogBatch, Error};

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn ingest_precomputes_fragments_and_weights() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping ingest_precomputes_fragments_and_weights; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(
		super::test_config(test_db.dsn().to_string(), false),
		Default::default(),
	)
	.await;
	let report =
		service.ingest_catalog(super::reference_catalog()).await.expect("Failed to ingest.");

	assert_eq!(report.subjects, 2);
	assert_eq!(report.experts, 4);
	assert_eq!(report.records, 92);
	assert_eq!(report.experts_refreshed, 4);
	assert_eq!(service.read_subjects().await.expect("Failed to read subjects.").len(), 2);
	assert_eq!(service.read_record_types().await.expect("Failed to read types.").len(), 6);

	let user_id = super::new_user(&service).await;
	let detail =
		service.read_record_details(user_id, 77).await.expect("Failed to read record details.");
	let json: Value = serde_json::from_str(&detail).expect("Failed to parse record details.");

	assert_eq!(json["title"], "Exchange rate regimes 77");
	assert_eq!(json["creators"], serde_json::json!(["Ann Author77", "Irving Fisher"]));
	assert_eq!(json["subjects"].as_array().map(Vec::len), Some(2));

	let weights: Vec<(i64, i32)> = sqlx::query_as(
		"SELECT subject_id, record_count FROM expert_subjects WHERE expert_id = 2 ORDER BY subject_id",
	)
	.fetch_all(&service.db.pool)
	.await
	.expect("Failed to read expert weights.");

	assert_eq!(weights, vec![(super::FINANCIAL_ECONOMICS, 20), (super::INTERNATIONAL_MARKETS, 5)]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn reattribution_refreshes_the_previous_expert() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping reattribution_refreshes_the_previous_expert; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(
		super::test_config(test_db.dsn().to_string(), false),
		Default::default(),
	)
	.await;

	service.ingest_catalog(super::reference_catalog()).await.expect("Failed to ingest.");

	// Record 1 moves from expert 2 to expert 3.
	let mut record = super::reference_record(1);

	record.creators[1].expert_id = Some(3);
	record.creators[1].last_name = "Hayek".to_string();

	let report = service
		.ingest_catalog(CatalogBatch { records: vec![record], ..Default::default() })
		.await
		.expect("Failed to re-ingest record.");

	assert_eq!(report.experts_refreshed, 2);

	let expert = service.read_expert_details(2).await.expect("Failed to read expert details.");
	let json: Value = serde_json::from_str(&expert).expect("Failed to parse expert details.");

	assert_eq!(json["records"].as_array().map(Vec::len), Some(22));

	let expert = service.read_expert_details(3).await.expect("Failed to read expert details.");
	let json: Value = serde_json::from_str(&expert).expect("Failed to parse expert details.");

	assert_eq!(json["records"].as_array().map(Vec::len), Some(24));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LECTERN_PG_DSN to run."]
async fn unknown_subject_rolls_back_the_batch() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping unknown_subject_rolls_back_the_batch; set LECTERN_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(
		super::test_config(test_db.dsn().to_string(), false),
		Default::default(),
	)
	.await;
	let mut batch = super::reference_catalog();

	batch.records[91].subject_ids.push(99);

	let err = service.ingest_catalog(batch).await.expect_err("Expected unknown subject to fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
	assert!(service.read_subjects().await.expect("Failed to read subjects.").is_empty());

	let mut batch = super::reference_catalog();

	batch.records[0].record_type = 42;

	let err = service.ingest_catalog(batch).await.expect_err("Expected unknown type to fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
