//! Item Store writes and lookups: subjects, records, experts, and their stored fragments.

use sqlx::{Executor, PgConnection, Postgres};

use crate::{
	Result,
	models::{CreatorName, ExpertIdentity, ExpertRecord, RecordType, Subject},
};

pub struct RecordRow<'a> {
	pub record_id: i64,
	pub title: &'a str,
	pub year: i32,
	pub abstract_text: &'a str,
	pub record_type_id: i16,
	pub doi: Option<&'a str>,
	pub repository_link: Option<&'a str>,
	pub pdf_link: Option<&'a str>,
	pub bib_hash: Option<&'a str>,
	pub preview_fragment: &'a str,
	pub detail_fragment: &'a str,
}

pub struct CreatorRow<'a> {
	pub first_name: &'a str,
	pub last_name: &'a str,
	pub expert_id: Option<i64>,
}

pub async fn upsert_subject(conn: &mut PgConnection, subject_id: i64, keyword: &str) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO subjects (subject_id, keyword)
VALUES ($1, $2)
ON CONFLICT (subject_id) DO UPDATE
SET keyword = EXCLUDED.keyword",
	)
	.bind(subject_id)
	.bind(keyword)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn upsert_expert(
	conn: &mut PgConnection,
	expert_id: i64,
	first_name: &str,
	last_name: &str,
	orcid: Option<&str>,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO experts (expert_id, first_name, last_name, orcid)
VALUES ($1, $2, $3, $4)
ON CONFLICT (expert_id) DO UPDATE
SET
	first_name = EXCLUDED.first_name,
	last_name = EXCLUDED.last_name,
	orcid = EXCLUDED.orcid,
	updated_at = now()",
	)
	.bind(expert_id)
	.bind(first_name)
	.bind(last_name)
	.bind(orcid)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn upsert_record(conn: &mut PgConnection, record: &RecordRow<'_>) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO records (
	record_id,
	title,
	year,
	abstract,
	record_type_id,
	doi,
	repository_link,
	pdf_link,
	bib_hash,
	preview_fragment,
	detail_fragment
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
ON CONFLICT (record_id) DO UPDATE
SET
	title = EXCLUDED.title,
	year = EXCLUDED.year,
	abstract = EXCLUDED.abstract,
	record_type_id = EXCLUDED.record_type_id,
	doi = EXCLUDED.doi,
	repository_link = EXCLUDED.repository_link,
	pdf_link = EXCLUDED.pdf_link,
	bib_hash = EXCLUDED.bib_hash,
	preview_fragment = EXCLUDED.preview_fragment,
	detail_fragment = EXCLUDED.detail_fragment,
	updated_at = now()",
	)
	.bind(record.record_id)
	.bind(record.title)
	.bind(record.year)
	.bind(record.abstract_text)
	.bind(record.record_type_id)
	.bind(record.doi)
	.bind(record.repository_link)
	.bind(record.pdf_link)
	.bind(record.bib_hash)
	.bind(record.preview_fragment)
	.bind(record.detail_fragment)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

/// Replaces the ordered creator list of a record. Positions follow slice order.
pub async fn replace_record_creators(
	conn: &mut PgConnection,
	record_id: i64,
	creators: &[CreatorRow<'_>],
) -> Result<()> {
	sqlx::query("DELETE FROM record_creators WHERE record_id = $1")
		.bind(record_id)
		.execute(&mut *conn)
		.await?;

	for (position, creator) in creators.iter().enumerate() {
		sqlx::query(
			"\
INSERT INTO record_creators (record_id, position, first_name, last_name, expert_id)
VALUES ($1, $2, $3, $4, $5)",
		)
		.bind(record_id)
		.bind(position as i32)
		.bind(creator.first_name)
		.bind(creator.last_name)
		.bind(creator.expert_id)
		.execute(&mut *conn)
		.await?;
	}

	Ok(())
}

pub async fn replace_record_subjects(
	conn: &mut PgConnection,
	record_id: i64,
	subject_ids: &[i64],
) -> Result<()> {
	sqlx::query("DELETE FROM record_subjects WHERE record_id = $1")
		.bind(record_id)
		.execute(&mut *conn)
		.await?;
	sqlx::query(
		"\
INSERT INTO record_subjects (record_id, subject_id)
SELECT $1, subject_id
FROM UNNEST($2::bigint[]) AS subject_id
ON CONFLICT DO NOTHING",
	)
	.bind(record_id)
	.bind(subject_ids)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

/// Recomputes the per-subject record-count weights of one expert from attributed records.
pub async fn refresh_expert_subject_weights(conn: &mut PgConnection, expert_id: i64) -> Result<()> {
	sqlx::query("DELETE FROM expert_subjects WHERE expert_id = $1")
		.bind(expert_id)
		.execute(&mut *conn)
		.await?;
	sqlx::query(
		"\
INSERT INTO expert_subjects (expert_id, subject_id, record_count)
SELECT $1, rs.subject_id, COUNT(DISTINCT rs.record_id)::integer
FROM record_creators rc
JOIN record_subjects rs ON rs.record_id = rc.record_id
WHERE rc.expert_id = $1
GROUP BY rs.subject_id",
	)
	.bind(expert_id)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn update_expert_fragments(
	conn: &mut PgConnection,
	expert_id: i64,
	preview_fragment: &str,
	detail_fragment: &str,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE experts
SET preview_fragment = $2, detail_fragment = $3, updated_at = now()
WHERE expert_id = $1",
	)
	.bind(expert_id)
	.bind(preview_fragment)
	.bind(detail_fragment)
	.execute(&mut *conn)
	.await?;

	Ok(())
}

pub async fn read_expert_identity(
	conn: &mut PgConnection,
	expert_id: i64,
) -> Result<Option<ExpertIdentity>> {
	let row = sqlx::query_as::<_, ExpertIdentity>(
		"SELECT expert_id, first_name, last_name, orcid FROM experts WHERE expert_id = $1",
	)
	.bind(expert_id)
	.fetch_optional(&mut *conn)
	.await?;

	Ok(row)
}

/// Records attributed to an expert, newest first.
pub async fn read_expert_records(
	conn: &mut PgConnection,
	expert_id: i64,
) -> Result<Vec<ExpertRecord>> {
	let rows = sqlx::query_as::<_, ExpertRecord>(
		"\
SELECT DISTINCT r.record_id, r.title, r.year
FROM record_creators rc
JOIN records r ON r.record_id = rc.record_id
WHERE rc.expert_id = $1
ORDER BY r.year DESC, r.record_id",
	)
	.bind(expert_id)
	.fetch_all(&mut *conn)
	.await?;

	Ok(rows)
}

/// Subjects an expert carries a weight for, heaviest first.
pub async fn read_expert_subjects(conn: &mut PgConnection, expert_id: i64) -> Result<Vec<Subject>> {
	let rows = sqlx::query_as::<_, Subject>(
		"\
SELECT s.subject_id, s.keyword
FROM expert_subjects es
JOIN subjects s ON s.subject_id = es.subject_id
WHERE es.expert_id = $1
ORDER BY es.record_count DESC, s.keyword",
	)
	.bind(expert_id)
	.fetch_all(&mut *conn)
	.await?;

	Ok(rows)
}

pub async fn read_creator_names(
	conn: &mut PgConnection,
	record_ids: &[i64],
) -> Result<Vec<CreatorName>> {
	if record_ids.is_empty() {
		return Ok(vec![]);
	}

	let rows = sqlx::query_as::<_, CreatorName>(
		"\
SELECT record_id, position, first_name, last_name
FROM record_creators
WHERE record_id = ANY($1::bigint[])
ORDER BY record_id, position",
	)
	.bind(record_ids)
	.fetch_all(&mut *conn)
	.await?;

	Ok(rows)
}

pub async fn read_subjects_by_ids(
	conn: &mut PgConnection,
	subject_ids: &[i64],
) -> Result<Vec<Subject>> {
	if subject_ids.is_empty() {
		return Ok(vec![]);
	}

	let rows = sqlx::query_as::<_, Subject>(
		"\
SELECT subject_id, keyword
FROM subjects
WHERE subject_id = ANY($1::bigint[])
ORDER BY keyword",
	)
	.bind(subject_ids)
	.fetch_all(&mut *conn)
	.await?;

	Ok(rows)
}

pub async fn list_subjects<'e, E>(executor: E) -> Result<Vec<Subject>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows =
		sqlx::query_as::<_, Subject>("SELECT subject_id, keyword FROM subjects ORDER BY keyword")
			.fetch_all(executor)
			.await?;

	Ok(rows)
}

pub async fn list_record_types<'e, E>(executor: E) -> Result<Vec<RecordType>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, RecordType>(
		"SELECT record_type_id, name FROM record_types ORDER BY record_type_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn record_type_exists<'e, E>(executor: E, record_type_id: i16) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let exists: bool = sqlx::query_scalar(
		"SELECT EXISTS (SELECT 1 FROM record_types WHERE record_type_id = $1)",
	)
	.bind(record_type_id)
	.fetch_one(executor)
	.await?;

	Ok(exists)
}

pub async fn subject_exists<'e, E>(executor: E, subject_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM subjects WHERE subject_id = $1)")
			.bind(subject_id)
			.fetch_one(executor)
			.await?;

	Ok(exists)
}

pub async fn record_exists<'e, E>(executor: E, record_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM records WHERE record_id = $1)")
			.bind(record_id)
			.fetch_one(executor)
			.await?;

	Ok(exists)
}

pub async fn expert_exists<'e, E>(executor: E, expert_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM experts WHERE expert_id = $1)")
			.bind(expert_id)
			.fetch_one(executor)
			.await?;

	Ok(exists)
}

pub async fn read_record_detail_fragment<'e, E>(executor: E, record_id: i64) -> Result<Option<String>>
where
	E: Executor<'e, Database = Postgres>,
{
	let fragment: Option<String> =
		sqlx::query_scalar("SELECT detail_fragment FROM records WHERE record_id = $1")
			.bind(record_id)
			.fetch_optional(executor)
			.await?;

	Ok(fragment)
}

pub async fn read_expert_detail_fragment<'e, E>(executor: E, expert_id: i64) -> Result<Option<String>>
where
	E: Executor<'e, Database = Postgres>,
{
	let fragment: Option<String> =
		sqlx::query_scalar("SELECT detail_fragment FROM experts WHERE expert_id = $1")
			.bind(expert_id)
			.fetch_optional(executor)
			.await?;

	Ok(fragment)
}

/// Outer `None`: unknown record. Inner `None`: the record carries no bibliographic hash.
pub async fn read_bib_hash<'e, E>(executor: E, record_id: i64) -> Result<Option<Option<String>>>
where
	E: Executor<'e, Database = Postgres>,
{
	let bib_hash: Option<Option<String>> =
		sqlx::query_scalar("SELECT bib_hash FROM records WHERE record_id = $1")
			.bind(record_id)
			.fetch_optional(executor)
			.await?;

	Ok(bib_hash)
}

/// Experts currently attributed as creators of any of `record_ids`.
pub async fn read_attributed_expert_ids(
	conn: &mut PgConnection,
	record_ids: &[i64],
) -> Result<Vec<i64>> {
	if record_ids.is_empty() {
		return Ok(vec![]);
	}

	let rows: Vec<i64> = sqlx::query_scalar(
		"\
SELECT DISTINCT expert_id
FROM record_creators
WHERE record_id = ANY($1::bigint[]) AND expert_id IS NOT NULL
ORDER BY expert_id",
	)
	.bind(record_ids)
	.fetch_all(&mut *conn)
	.await?;

	Ok(rows)
}
