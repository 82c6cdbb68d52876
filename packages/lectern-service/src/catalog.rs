//! Catalog ingestion and reference data.
//!
//! Ingestion is where fragments are precomputed. It neither reindexes search nor rebuilds feeds;
//! both are separate administrative steps run after a batch lands.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::{
	Error, LecternService, Result,
	fragment::{self, ExpertRecordSource, ExpertSource, RecordSource},
};
use lectern_ledger::codec;
use lectern_storage::{
	catalog::{self, CreatorRow, RecordRow},
	models::{RecordType, Subject},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectInput {
	pub id: i64,
	pub keyword: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpertInput {
	pub id: i64,
	pub first_name: String,
	pub last_name: String,
	#[serde(default)]
	pub orcid: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatorInput {
	pub first_name: String,
	pub last_name: String,
	#[serde(default)]
	pub expert_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordInput {
	pub id: i64,
	pub title: String,
	pub year: i32,
	#[serde(rename = "abstract", default)]
	pub abstract_text: String,
	#[serde(rename = "type")]
	pub record_type: i16,
	#[serde(default)]
	pub doi: Option<String>,
	#[serde(default)]
	pub repository_link: Option<String>,
	#[serde(default)]
	pub pdf_link: Option<String>,
	/// 32 hex characters when present; used to publish feedback.
	#[serde(default)]
	pub bib_hash: Option<String>,
	pub subject_ids: Vec<i64>,
	pub creators: Vec<CreatorInput>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogBatch {
	#[serde(default)]
	pub subjects: Vec<SubjectInput>,
	#[serde(default)]
	pub experts: Vec<ExpertInput>,
	#[serde(default)]
	pub records: Vec<RecordInput>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogReport {
	pub subjects: usize,
	pub experts: usize,
	pub records: usize,
	pub experts_refreshed: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectView {
	pub id: i64,
	pub keyword: String,
}
impl From<Subject> for SubjectView {
	fn from(subject: Subject) -> Self {
		Self { id: subject.subject_id, keyword: subject.keyword }
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordTypeView {
	pub id: i16,
	pub keyword: String,
}
impl From<RecordType> for RecordTypeView {
	fn from(record_type: RecordType) -> Self {
		Self { id: record_type.record_type_id, keyword: record_type.name }
	}
}

impl LecternService {
	pub async fn read_subjects(&self) -> Result<Vec<SubjectView>> {
		let rows = catalog::list_subjects(&self.db.pool).await?;

		Ok(rows.into_iter().map(SubjectView::from).collect())
	}

	pub async fn read_record_types(&self) -> Result<Vec<RecordTypeView>> {
		let rows = catalog::list_record_types(&self.db.pool).await?;

		Ok(rows.into_iter().map(RecordTypeView::from).collect())
	}

	/// Upserts a batch of subjects, experts, and records in one transaction.
	///
	/// Record fragments are rendered from the batch. Every expert named by the batch, or attributed
	/// to one of its records before or after the upsert, gets fresh weights and fragments.
	pub async fn ingest_catalog(&self, batch: CatalogBatch) -> Result<CatalogReport> {
		validate_batch(&batch)?;

		let mut tx = self.db.pool.begin().await?;

		for subject in &batch.subjects {
			catalog::upsert_subject(&mut tx, subject.id, subject.keyword.trim()).await?;
		}
		for expert in &batch.experts {
			catalog::upsert_expert(
				&mut tx,
				expert.id,
				expert.first_name.trim(),
				expert.last_name.trim(),
				expert.orcid.as_deref().map(str::trim),
			)
			.await?;
		}

		let record_ids = batch.records.iter().map(|record| record.id).collect::<Vec<_>>();
		let mut touched = catalog::read_attributed_expert_ids(&mut tx, &record_ids)
			.await?
			.into_iter()
			.collect::<BTreeSet<_>>();

		touched.extend(batch.experts.iter().map(|expert| expert.id));

		for record in &batch.records {
			store_record(&mut tx, record).await?;
			touched.extend(record.creators.iter().filter_map(|creator| creator.expert_id));
		}
		for expert_id in &touched {
			refresh_expert(&mut tx, *expert_id).await?;
		}

		tx.commit().await?;

		let report = CatalogReport {
			subjects: batch.subjects.len(),
			experts: batch.experts.len(),
			records: batch.records.len(),
			experts_refreshed: touched.len(),
		};

		tracing::info!(
			subjects = report.subjects,
			experts = report.experts,
			records = report.records,
			experts_refreshed = report.experts_refreshed,
			"Catalog batch ingested."
		);

		Ok(report)
	}
}

fn validate_batch(batch: &CatalogBatch) -> Result<()> {
	for subject in &batch.subjects {
		if subject.keyword.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: format!("Subject {} keyword must be non-empty.", subject.id),
			});
		}
	}
	for expert in &batch.experts {
		if expert.last_name.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: format!("Expert {} last_name must be non-empty.", expert.id),
			});
		}

		if let Some(orcid) = expert.orcid.as_deref()
			&& !codec::is_valid_orcid(orcid.trim())
		{
			return Err(Error::InvalidRequest {
				message: format!("Expert {} ORCiD is malformed.", expert.id),
			});
		}
	}
	for record in &batch.records {
		if record.title.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: format!("Record {} title must be non-empty.", record.id),
			});
		}

		if let Some(bib_hash) = record.bib_hash.as_deref() {
			codec::bib_hash_to_bytes(bib_hash).map_err(|err| Error::InvalidRequest {
				message: format!("Record {} bib_hash is malformed: {err}", record.id),
			})?;
		}
	}

	Ok(())
}

async fn store_record(conn: &mut PgConnection, record: &RecordInput) -> Result<()> {
	if !catalog::record_type_exists(&mut *conn, record.record_type).await? {
		return Err(Error::InvalidRequest {
			message: format!("Record {} has unknown type {}.", record.id, record.record_type),
		});
	}

	let mut subject_ids = record.subject_ids.clone();

	subject_ids.sort_unstable();
	subject_ids.dedup();

	let subjects = catalog::read_subjects_by_ids(conn, &subject_ids).await?;

	if subjects.len() != subject_ids.len() {
		return Err(Error::NotFound {
			message: format!("Record {} references unknown subjects.", record.id),
		});
	}

	for expert_id in record.creators.iter().filter_map(|creator| creator.expert_id) {
		if !catalog::expert_exists(&mut *conn, expert_id).await? {
			return Err(Error::NotFound {
				message: format!("Record {} references unknown expert {expert_id}.", record.id),
			});
		}
	}

	let keywords = subjects.into_iter().map(|subject| subject.keyword).collect::<Vec<_>>();
	let creators = record
		.creators
		.iter()
		.map(|creator| fragment::display_name(&creator.first_name, &creator.last_name))
		.collect::<Vec<_>>();
	let source = RecordSource {
		record_id: record.id,
		title: record.title.trim(),
		year: record.year,
		abstract_text: record.abstract_text.trim(),
		record_type: record.record_type,
		doi: record.doi.as_deref(),
		repository_link: record.repository_link.as_deref(),
		pdf_link: record.pdf_link.as_deref(),
		creators: &creators,
		subjects: &keywords,
	};
	let preview_fragment = fragment::record_preview(&source)?;
	let detail_fragment = fragment::record_detail(&source)?;

	catalog::upsert_record(
		conn,
		&RecordRow {
			record_id: record.id,
			title: source.title,
			year: record.year,
			abstract_text: source.abstract_text,
			record_type_id: record.record_type,
			doi: source.doi,
			repository_link: source.repository_link,
			pdf_link: source.pdf_link,
			bib_hash: record.bib_hash.as_deref(),
			preview_fragment: &preview_fragment,
			detail_fragment: &detail_fragment,
		},
	)
	.await?;

	let creator_rows = record
		.creators
		.iter()
		.map(|creator| CreatorRow {
			first_name: creator.first_name.trim(),
			last_name: creator.last_name.trim(),
			expert_id: creator.expert_id,
		})
		.collect::<Vec<_>>();

	catalog::replace_record_creators(conn, record.id, &creator_rows).await?;
	catalog::replace_record_subjects(conn, record.id, &subject_ids).await?;

	Ok(())
}

/// Recomputes one expert's subject weights and both fragments from what is stored now.
async fn refresh_expert(conn: &mut PgConnection, expert_id: i64) -> Result<()> {
	let identity = catalog::read_expert_identity(conn, expert_id)
		.await?
		.ok_or_else(|| Error::NotFound { message: format!("Expert {expert_id} not found.") })?;

	catalog::refresh_expert_subject_weights(conn, expert_id).await?;

	let subjects = catalog::read_expert_subjects(conn, expert_id)
		.await?
		.into_iter()
		.map(|subject| subject.keyword)
		.collect::<Vec<_>>();
	let records = catalog::read_expert_records(conn, expert_id).await?;
	let record_ids = records.iter().map(|record| record.record_id).collect::<Vec<_>>();
	let mut creators_by_record: HashMap<i64, Vec<String>> = HashMap::new();

	for name in catalog::read_creator_names(conn, &record_ids).await? {
		creators_by_record
			.entry(name.record_id)
			.or_default()
			.push(fragment::display_name(&name.first_name, &name.last_name));
	}

	let records = records
		.into_iter()
		.map(|record| ExpertRecordSource {
			creators: creators_by_record.remove(&record.record_id).unwrap_or_default(),
			record_id: record.record_id,
			title: record.title,
			year: record.year,
		})
		.collect::<Vec<_>>();
	let source = ExpertSource {
		expert_id,
		first_name: &identity.first_name,
		last_name: &identity.last_name,
		orcid: identity.orcid.as_deref(),
		subjects: &subjects,
		records: &records,
	};
	let preview_fragment = fragment::expert_preview(&source)?;
	let detail_fragment = fragment::expert_detail(&source)?;

	catalog::update_expert_fragments(conn, expert_id, &preview_fragment, &detail_fragment).await?;

	Ok(())
}
