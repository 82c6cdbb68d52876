//! Precompute format for stored record and expert fragments.
//!
//! Every fragment is a complete JSON object holding immutable catalog data only. Changing a shape
//! here requires re-ingesting the catalog so stored fragments match again.

use serde::Serialize;

use crate::Result;

pub struct RecordSource<'a> {
	pub record_id: i64,
	pub title: &'a str,
	pub year: i32,
	pub abstract_text: &'a str,
	pub record_type: i16,
	pub doi: Option<&'a str>,
	pub repository_link: Option<&'a str>,
	pub pdf_link: Option<&'a str>,
	/// Display names in authorship order.
	pub creators: &'a [String],
	pub subjects: &'a [String],
}

pub struct ExpertSource<'a> {
	pub expert_id: i64,
	pub first_name: &'a str,
	pub last_name: &'a str,
	pub orcid: Option<&'a str>,
	/// Keywords, heaviest weight first.
	pub subjects: &'a [String],
	/// Attributed records, newest first.
	pub records: &'a [ExpertRecordSource],
}

pub struct ExpertRecordSource {
	pub record_id: i64,
	pub title: String,
	pub year: i32,
	pub creators: Vec<String>,
}

#[derive(Serialize)]
struct RecordPreview<'a> {
	id: i64,
	title: &'a str,
	year: i32,
	creators: String,
	subjects: &'a [String],
	#[serde(rename = "abstract")]
	abstract_text: &'a str,
	#[serde(rename = "type")]
	record_type: i16,
}

#[derive(Serialize)]
struct RecordDetail<'a> {
	id: i64,
	title: &'a str,
	creators: &'a [String],
	subjects: &'a [String],
	year: i32,
	#[serde(rename = "abstract")]
	abstract_text: &'a str,
	#[serde(rename = "type")]
	record_type: i16,
	#[serde(skip_serializing_if = "Option::is_none")]
	doi: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	repository_link: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pdf_link: Option<&'a str>,
}

#[derive(Serialize)]
struct ExpertPreview<'a> {
	id: i64,
	name: String,
	last_publication_year: Option<i32>,
	total_publication_count: usize,
	subjects: &'a [String],
}

#[derive(Serialize)]
struct ExpertDetail<'a> {
	expert_id: i64,
	name: String,
	subjects: &'a [String],
	#[serde(skip_serializing_if = "Option::is_none")]
	orcid: Option<&'a str>,
	last_publication_year: Option<i32>,
	records: Vec<ExpertDetailRecord<'a>>,
}

#[derive(Serialize)]
struct ExpertDetailRecord<'a> {
	id: i64,
	title: &'a str,
	year: i32,
	creators: &'a [String],
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
	format!("{} {}", first_name.trim(), last_name.trim()).trim().to_string()
}

pub fn record_preview(src: &RecordSource<'_>) -> Result<String> {
	let preview = RecordPreview {
		id: src.record_id,
		title: src.title,
		year: src.year,
		creators: src.creators.join(", "),
		subjects: src.subjects,
		abstract_text: src.abstract_text,
		record_type: src.record_type,
	};

	Ok(serde_json::to_string(&preview)?)
}

pub fn record_detail(src: &RecordSource<'_>) -> Result<String> {
	let detail = RecordDetail {
		id: src.record_id,
		title: src.title,
		creators: src.creators,
		subjects: src.subjects,
		year: src.year,
		abstract_text: src.abstract_text,
		record_type: src.record_type,
		doi: src.doi,
		repository_link: src.repository_link,
		pdf_link: src.pdf_link,
	};

	Ok(serde_json::to_string(&detail)?)
}

pub fn expert_preview(src: &ExpertSource<'_>) -> Result<String> {
	let preview = ExpertPreview {
		id: src.expert_id,
		name: display_name(src.first_name, src.last_name),
		last_publication_year: last_publication_year(src.records),
		total_publication_count: src.records.len(),
		subjects: src.subjects,
	};

	Ok(serde_json::to_string(&preview)?)
}

pub fn expert_detail(src: &ExpertSource<'_>) -> Result<String> {
	let detail = ExpertDetail {
		expert_id: src.expert_id,
		name: display_name(src.first_name, src.last_name),
		subjects: src.subjects,
		orcid: src.orcid,
		last_publication_year: last_publication_year(src.records),
		records: src
			.records
			.iter()
			.map(|record| ExpertDetailRecord {
				id: record.record_id,
				title: &record.title,
				year: record.year,
				creators: &record.creators,
			})
			.collect(),
	};

	Ok(serde_json::to_string(&detail)?)
}

fn last_publication_year(records: &[ExpertRecordSource]) -> Option<i32> {
	records.iter().map(|record| record.year).max()
}
