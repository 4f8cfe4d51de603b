//! CSV loading for the job skills dataset

use crate::dataset::record::{ColumnMissing, JobDataset, JobRecord};
use crate::error::{Result, SkillGapError};
use crate::processing::text_normalizer::TextNormalizer;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use std::io::Read;
use std::path::Path;

pub const JOB_TITLE: &str = "Job_Title";
pub const COMPANY: &str = "Company";
pub const REQUIRED_SKILLS: &str = "Required_Skills";
pub const TOTAL_COMPENSATION: &str = "Total_Compensation";
pub const LEARNING_RESOURCES: &str = "Learning Resources";
pub const LOCATION: &str = "Location";
pub const POSTING_DATE: &str = "Posting_Date";

/// Column positions resolved from the header row
struct ColumnIndex {
    job_title: usize,
    required_skills: usize,
    total_compensation: usize,
    company: Option<usize>,
    learning_resources: Option<usize>,
    location: Option<usize>,
    posting_date: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| SkillGapError::MissingColumn(name.to_string()));

        Ok(Self {
            job_title: require(JOB_TITLE)?,
            required_skills: require(REQUIRED_SKILLS)?,
            total_compensation: require(TOTAL_COMPENSATION)?,
            company: find(COMPANY),
            learning_resources: find(LEARNING_RESOURCES),
            location: find(LOCATION),
            posting_date: find(POSTING_DATE),
        })
    }
}

pub struct DatasetLoader<'a> {
    normalizer: &'a TextNormalizer,
}

impl<'a> DatasetLoader<'a> {
    pub fn new(normalizer: &'a TextNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn load_path(&self, path: &Path) -> Result<JobDataset> {
        if !path.exists() {
            return Err(SkillGapError::InvalidInput(format!(
                "Dataset file does not exist: {}",
                path.display()
            )));
        }

        info!("Loading job dataset from: {}", path.display());
        let file = std::fs::File::open(path)?;
        self.load_reader(file)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<JobDataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let columns = ColumnIndex::resolve(&headers)?;
        let mut missing_counts = vec![0usize; headers.len()];

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            // header is line 1
            let line = index + 2;

            for (column, count) in missing_counts.iter_mut().enumerate() {
                if row.get(column).map_or(true, str::is_empty) {
                    *count += 1;
                }
            }

            if let Some(record) = self.parse_row(&row, &columns, line)? {
                records.push(record);
            }
        }

        info!("Loaded {} job records", records.len());

        let missing_values = headers
            .iter()
            .zip(missing_counts)
            .map(|(column, missing)| ColumnMissing {
                column: column.clone(),
                missing,
            })
            .collect();

        Ok(JobDataset::from_records(records).with_schema(headers, missing_values))
    }

    fn parse_row(&self, row: &csv::StringRecord, columns: &ColumnIndex, line: usize) -> Result<Option<JobRecord>> {
        let field = |index: usize| row.get(index).unwrap_or("");
        let optional = |index: Option<usize>| index.map(field).filter(|v| !v.is_empty());

        let title = field(columns.job_title);
        if title.is_empty() {
            warn!("Skipping line {}: empty {}", line, JOB_TITLE);
            return Ok(None);
        }

        let compensation_raw = field(columns.total_compensation);
        if compensation_raw.is_empty() {
            warn!("Skipping line {}: empty {}", line, TOTAL_COMPENSATION);
            return Ok(None);
        }
        let base_compensation = parse_compensation(compensation_raw).ok_or_else(|| {
            SkillGapError::InvalidInput(format!(
                "Line {}: {} is not a non-negative number: '{}'",
                line, TOTAL_COMPENSATION, compensation_raw
            ))
        })?;

        let mut record = JobRecord::new(title, field(columns.required_skills), base_compensation, self.normalizer);

        if let Some(company) = optional(columns.company) {
            record = record.with_company(company);
        }
        if let Some(resources) = optional(columns.learning_resources) {
            record = record.with_learning_resources(resources);
        }
        if let Some(location) = optional(columns.location) {
            record = record.with_location(location);
        }
        if let Some(raw_date) = optional(columns.posting_date) {
            match parse_posting_date(raw_date) {
                Some(date) => record = record.with_posting_date(date),
                None => debug!("Line {}: ignoring unparsable {} '{}'", line, POSTING_DATE, raw_date),
            }
        }

        Ok(Some(record))
    }
}

/// Parse a compensation cell, tolerating `$` and thousands separators
fn parse_compensation(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Accepts ISO dates, slash dates (year first or US order), a date with
/// time of day, and RFC 3339 timestamps
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }

    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}
