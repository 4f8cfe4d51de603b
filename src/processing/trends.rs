//! Market trends computed over the job dataset

use crate::dataset::JobRecord;
use crate::processing::text_normalizer::split_skill_list;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDemand {
    pub location: String,
    pub count: usize,
}

/// Posting counts for one month, keyed by job title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDemand {
    /// `YYYY-MM`
    pub month: String,
    pub postings: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    pub job_title: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

pub struct MarketTrendAggregator;

impl MarketTrendAggregator {
    /// Count raw skill mentions across records.
    ///
    /// Skills are taken from the unnormalized `Required_Skills` text, split on
    /// commas and trimmed, so "Python" and "python" count separately.
    pub fn aggregate<'a, I>(records: I) -> HashMap<String, usize>
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        let mut counts = HashMap::new();
        for record in records {
            for skill in split_skill_list(&record.required_skills_raw) {
                *counts.entry(skill.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Order counts by frequency, highest first, ties by skill name
    pub fn rank(counts: HashMap<String, usize>) -> Vec<SkillDemand> {
        let mut ranked: Vec<SkillDemand> = counts
            .into_iter()
            .map(|(skill, count)| SkillDemand { skill, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
        ranked
    }

    pub fn ranked<'a, I>(records: I) -> Vec<SkillDemand>
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        Self::rank(Self::aggregate(records))
    }

    pub fn top<'a, I>(records: I, n: usize) -> Vec<SkillDemand>
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        let mut ranked = Self::ranked(records);
        ranked.truncate(n);
        ranked
    }

    /// Postings per location, rows without a location are skipped
    pub fn location_distribution<'a, I>(records: I) -> Vec<LocationDemand>
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for location in records.into_iter().filter_map(|r| r.location.as_deref()) {
            *counts.entry(location).or_insert(0) += 1;
        }

        let mut distribution: Vec<LocationDemand> = counts
            .into_iter()
            .map(|(location, count)| LocationDemand {
                location: location.to_string(),
                count,
            })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
        distribution
    }

    /// Postings grouped by month and job title, in chronological order.
    ///
    /// Every title seen on a dated row appears in every month, with zero when
    /// it had no postings that month. Undated rows are dropped.
    pub fn monthly_demand<'a, I>(records: I) -> Vec<MonthlyDemand>
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        let mut by_month: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut titles = BTreeSet::new();

        for record in records {
            let Some(date) = record.posting_date else {
                continue;
            };
            titles.insert(record.job_title.clone());
            *by_month
                .entry(date.format("%Y-%m").to_string())
                .or_default()
                .entry(record.job_title.clone())
                .or_insert(0) += 1;
        }

        by_month
            .into_iter()
            .map(|(month, mut postings)| {
                for title in &titles {
                    postings.entry(title.clone()).or_insert(0);
                }
                MonthlyDemand { month, postings }
            })
            .collect()
    }

    /// Compensation statistics per job title, ordered by title
    pub fn salary_distribution<'a, I>(records: I) -> Vec<SalaryStats>
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        let mut by_title: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records {
            by_title
                .entry(record.job_title.as_str())
                .or_default()
                .push(record.base_compensation);
        }

        by_title
            .into_iter()
            .map(|(title, mut values)| {
                values.sort_by(f64::total_cmp);
                SalaryStats {
                    job_title: title.to_string(),
                    count: values.len(),
                    min: values[0],
                    q1: quantile(&values, 0.25),
                    median: quantile(&values, 0.5),
                    q3: quantile(&values, 0.75),
                    max: values[values.len() - 1],
                    mean: values.iter().sum::<f64>() / values.len() as f64,
                }
            })
            .collect()
    }
}

/// Linear interpolation between closest ranks of a sorted, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
