use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::str::FromStr;

use chrono::naive::NaiveDate;

use log::warn;

use smartstring::alias::{String as SmartString};

use super::dataset::CanonicalRecord;
use super::store::{DataStore, ALLTIME_LABEL};
use super::table::SumTable;


// Pseudo-provinces selecting the whole country.
pub static NATIONAL_AGGREGATE: &'static str = "Netherlands";
pub static ALL_PROVINCES: &'static str = "All provinces";


#[derive(Debug, Clone)]
pub struct ParseOptionError {
	kind: &'static str,
	value: String,
}

impl ParseOptionError {
	fn new(kind: &'static str, value: &str) -> Self {
		Self{
			kind,
			value: value.into(),
		}
	}
}

impl fmt::Display for ParseOptionError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "unknown {}: {}", self.kind, self.value)
	}
}

impl std::error::Error for ParseOptionError {}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
	TotalReported,
	HospitalAdmission,
	Deceased,
}

impl Metric {
	// Also the precedence order for single-metric charts.
	pub const ALL: [Metric; 3] = [
		Metric::TotalReported,
		Metric::HospitalAdmission,
		Metric::Deceased,
	];

	pub fn column(&self) -> &'static str {
		match self {
			Self::TotalReported => "Total_reported",
			Self::HospitalAdmission => "Hospital_admission",
			Self::Deceased => "Deceased",
		}
	}

	pub fn value(&self, rec: &CanonicalRecord) -> u64 {
		match self {
			Self::TotalReported => rec.total_reported,
			// absent admissions count as zero in sums
			Self::HospitalAdmission => rec.hospital_admissions.unwrap_or(0),
			Self::Deceased => rec.deceased,
		}
	}
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.column())
	}
}

impl FromStr for Metric {
	type Err = ParseOptionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Total_reported" => Ok(Self::TotalReported),
			"Hospital_admission" => Ok(Self::HospitalAdmission),
			"Deceased" => Ok(Self::Deceased),
			_ => Err(ParseOptionError::new("metric", s)),
		}
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
	Country,
	Province,
	MunicipalityName,
	MonthOfStatistics,
}

impl Dimension {
	pub fn column(&self) -> &'static str {
		match self {
			Self::Country => "Country",
			Self::Province => "Province",
			Self::MunicipalityName => "Municipality_name",
			Self::MonthOfStatistics => "Month_of_statistics",
		}
	}

	fn key(&self, rec: &CanonicalRecord) -> GroupLabel {
		match self {
			Self::Country => GroupLabel::Text(rec.country.clone()),
			Self::Province => GroupLabel::Text(rec.province.clone()),
			Self::MunicipalityName => GroupLabel::Text(rec.municipality_name.clone()),
			Self::MonthOfStatistics => GroupLabel::Month(rec.month),
		}
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
	DateOfStatistics,
	IsoweekOfStatistics,
	IsomonthOfStatistics,
}

impl DateFormat {
	pub fn column(&self) -> &'static str {
		match self {
			Self::DateOfStatistics => "Date_of_statistics",
			Self::IsoweekOfStatistics => "Isoweek_of_statistics",
			Self::IsomonthOfStatistics => "Isomonth_of_statistics",
		}
	}

	fn key(&self, rec: &CanonicalRecord) -> GroupLabel {
		match self {
			Self::DateOfStatistics => GroupLabel::Date(rec.statistics_date),
			Self::IsoweekOfStatistics => GroupLabel::Text(rec.isoweek.clone()),
			Self::IsomonthOfStatistics => GroupLabel::Text(rec.isomonth.clone()),
		}
	}
}

impl FromStr for DateFormat {
	type Err = ParseOptionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Date_of_statistics" => Ok(Self::DateOfStatistics),
			"Isoweek_of_statistics" => Ok(Self::IsoweekOfStatistics),
			"Isomonth_of_statistics" => Ok(Self::IsomonthOfStatistics),
			_ => Err(ParseOptionError::new("date format", s)),
		}
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
	Ascending,
	Descending,
}

impl FromStr for SortOrder {
	type Err = ParseOptionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Ascending" | "ascending" | "asc" => Ok(Self::Ascending),
			"Descending" | "descending" | "desc" => Ok(Self::Descending),
			_ => Err(ParseOptionError::new("sort order", s)),
		}
	}
}


// Group labels order the way their column does: months and dates
// numerically/chronologically, everything else lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupLabel {
	Text(SmartString),
	Month(u32),
	Date(NaiveDate),
}

impl fmt::Display for GroupLabel {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Text(s) => f.write_str(s),
			Self::Month(m) => write!(f, "{}", m),
			Self::Date(d) => write!(f, "{}", d),
		}
	}
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedRow {
	pub label: GroupLabel,
	pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedTable {
	pub x_column: &'static str,
	pub metrics: Vec<Metric>,
	pub rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
	pub fn metric_index(&self, metric: Metric) -> Option<usize> {
		self.metrics.iter().position(|m| *m == metric)
	}

	pub fn write_csv<W: io::Write>(&self, w: W) -> io::Result<()> {
		let mut w = csv::Writer::from_writer(w);
		let mut record = Vec::with_capacity(self.metrics.len() + 1);
		record.push(self.x_column.to_string());
		for metric in self.metrics.iter() {
			record.push(metric.column().to_string());
		}
		w.write_record(&record)?;
		for row in self.rows.iter() {
			record.clear();
			record.push(row.label.to_string());
			for v in row.values.iter() {
				record.push(v.to_string());
			}
			w.write_record(&record)?;
		}
		w.flush()?;
		Ok(())
	}
}


// Loads one logical year and restricts it to a province, unless one of the
// whole-country pseudo-provinces is selected. A year without a persisted
// file yields an empty table instead of an error.
pub fn filter(store: &DataStore, year: &str, province: &str) -> io::Result<Vec<CanonicalRecord>> {
	let mut records = match store.load_year(year) {
		Ok(records) => records,
		Err(e) if e.kind() == io::ErrorKind::NotFound => {
			warn!("no data found for year {}", year);
			return Ok(Vec::new())
		},
		Err(e) => return Err(e),
	};
	if province != NATIONAL_AGGREGATE && province != ALL_PROVINCES {
		records.retain(|rec| &rec.province[..] == province);
	}
	Ok(records)
}

fn aggregate_by_key<F: Fn(&CanonicalRecord) -> GroupLabel>(
		records: &[CanonicalRecord],
		metrics: &[Metric],
		x_column: &'static str,
		key: F,
) -> AggregatedTable {
	let mut sums = SumTable::new(metrics.len());
	let mut values = Vec::with_capacity(metrics.len());
	for rec in records {
		values.clear();
		for metric in metrics {
			values.push(metric.value(rec));
		}
		sums.add(key(rec), &values);
	}
	AggregatedTable{
		x_column,
		metrics: metrics.to_vec(),
		rows: sums.into_iter().map(|(label, values)| AggregatedRow{label, values}).collect(),
	}
}

pub fn aggregate(records: &[CanonicalRecord], metrics: &[Metric], dimension: Dimension) -> AggregatedTable {
	aggregate_by_key(records, metrics, dimension.column(), |rec| dimension.key(rec))
}

pub fn aggregate_by_date(records: &[CanonicalRecord], metrics: &[Metric], date_format: DateFormat) -> AggregatedTable {
	aggregate_by_key(records, metrics, date_format.column(), |rec| date_format.key(rec))
}

pub fn sort(table: &mut AggregatedTable, by: Metric, order: SortOrder) {
	let index = match table.metric_index(by) {
		Some(index) => index,
		None => {
			warn!("cannot sort by {}: not an aggregated column", by);
			return
		},
	};
	match order {
		SortOrder::Ascending => table.rows.sort_by(|a, b| a.values[index].cmp(&b.values[index])),
		SortOrder::Descending => table.rows.sort_by(|a, b| b.values[index].cmp(&a.values[index])),
	}
}

// One dimension is ever active; when the toggles disagree this is the
// tie-break order.
pub fn select_dimension(province: &str, municipality: bool, month: bool) -> Dimension {
	if province == NATIONAL_AGGREGATE && !month {
		Dimension::Country
	} else if municipality {
		Dimension::MunicipalityName
	} else if month {
		Dimension::MonthOfStatistics
	} else {
		Dimension::Province
	}
}

pub fn year_options(records: &[CanonicalRecord]) -> Vec<SmartString> {
	let years: BTreeSet<i32> = records.iter().map(|rec| rec.year).collect();
	let mut options: Vec<SmartString> = Vec::with_capacity(years.len() + 1);
	options.push(ALLTIME_LABEL.into());
	for year in years {
		options.push(year.to_string().into());
	}
	options
}

pub fn province_options(records: &[CanonicalRecord]) -> Vec<SmartString> {
	let provinces: BTreeSet<&str> = records.iter()
		.map(|rec| &rec.province[..])
		.filter(|p| !p.is_empty())
		.collect();
	let mut options: Vec<SmartString> = Vec::with_capacity(provinces.len() + 2);
	options.push(NATIONAL_AGGREGATE.into());
	options.push(ALL_PROVINCES.into());
	for province in provinces {
		options.push(province.into());
	}
	options
}
