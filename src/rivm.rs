use chrono::naive::NaiveDate;

use enum_map::{enum_map, Enum, EnumMap};

use serde::Deserialize;

use smartstring::alias::{String as SmartString};

use super::table::SumTable;


pub static CASE_DATA_URLS: [&'static str; 2] = [
	"https://data.rivm.nl/covid-19/COVID-19_aantallen_gemeente_per_dag.csv",
	"https://data.rivm.nl/covid-19/COVID-19_aantallen_gemeente_per_dag_tm_03102021.csv",
];
pub static HOSPITALIZATION_DATA_URLS: [&'static str; 2] = [
	"https://data.rivm.nl/covid-19/COVID-19_ziekenhuisopnames.csv",
	"https://data.rivm.nl/data/covid-19/COVID-19_ziekenhuisopnames_tm_03102021.csv",
];

pub static LEGACY_MUNICIPALITIES: [&'static str; 3] = ["Brielle", "Hellevoetsluis", "Westvoorne"];
pub static MERGED_MUNICIPALITY_CODE: &'static str = "GM1992";
pub static MERGED_MUNICIPALITY_NAME: &'static str = "Voorne aan zee";

// RIVM publishes 9999 where a deceased count is suppressed.
pub static DECEASED_SENTINEL: u64 = 9999;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum DatasetKind {
	Cases,
	Hospitalizations,
}

// Each dataset is split across a current file and a frozen historical tail.
pub fn source_urls() -> EnumMap<DatasetKind, &'static [&'static str]> {
	enum_map! {
		DatasetKind::Cases => &CASE_DATA_URLS[..],
		DatasetKind::Hospitalizations => &HOSPITALIZATION_DATA_URLS[..],
	}
}


#[derive(Debug, Clone, Deserialize)]
pub struct CaseRecord {
	#[serde(rename = "Version")]
	pub version: SmartString,
	#[serde(rename = "Date_of_report")]
	pub report_date: SmartString,
	#[serde(rename = "Date_of_publication")]
	pub publication_date: NaiveDate,
	#[serde(rename = "Municipality_code")]
	pub municipality_code: SmartString,
	#[serde(rename = "Municipality_name")]
	pub municipality_name: SmartString,
	#[serde(rename = "Province")]
	pub province: SmartString,
	#[serde(rename = "Security_region_code")]
	pub security_region_code: SmartString,
	#[serde(rename = "Security_region_name")]
	pub security_region_name: SmartString,
	#[serde(rename = "Municipal_health_service")]
	pub health_service: SmartString,
	#[serde(rename = "ROAZ_region")]
	pub roaz_region: SmartString,
	#[serde(rename = "Total_reported")]
	pub total_reported: u64,
	#[serde(rename = "Deceased")]
	pub deceased: u64,
}

pub type CaseGroupKey = (
	SmartString,
	SmartString,
	NaiveDate,
	SmartString,
	SmartString,
	SmartString,
	SmartString,
	SmartString,
);

impl CaseRecord {
	pub fn is_legacy_municipality(&self) -> bool {
		LEGACY_MUNICIPALITIES.contains(&&self.municipality_name[..])
	}

	// Everything identifying except the municipality itself.
	fn group_key(&self) -> CaseGroupKey {
		(
			self.version.clone(),
			self.report_date.clone(),
			self.publication_date,
			self.province.clone(),
			self.security_region_code.clone(),
			self.security_region_name.clone(),
			self.health_service.clone(),
			self.roaz_region.clone(),
		)
	}
}


#[derive(Debug, Clone, Deserialize)]
pub struct HospitalizationRecord {
	#[serde(rename = "Date_of_statistics")]
	pub statistics_date: NaiveDate,
	#[serde(rename = "Municipality_code")]
	pub municipality_code: SmartString,
	#[serde(rename = "Hospital_admission")]
	pub admissions: u64,
}


pub fn repair_case_data(records: Vec<CaseRecord>) -> Vec<CaseRecord> {
	let mut retained = Vec::with_capacity(records.len());
	let mut legacy = SumTable::<CaseGroupKey, u64>::new(2);
	for rec in records {
		if rec.is_legacy_municipality() {
			legacy.add(rec.group_key(), &[rec.total_reported, rec.deceased]);
		} else {
			retained.push(rec);
		}
	}
	for (key, sums) in legacy {
		let (
			version,
			report_date,
			publication_date,
			province,
			security_region_code,
			security_region_name,
			health_service,
			roaz_region,
		) = key;
		retained.push(CaseRecord{
			version,
			report_date,
			publication_date,
			municipality_code: MERGED_MUNICIPALITY_CODE.into(),
			municipality_name: MERGED_MUNICIPALITY_NAME.into(),
			province,
			security_region_code,
			security_region_name,
			health_service,
			roaz_region,
			total_reported: sums[0],
			deceased: sums[1],
		});
	}
	// The sentinel pass runs after the merge-back; a suppressed value that
	// entered a merge group inflates the sum past the sentinel, hence >=.
	for rec in retained.iter_mut() {
		if rec.deceased >= DECEASED_SENTINEL {
			rec.deceased = 0;
		}
	}
	retained
}


#[cfg(test)]
mod tests {
	use super::*;

	fn case(municipality_code: &str, municipality_name: &str, total_reported: u64, deceased: u64) -> CaseRecord {
		CaseRecord{
			version: "4".into(),
			report_date: "2023-04-01 10:00:00".into(),
			publication_date: NaiveDate::from_ymd(2023, 3, 31),
			municipality_code: municipality_code.into(),
			municipality_name: municipality_name.into(),
			province: "Zuid-Holland".into(),
			security_region_code: "VR17".into(),
			security_region_name: "Rotterdam-Rijnmond".into(),
			health_service: "GGD Rotterdam-Rijnmond".into(),
			roaz_region: "Traumacentrum Zuid West Nederland".into(),
			total_reported,
			deceased,
		}
	}

	#[test]
	fn parses_semicolon_delimited_source() {
		let raw = "\
Version;Date_of_report;Date_of_publication;Municipality_code;Municipality_name;Province;Security_region_code;Security_region_name;Municipal_health_service;ROAZ_region;Total_reported;Deceased
4;2023-04-01 10:00:00;2020-03-01;GM0501;Brielle;Zuid-Holland;VR17;Rotterdam-Rijnmond;GGD Rotterdam-Rijnmond;Traumacentrum Zuid West Nederland;5;0
";
		let mut r = csv::ReaderBuilder::new()
			.delimiter(b';')
			.from_reader(raw.as_bytes());
		let recs: Vec<CaseRecord> = r.deserialize().collect::<Result<_, _>>().unwrap();
		assert_eq!(recs.len(), 1);
		assert_eq!(&recs[0].municipality_name[..], "Brielle");
		assert_eq!(recs[0].publication_date, NaiveDate::from_ymd(2020, 3, 1));
		assert_eq!(recs[0].total_reported, 5);
	}

	#[test]
	fn merges_legacy_municipalities() {
		let input = vec![
			case("GM0501", "Brielle", 5, 0),
			case("GM0530", "Hellevoetsluis", 3, 1),
			case("GM0614", "Westvoorne", 2, 0),
			case("GM0344", "Utrecht", 7, 2),
		];
		let repaired = repair_case_data(input);
		assert_eq!(repaired.len(), 2);
		assert_eq!(&repaired[0].municipality_name[..], "Utrecht");
		let merged = &repaired[1];
		assert_eq!(&merged.municipality_code[..], MERGED_MUNICIPALITY_CODE);
		assert_eq!(&merged.municipality_name[..], MERGED_MUNICIPALITY_NAME);
		assert_eq!(merged.total_reported, 10);
		assert_eq!(merged.deceased, 1);
	}

	#[test]
	fn sentinel_inside_merge_group_is_suppressed() {
		let input = vec![
			case("GM0501", "Brielle", 5, 9999),
			case("GM0530", "Hellevoetsluis", 3, 1),
		];
		let repaired = repair_case_data(input);
		assert_eq!(repaired.len(), 1);
		assert_eq!(repaired[0].total_reported, 8);
		assert_eq!(repaired[0].deceased, 0);
	}

	#[test]
	fn sentinel_cleared_table_wide() {
		let input = vec![
			case("GM0344", "Utrecht", 7, 9999),
			case("GM0014", "Groningen", 4, 3),
		];
		let repaired = repair_case_data(input);
		assert_eq!(repaired.len(), 2);
		assert_eq!(repaired[0].deceased, 0);
		assert_eq!(repaired[1].deceased, 3);
	}

	#[test]
	fn no_legacy_rows_is_a_noop() {
		let input = vec![
			case("GM0344", "Utrecht", 7, 2),
			case("GM0014", "Groningen", 4, 3),
		];
		let repaired = repair_case_data(input.clone());
		assert_eq!(repaired.len(), input.len());
		for (got, want) in repaired.iter().zip(input.iter()) {
			assert_eq!(&got.municipality_name[..], &want.municipality_name[..]);
			assert_eq!(got.total_reported, want.total_reported);
			assert_eq!(got.deceased, want.deceased);
		}
	}

	#[test]
	fn distinct_group_keys_stay_separate() {
		let mut a = case("GM0501", "Brielle", 5, 0);
		let mut b = case("GM0530", "Hellevoetsluis", 3, 1);
		a.publication_date = NaiveDate::from_ymd(2020, 3, 1);
		b.publication_date = NaiveDate::from_ymd(2020, 3, 2);
		let repaired = repair_case_data(vec![a, b]);
		assert_eq!(repaired.len(), 2);
		assert!(repaired.iter().all(|r| &r.municipality_name[..] == MERGED_MUNICIPALITY_NAME));
	}

	#[test]
	fn source_urls_are_paired() {
		let urls = source_urls();
		assert_eq!(urls[DatasetKind::Cases].len(), 2);
		assert_eq!(urls[DatasetKind::Hospitalizations].len(), 2);
	}
}
