use std::collections::HashMap;

use chrono::naive::NaiveDate;
use chrono::Datelike;

use serde::{Deserialize, Serialize};

use smartstring::alias::{String as SmartString};

use super::rivm::{CaseRecord, HospitalizationRecord};


pub static COUNTRY_NAME: &'static str = "Netherlands";


// Case row plus whatever the hospitalization table had for the same
// (date, municipality); admissions stay absent when nothing matched.
#[derive(Debug, Clone)]
pub struct MergedRecord {
	pub case: CaseRecord,
	pub hospital_admissions: Option<u64>,
}

pub fn merge_datasets(cases: Vec<CaseRecord>, hospitalizations: &[HospitalizationRecord]) -> Vec<MergedRecord> {
	let mut admissions: HashMap<(NaiveDate, SmartString), u64> = HashMap::with_capacity(hospitalizations.len());
	for rec in hospitalizations {
		// later source files win on key collisions
		admissions.insert((rec.statistics_date, rec.municipality_code.clone()), rec.admissions);
	}
	cases.into_iter().map(|case| {
		let hospital_admissions = admissions
			.get(&(case.publication_date, case.municipality_code.clone()))
			.copied();
		MergedRecord{
			case,
			hospital_admissions,
		}
	}).collect()
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRecord {
	#[serde(rename = "Date_of_statistics")]
	pub statistics_date: NaiveDate,
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
	#[serde(rename = "Hospital_admission")]
	pub hospital_admissions: Option<u64>,
	#[serde(rename = "Year_of_statistics")]
	pub year: i32,
	#[serde(rename = "Month_of_statistics")]
	pub month: u32,
	#[serde(rename = "Week_of_statistics")]
	pub week: u32,
	#[serde(rename = "Isomonth_of_statistics")]
	pub isomonth: SmartString,
	#[serde(rename = "Isoweek_of_statistics")]
	pub isoweek: SmartString,
	#[serde(rename = "Country")]
	pub country: SmartString,
}

// The source spells Friesland with the Frisian diacritic form.
fn fix_frisian_name(name: &mut SmartString) {
	if &name[..] == "Fryslân" {
		*name = "Friesland".into();
	}
}

impl CanonicalRecord {
	fn from_merged(rec: MergedRecord) -> Self {
		let MergedRecord{case, hospital_admissions} = rec;
		let date = case.publication_date;
		let year = date.year();
		let month = date.month();
		// calendar year paired with the ISO week number, as published
		let week = date.iso_week().week();
		let mut province = case.province;
		let mut security_region_name = case.security_region_name;
		fix_frisian_name(&mut province);
		fix_frisian_name(&mut security_region_name);
		Self{
			statistics_date: date,
			municipality_code: case.municipality_code,
			municipality_name: case.municipality_name,
			province,
			security_region_code: case.security_region_code,
			security_region_name,
			health_service: case.health_service,
			roaz_region: case.roaz_region,
			total_reported: case.total_reported,
			deceased: case.deceased,
			hospital_admissions,
			year,
			month,
			week,
			isomonth: format!("{:04}{:02}", year, month).into(),
			isoweek: format!("{:04}{:02}", year, week).into(),
			country: COUNTRY_NAME.into(),
		}
	}
}

pub fn normalize(merged: Vec<MergedRecord>) -> Vec<CanonicalRecord> {
	merged.into_iter().map(CanonicalRecord::from_merged).collect()
}


#[cfg(test)]
mod tests {
	use super::*;

	fn case(date: NaiveDate, municipality_code: &str, province: &str) -> CaseRecord {
		CaseRecord{
			version: "4".into(),
			report_date: "2023-04-01 10:00:00".into(),
			publication_date: date,
			municipality_code: municipality_code.into(),
			municipality_name: "Testgemeente".into(),
			province: province.into(),
			security_region_code: "VR01".into(),
			security_region_name: province.into(),
			health_service: "GGD Test".into(),
			roaz_region: "ROAZ Test".into(),
			total_reported: 1,
			deceased: 0,
		}
	}

	fn admission(date: NaiveDate, municipality_code: &str, admissions: u64) -> HospitalizationRecord {
		HospitalizationRecord{
			statistics_date: date,
			municipality_code: municipality_code.into(),
			admissions,
		}
	}

	#[test]
	fn merge_keeps_case_row_count() {
		let d1 = NaiveDate::from_ymd(2020, 3, 1);
		let d2 = NaiveDate::from_ymd(2020, 3, 2);
		let cases = vec![
			case(d1, "GM0344", "Utrecht"),
			case(d2, "GM0344", "Utrecht"),
			case(d1, "GM0014", "Groningen"),
		];
		let hosp = vec![
			admission(d1, "GM0344", 4),
			// no case row for this one; it must be dropped
			admission(d1, "GM9999", 12),
		];
		let merged = merge_datasets(cases, &hosp);
		assert_eq!(merged.len(), 3);
		assert_eq!(merged[0].hospital_admissions, Some(4));
		assert_eq!(merged[1].hospital_admissions, None);
		assert_eq!(merged[2].hospital_admissions, None);
	}

	#[test]
	fn merge_joins_on_date_and_municipality() {
		let d1 = NaiveDate::from_ymd(2020, 3, 1);
		let d2 = NaiveDate::from_ymd(2020, 3, 2);
		let cases = vec![case(d2, "GM0344", "Utrecht")];
		let hosp = vec![
			admission(d1, "GM0344", 4),
			admission(d2, "GM0344", 9),
		];
		let merged = merge_datasets(cases, &hosp);
		assert_eq!(merged[0].hospital_admissions, Some(9));
	}

	#[test]
	fn normalize_derives_calendar_fields() {
		let date = NaiveDate::from_ymd(2020, 4, 5);
		let merged = merge_datasets(vec![case(date, "GM0344", "Utrecht")], &[]);
		let canonical = normalize(merged);
		let rec = &canonical[0];
		assert_eq!(rec.statistics_date, date);
		assert_eq!(rec.year, 2020);
		assert_eq!(rec.month, 4);
		assert_eq!(rec.week, 14);
		assert_eq!(&rec.isomonth[..], "202004");
		assert_eq!(&rec.isoweek[..], "202014");
		assert_eq!(&rec.country[..], COUNTRY_NAME);
	}

	#[test]
	fn normalize_pairs_calendar_year_with_iso_week() {
		// 2021-01-01 falls in ISO week 53 of 2020; the published format
		// still prefixes the calendar year.
		let date = NaiveDate::from_ymd(2021, 1, 1);
		let canonical = normalize(merge_datasets(vec![case(date, "GM0344", "Utrecht")], &[]));
		assert_eq!(canonical[0].year, 2021);
		assert_eq!(canonical[0].week, 53);
		assert_eq!(&canonical[0].isoweek[..], "202153");
	}

	#[test]
	fn iso_keys_are_six_digits_for_any_year() {
		for &(y, m, d) in &[(1, 1, 1), (987, 6, 15), (2023, 12, 31), (9999, 12, 31)] {
			let date = NaiveDate::from_ymd(y, m, d);
			let canonical = normalize(merge_datasets(vec![case(date, "GM0344", "Utrecht")], &[]));
			assert_eq!(canonical[0].isomonth.len(), 6, "isomonth for {}", date);
			assert_eq!(canonical[0].isoweek.len(), 6, "isoweek for {}", date);
		}
	}

	#[test]
	fn normalize_fixes_frisian_spelling() {
		let date = NaiveDate::from_ymd(2020, 3, 1);
		let canonical = normalize(merge_datasets(vec![case(date, "GM0055", "Fryslân")], &[]));
		assert_eq!(&canonical[0].province[..], "Friesland");
		assert_eq!(&canonical[0].security_region_name[..], "Friesland");
	}

	#[test]
	fn normalize_keeps_other_provinces() {
		let date = NaiveDate::from_ymd(2020, 3, 1);
		let canonical = normalize(merge_datasets(vec![case(date, "GM0344", "Utrecht")], &[]));
		assert_eq!(&canonical[0].province[..], "Utrecht");
	}

	#[test]
	fn normalize_of_nothing_is_nothing() {
		assert!(normalize(Vec::new()).is_empty());
	}
}
