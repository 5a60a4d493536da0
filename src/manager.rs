use std::fmt;
use std::io;
use std::path::Path;

use log::info;

use smartstring::alias::{String as SmartString};

use super::dataset::{merge_datasets, normalize, CanonicalRecord};
use super::fetch;
use super::fetch::{have_connectivity, Fetcher};
use super::progress::{default_output, ProgressSink};
use super::query::{filter, province_options, year_options};
use super::rivm::{repair_case_data, DatasetKind};
use super::store::{DataStore, ALLTIME_LABEL};


#[derive(Debug)]
pub enum RefreshError {
	Offline,
	Fetch(fetch::Error),
	Io(io::Error),
}

impl fmt::Display for RefreshError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Offline => f.write_str("no internet connection and local data is outdated or missing"),
			Self::Fetch(e) => fmt::Display::fmt(e, f),
			Self::Io(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl From<fetch::Error> for RefreshError {
	fn from(err: fetch::Error) -> Self {
		Self::Fetch(err)
	}
}

impl From<io::Error> for RefreshError {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::error::Error for RefreshError {}


// Download, repair, merge, normalize, persist. Runs to completion or fails
// without touching the store.
pub fn refresh<S: ProgressSink + ?Sized>(store: &DataStore, progress: &mut S) -> Result<(), RefreshError> {
	let fetcher = Fetcher::new();
	info!("downloading case data");
	let raw_cases = fetcher.fetch_dataset(DatasetKind::Cases, progress)?;
	let case_data = repair_case_data(raw_cases);
	info!("downloading hospitalization data");
	let hospital_data = fetcher.fetch_dataset(DatasetKind::Hospitalizations, progress)?;
	let merged = merge_datasets(case_data, &hospital_data);
	let canonical = normalize(merged);
	info!("saving {} records to {}", canonical.len(), store.dir().display());
	store.save(&canonical)?;
	Ok(())
}


pub struct DataManager {
	store: DataStore,
	years: Vec<SmartString>,
	provinces: Vec<SmartString>,
}

impl DataManager {
	// The one initialization step with side effects: refreshes stale local
	// data, then reads the alltime dataset for the selection option lists.
	pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, RefreshError> {
		let store = DataStore::new(dir);
		if store.is_stale()? {
			if !have_connectivity() {
				return Err(RefreshError::Offline)
			}
			refresh(&store, &mut *default_output())?;
		}
		let alltime = store.load_year(ALLTIME_LABEL)?;
		Ok(Self{
			years: year_options(&alltime),
			provinces: province_options(&alltime),
			store,
		})
	}

	pub fn store(&self) -> &DataStore {
		&self.store
	}

	pub fn years(&self) -> &[SmartString] {
		&self.years
	}

	pub fn provinces(&self) -> &[SmartString] {
		&self.provinces
	}

	pub fn filter(&self, year: &str, province: &str) -> io::Result<Vec<CanonicalRecord>> {
		filter(&self.store, year, province)
	}
}
