use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::info;

use super::dataset::CanonicalRecord;
use super::ioutil::{create_sig, open_sig};


pub static ALLTIME_LABEL: &'static str = "Alltime";

// Weekly source cadence; anything older gets re-downloaded.
static MAX_DATA_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);


pub struct DataStore {
	dir: PathBuf,
}

impl DataStore {
	pub fn new<P: AsRef<Path>>(dir: P) -> Self {
		Self{
			dir: dir.as_ref().to_path_buf(),
		}
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	// Year labels are matched case-insensitively, "Alltime" included.
	pub fn year_path(&self, year: &str) -> PathBuf {
		self.dir.join(format!("covid_{}.csv", year.to_lowercase()))
	}

	pub fn is_stale(&self) -> io::Result<bool> {
		let md = match fs::metadata(self.year_path(ALLTIME_LABEL)) {
			Ok(md) => md,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
			Err(e) => return Err(e),
		};
		let age = SystemTime::now()
			.duration_since(md.modified()?)
			.unwrap_or_default();
		Ok(age > MAX_DATA_AGE)
	}

	// Full overwrite of one file per year plus the alltime file. There is no
	// partial-write recovery; an interrupted save leaves that file corrupt
	// until the next refresh.
	pub fn save(&self, records: &[CanonicalRecord]) -> io::Result<()> {
		fs::create_dir_all(&self.dir)?;
		let mut years: BTreeMap<i32, Vec<&CanonicalRecord>> = BTreeMap::new();
		for rec in records {
			years.entry(rec.year).or_insert_with(Vec::new).push(rec);
		}
		for (year, rows) in years {
			self.write_file(&year.to_string(), rows.into_iter())?;
		}
		self.write_file(ALLTIME_LABEL, records.iter())?;
		Ok(())
	}

	fn write_file<'x, I: Iterator<Item = &'x CanonicalRecord>>(&self, year: &str, rows: I) -> io::Result<()> {
		let path = self.year_path(year);
		info!("writing {}", path.display());
		let mut w = csv::Writer::from_writer(create_sig(&path)?);
		for rec in rows {
			w.serialize(rec)?;
		}
		w.flush()?;
		Ok(())
	}

	pub fn load_year(&self, year: &str) -> io::Result<Vec<CanonicalRecord>> {
		let mut r = csv::Reader::from_reader(open_sig(self.year_path(year))?);
		let mut rows = Vec::new();
		for row in r.deserialize() {
			rows.push(row?);
		}
		Ok(rows)
	}
}
