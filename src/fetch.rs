use std::fmt;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use bytes::Bytes;

use log::debug;

use reqwest;

use serde::de::DeserializeOwned;

use super::ioutil::strip_bom;
use super::progress::{CountMeter, ProgressSink};
use super::rivm::{source_urls, DatasetKind};


// The original dashboard probes a public DNS server to tell "no network"
// apart from "source down".
static CONNECTIVITY_PROBE: ([u8; 4], u16) = ([8, 8, 8, 8], 53);
static CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(3);

pub fn have_connectivity() -> bool {
	let addr = SocketAddr::from(CONNECTIVITY_PROBE);
	TcpStream::connect_timeout(&addr, CONNECTIVITY_TIMEOUT).is_ok()
}


#[derive(Debug)]
pub enum Error {
	Request(reqwest::Error),
	Malformed(csv::Error),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Request(e) => fmt::Display::fmt(e, f),
			Self::Malformed(e) => write!(f, "malformed source data: {}", e),
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::Request(err)
	}
}

impl From<csv::Error> for Error {
	fn from(err: csv::Error) -> Self {
		Self::Malformed(err)
	}
}

impl std::error::Error for Error {}


pub struct Fetcher {
	client: reqwest::blocking::Client,
}

impl Fetcher {
	pub fn new() -> Self {
		Self{
			client: reqwest::blocking::Client::new(),
		}
	}

	fn get(&self, url: &str) -> Result<Bytes, Error> {
		debug!("fetching {}", url);
		let resp = self.client.get(url).send()?;
		let resp = resp.error_for_status()?;
		Ok(resp.bytes()?)
	}

	// Downloads every source file of a dataset and concatenates the rows in
	// URL order. Nothing is deduplicated; any failure aborts the refresh.
	pub fn fetch_dataset<T: DeserializeOwned, S: ProgressSink + ?Sized>(
			&self,
			kind: DatasetKind,
			progress: &mut S,
	) -> Result<Vec<T>, Error> {
		let mut rows = Vec::new();
		let mut pm = CountMeter::new(progress);
		let urls = source_urls();
		for url in urls[kind].iter() {
			let body = self.get(url)?;
			parse_rows(strip_bom(&body), &mut rows, &mut pm)?;
		}
		let n = rows.len();
		pm.finish(n);
		Ok(rows)
	}
}

pub fn parse_rows<T: DeserializeOwned, S: ProgressSink + ?Sized>(
		raw: &[u8],
		out: &mut Vec<T>,
		pm: &mut CountMeter<S>,
) -> Result<(), Error> {
	let mut r = csv::ReaderBuilder::new()
		.delimiter(b';')
		.from_reader(raw);
	for row in r.deserialize() {
		out.push(row?);
		if out.len() % 100000 == 0 {
			pm.update(out.len());
		}
	}
	Ok(())
}
