use std::fs;
use std::io;
use std::io::{Read, Write};
use std::path::Path;


pub static UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];


pub fn strip_bom(raw: &[u8]) -> &[u8] {
	if raw.starts_with(&UTF8_BOM) {
		&raw[UTF8_BOM.len()..]
	} else {
		raw
	}
}

// Opens a text file, skipping a leading UTF-8 byte order mark if present.
pub fn open_sig<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let mut f = fs::File::open(path)?;
	let mut head = [0u8; 3];
	let mut nread = 0;
	while nread < head.len() {
		match f.read(&mut head[nread..])? {
			0 => break,
			n => nread += n,
		}
	}
	if head[..nread] == UTF8_BOM[..] {
		Ok(Box::new(f))
	} else {
		Ok(Box::new(io::Cursor::new(head[..nread].to_vec()).chain(f)))
	}
}

// Creates a file and stamps the byte order mark, so that spreadsheet tools
// pick up the encoding of the diacritics in municipality names.
pub fn create_sig<P: AsRef<Path>>(path: P) -> io::Result<fs::File> {
	let mut f = fs::File::create(path)?;
	f.write_all(&UTF8_BOM)?;
	Ok(f)
}
