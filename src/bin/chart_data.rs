use std::io;

use covidnl::{chart_table, ChartMode, ChartRequest, DataManager, DateFormat, Metric, SortOrder};


fn parse_metrics(s: &str) -> Result<Vec<Metric>, Box<dyn std::error::Error>> {
	if s == "-" {
		return Ok(Vec::new())
	}
	let mut metrics = Vec::new();
	for part in s.split(',') {
		metrics.push(part.parse::<Metric>()?);
	}
	Ok(metrics)
}

fn parse_bar_mode(argv: &[String]) -> Result<ChartMode, Box<dyn std::error::Error>> {
	let (municipality, month) = match argv.get(6).map(|s| &s[..]) {
		Some("municipality") => (true, false),
		Some("month") => (false, true),
		Some("-") | None => (false, false),
		Some(other) => return Err(format!("unknown grouping: {}", other).into()),
	};
	let sort = match argv.get(7).map(|s| &s[..]) {
		Some("-") | None => None,
		Some(spec) => {
			let (metric, order) = match spec.split_once(':') {
				Some(v) => v,
				None => return Err(format!("invalid sort spec: {}", spec).into()),
			};
			Some((metric.parse::<Metric>()?, order.parse::<SortOrder>()?))
		},
	};
	Ok(ChartMode::Bar{municipality, month, sort})
}

fn parse_line_mode(argv: &[String]) -> Result<ChartMode, Box<dyn std::error::Error>> {
	let date_format = match argv.get(6) {
		Some(s) => s.parse::<DateFormat>()?,
		None => DateFormat::DateOfStatistics,
	};
	Ok(ChartMode::Line{date_format})
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let argv: Vec<String> = std::env::args().collect();
	if argv.len() < 6 {
		eprintln!("usage: {} <datadir> bar <year> <province> <metrics> [municipality|month|-] [<metric>:asc|desc]", argv[0]);
		eprintln!("       {} <datadir> line <year> <province> <metrics> [<date format>]", argv[0]);
		std::process::exit(2);
	}

	let metrics = parse_metrics(&argv[5])?;
	let mode = match &argv[2][..] {
		"bar" => parse_bar_mode(&argv)?,
		"line" => parse_line_mode(&argv)?,
		other => return Err(format!("unknown chart kind: {}", other).into()),
	};
	let req = ChartRequest{
		year: argv[3].clone(),
		province: argv[4].clone(),
		metrics,
		mode,
	};

	let manager = DataManager::open(&argv[1])?;
	if let Some(table) = chart_table(manager.store(), &req)? {
		table.write_csv(io::stdout().lock())?;
	}
	Ok(())
}
