use std::io;

use log::debug;

use super::query::{
	aggregate, aggregate_by_date, filter, select_dimension, sort,
	AggregatedTable, DateFormat, Dimension, GroupLabel, Metric, SortOrder,
};
use super::store::DataStore;


pub fn month_name(month: u32) -> &'static str {
	match month {
		1 => "January",
		2 => "February",
		3 => "March",
		4 => "April",
		5 => "May",
		6 => "June",
		7 => "July",
		8 => "August",
		9 => "September",
		10 => "October",
		11 => "November",
		12 => "December",
		_ => "Invalid Month",
	}
}

fn name_months(table: &mut AggregatedTable) {
	for row in table.rows.iter_mut() {
		if let GroupLabel::Month(m) = row.label {
			row.label = GroupLabel::Text(month_name(m).into());
		}
	}
}


// Bar and line charts share the filter/aggregate steps and differ only in
// the inputs carried here.
#[derive(Debug, Clone)]
pub enum ChartMode {
	Bar{
		municipality: bool,
		month: bool,
		sort: Option<(Metric, SortOrder)>,
	},
	Line{
		date_format: DateFormat,
	},
}

#[derive(Debug, Clone)]
pub struct ChartRequest {
	pub year: String,
	pub province: String,
	pub metrics: Vec<Metric>,
	pub mode: ChartMode,
}

// Produces the table a renderer plots directly: one x column, one numeric
// column per metric. No metrics selected means nothing to render.
pub fn chart_table(store: &DataStore, req: &ChartRequest) -> io::Result<Option<AggregatedTable>> {
	if req.metrics.is_empty() {
		debug!("no metrics selected, nothing to chart");
		return Ok(None)
	}
	let records = filter(store, &req.year, &req.province)?;
	let table = match &req.mode {
		ChartMode::Bar{municipality, month, sort: sort_req} => {
			let dimension = select_dimension(&req.province, *municipality, *month);
			let mut table = aggregate(&records, &req.metrics, dimension);
			if let Some((by, order)) = sort_req {
				// sorting by an unselected metric is ignored
				if req.metrics.contains(by) {
					sort(&mut table, *by, *order);
				}
			}
			if dimension == Dimension::MonthOfStatistics {
				name_months(&mut table);
			}
			table
		},
		ChartMode::Line{date_format} => {
			// line charts plot a single series; first selected metric in
			// fixed precedence order wins
			let metric = match Metric::ALL.iter().find(|m| req.metrics.contains(*m)) {
				Some(metric) => *metric,
				None => return Ok(None),
			};
			aggregate_by_date(&records, &[metric], *date_format)
		},
	};
	Ok(Some(table))
}
