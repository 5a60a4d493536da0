use covidnl::DataManager;


fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let argv: Vec<String> = std::env::args().collect();
	let dir = argv.get(1).map(|s| &s[..]).unwrap_or("Data");

	println!("checking local data ...");
	let manager = DataManager::open(dir)?;

	println!("years: {}", manager.years().join(", "));
	println!("provinces: {}", manager.provinces().join(", "));
	Ok(())
}
