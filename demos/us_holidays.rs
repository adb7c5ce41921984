///! List the holidays of a US jurisdiction for a year, e.g.
///! `RUST_LOG=debug cargo run --example us_holidays US-AK 2017`
///! If a JSON file is given as third argument, its jurisdictions are added to the bundled ones.
use std::fs;

use holicalc::{usa, CalendarsBuilder};

fn main() {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let code = args.get(1).map(|s| s.as_str()).unwrap_or(usa::FEDERAL);
    let year: i32 = args
        .get(2)
        .map(|s| s.parse().expect("year must be an integer"))
        .unwrap_or(2017);

    let mut builder = CalendarsBuilder::new();
    usa::register(&mut builder).unwrap();
    if let Some(path) = args.get(3) {
        let json = fs::read_to_string(path).unwrap();
        builder.load_json(&json).unwrap();
    }
    let calendars = builder.build();

    match calendars.resolve_year(code, year) {
        Ok(holidays) => {
            println!("Holidays of {} in {}:", code, year);
            for (date, label) in holidays.iter() {
                println!("{} {:<9} {}", date, date.format("%A"), label);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            eprintln!(
                "known jurisdictions: {}",
                calendars.codes().collect::<Vec<_>>().join(", ")
            );
        }
    }
}
