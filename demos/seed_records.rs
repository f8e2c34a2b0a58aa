//! Seed an entity table from a directory of JSON record files.
//!
//! Run with: `cargo run -p entity-schema-demos --example seed_records`

use entity_schema_core::IndividualBio;
use entity_schema_records::RecordSet;
use entity_schema_sqlite::Connection;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("entity_schema_seed_demo");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(
        dir.join("01_juan.json"),
        r#"{ "first_name": "Juan", "last_name": "Doe", "suffix": "Jr.", "gender": "male" }"#,
    )?;
    std::fs::write(
        dir.join("02_jane.json"),
        r#"[{ "first_name": "Jane", "last_name": "Doe", "gender": "FEMALE" }]"#,
    )?;

    // Inspect the raw records first
    let set = RecordSet::from_dir(&dir)?;
    println!("loaded {} raw records from {:?}", set.len(), set.source());

    // Then run them through validation and insertion
    let conn = Connection::open_in_memory()?;
    let report = conn.seed::<IndividualBio>(&dir)?;
    println!("inserted {} records", report.records_inserted);

    for row in conn.entity_table::<IndividualBio>().rows()? {
        println!("  #{:?} {:?}", row.get("id"), row.get("full_name"));
    }

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}
