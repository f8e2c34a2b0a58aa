//! Create an entity table, insert records, and read them back.
//!
//! Run with: `cargo run -p entity-schema-demos --example person_table`

use entity_schema_core::{Entity, IndividualBio, RawRecord};
use entity_schema_sqlite::Connection;

fn raw(value: serde_json::Value) -> RawRecord {
    value.as_object().expect("record literal").clone()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = Connection::open_in_memory()?;

    let tbl = conn.create_table::<IndividualBio>()?;
    println!("created table: {}", tbl.name());
    for index in tbl.index_names()? {
        println!("  index: {index}");
    }
    if let Some(fts) = tbl.fts_table()? {
        println!("  fts shadow table: {fts}");
    }

    let people = [
        raw(serde_json::json!({
            "first_name": "Juan",
            "last_name": "Doe",
            "suffix": "Jr.",
            "gender": "male",
        })),
        raw(serde_json::json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "gender": "FEMALE",
            "nick_name": "Jany",
        })),
    ];
    let tbl = conn.add_records::<IndividualBio>(&people)?;

    println!("\nrows ({}):", tbl.count()?);
    for row in tbl.rows()? {
        println!(
            "  #{:?} {:?} gender={:?}",
            row.get("id"),
            row.get("full_name"),
            row.get("gender"),
        );
    }

    println!("\nsearch 'Juan':");
    for hit in tbl.search("Juan")? {
        println!("  {:?}", hit.get("full_name"));
    }

    // The definition itself stays inspectable
    let def = IndividualBio::definition();
    println!("\ndeclared columns: {:?}", def.columns());

    Ok(())
}
