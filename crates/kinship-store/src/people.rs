//! Person records and the `PersonDirectory` implementation

use crate::{from_sql_id, to_sql_id, SqliteStore, StoreError};
use kinship_domain::traits::PersonDirectory;
use kinship_domain::{Gender, Person, PersonId, Result};
use rusqlite::{params, OptionalExtension, Row};

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    let gender: String = row.get(2)?;
    Ok(Person {
        id: from_sql_id(row.get(0)?),
        display_name: row.get(1)?,
        gender: Gender::parse(&gender),
    })
}

impl SqliteStore {
    /// Insert or update a person record
    ///
    /// People are owned by user management; this is the trusted seeding path.
    pub fn upsert_person(&self, person: &Person) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO people (id, display_name, gender) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
             display_name = excluded.display_name, gender = excluded.gender",
            params![to_sql_id(person.id), &person.display_name, person.gender.as_str()],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    /// All people, ordered by id
    pub fn list_people(&self) -> Result<Vec<Person>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, display_name, gender FROM people ORDER BY id")
            .map_err(StoreError::from)?;
        let people = stmt
            .query_map([], person_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(StoreError::from)?;
        Ok(people)
    }
}

impl PersonDirectory for SqliteStore {
    fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
        let conn = self.lock()?;
        let person = conn
            .query_row(
                "SELECT id, display_name, gender FROM people WHERE id = ?1",
                params![to_sql_id(id)],
                person_from_row,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(person)
    }

    fn person_ids(&self) -> Result<Vec<PersonId>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id FROM people ORDER BY id")
            .map_err(StoreError::from)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0).map(from_sql_id))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(StoreError::from)?;
        Ok(ids)
    }
}
