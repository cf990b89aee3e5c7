//! Relationship edges and the `RelationshipGraphStore` implementation

use crate::{conversion_error, from_sql_id, to_sql_id, SqliteStore, StoreError};
use kinship_domain::traits::RelationshipGraphStore;
use kinship_domain::{
    current_timestamp, EdgePair, EdgeStatus, KinshipError, PersonId, RelationshipEdge,
    RelationshipTypeCatalog, Result,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const EDGE_COLUMNS: &str = "id, from_person_id, to_person_id, type_code, status, created_at, \
                            accepted_at, created_automatically";

fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<RelationshipEdge> {
    let status: String = row.get(4)?;
    let status = EdgeStatus::parse(&status).ok_or_else(|| {
        conversion_error(4, rusqlite::types::Type::Text, format!("Unknown edge status: {}", status))
    })?;
    let accepted_at: Option<i64> = row.get(6)?;

    Ok(RelationshipEdge {
        id: row.get(0)?,
        from_person_id: from_sql_id(row.get(1)?),
        to_person_id: from_sql_id(row.get(2)?),
        type_code: row.get(3)?,
        status,
        created_at: row.get::<_, i64>(5)? as u64,
        accepted_at: accepted_at.map(|t| t as u64),
        created_automatically: row.get(7)?,
    })
}

/// The edge row for the ordered pair, whatever its status
fn find_edge(
    conn: &Connection,
    from: PersonId,
    to: PersonId,
) -> std::result::Result<Option<RelationshipEdge>, StoreError> {
    let sql = format!(
        "SELECT {} FROM relationship_edges WHERE from_person_id = ?1 AND to_person_id = ?2",
        EDGE_COLUMNS
    );
    let edge = conn
        .query_row(&sql, params![to_sql_id(from), to_sql_id(to)], edge_from_row)
        .optional()?;
    Ok(edge)
}

/// Whether an accepted edge exists between two people in either direction
pub(crate) fn accepted_between(
    conn: &Connection,
    a: PersonId,
    b: PersonId,
) -> std::result::Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM relationship_edges
             WHERE status = 'accepted'
               AND ((from_person_id = ?1 AND to_person_id = ?2)
                 OR (from_person_id = ?2 AND to_person_id = ?1))
             LIMIT 1",
            params![to_sql_id(a), to_sql_id(b)],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(found)
}

fn check_conflict(
    existing: Option<&RelationshipEdge>,
    from: PersonId,
    to: PersonId,
    attempted: &str,
) -> std::result::Result<(), StoreError> {
    match existing {
        Some(edge) if edge.is_accepted() && edge.type_code != attempted => {
            Err(KinshipError::Conflict {
                from,
                to,
                existing: edge.type_code.clone(),
                attempted: attempted.to_string(),
            }
            .into())
        }
        _ => Ok(()),
    }
}

fn upsert_edge(
    conn: &Connection,
    existing: Option<RelationshipEdge>,
    from: PersonId,
    to: PersonId,
    code: &str,
    automatic: bool,
    now: u64,
) -> std::result::Result<RelationshipEdge, StoreError> {
    match existing {
        // Conflicts were rejected already, so an accepted row carries `code`
        Some(edge) if edge.is_accepted() => Ok(edge),
        Some(edge) => {
            conn.execute(
                "UPDATE relationship_edges
                 SET type_code = ?1, status = 'accepted', accepted_at = ?2, created_automatically = ?3
                 WHERE id = ?4",
                params![code, now as i64, automatic, edge.id],
            )?;
            Ok(RelationshipEdge {
                type_code: code.to_string(),
                status: EdgeStatus::Accepted,
                accepted_at: Some(now),
                created_automatically: automatic,
                ..edge
            })
        }
        None => {
            conn.execute(
                "INSERT INTO relationship_edges
                 (from_person_id, to_person_id, type_code, status, created_at, accepted_at, created_automatically)
                 VALUES (?1, ?2, ?3, 'accepted', ?4, ?4, ?5)",
                params![to_sql_id(from), to_sql_id(to), code, now as i64, automatic],
            )?;
            Ok(RelationshipEdge {
                id: conn.last_insert_rowid(),
                from_person_id: from,
                to_person_id: to,
                type_code: code.to_string(),
                status: EdgeStatus::Accepted,
                created_at: now,
                accepted_at: Some(now),
                created_automatically: automatic,
            })
        }
    }
}

/// Validate and write both directions of a pair on an open transaction
///
/// Returns the `a -> b` edge. Nothing is written if any check fails.
pub(crate) fn write_pair(
    conn: &Connection,
    pair: &EdgePair,
    now: u64,
) -> std::result::Result<RelationshipEdge, StoreError> {
    let catalog = RelationshipTypeCatalog::standard();
    let forward = catalog
        .get(&pair.code_a_to_b)
        .ok_or_else(|| KinshipError::NotFound(format!("relationship type '{}'", pair.code_a_to_b)))?
        .code;
    let backward = catalog
        .get(&pair.code_b_to_a)
        .ok_or_else(|| KinshipError::NotFound(format!("relationship type '{}'", pair.code_b_to_a)))?
        .code;

    if pair.a == pair.b {
        return Err(KinshipError::InvalidInput(format!(
            "person {} cannot be related to themselves",
            pair.a
        ))
        .into());
    }
    if !catalog.are_inverses(forward, backward) {
        return Err(KinshipError::InvalidType(format!(
            "'{}' and '{}' are not inverse relationship types",
            forward, backward
        ))
        .into());
    }

    let existing_forward = find_edge(conn, pair.a, pair.b)?;
    let existing_backward = find_edge(conn, pair.b, pair.a)?;
    check_conflict(existing_forward.as_ref(), pair.a, pair.b, forward)?;
    check_conflict(existing_backward.as_ref(), pair.b, pair.a, backward)?;

    let edge = upsert_edge(conn, existing_forward, pair.a, pair.b, forward, pair.automatic, now)?;
    upsert_edge(conn, existing_backward, pair.b, pair.a, backward, pair.automatic, now)?;

    debug!(a = %pair.a, b = %pair.b, forward, backward, "Edge pair written");
    Ok(edge)
}

impl RelationshipGraphStore for SqliteStore {
    fn edges_of(&self, person: PersonId, status: Option<EdgeStatus>) -> Result<Vec<RelationshipEdge>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM relationship_edges
             WHERE (from_person_id = ?1 OR to_person_id = ?1)
               AND (?2 IS NULL OR status = ?2)
             ORDER BY created_at, id",
            EDGE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(StoreError::from)?;
        let edges = stmt
            .query_map(
                params![to_sql_id(person), status.map(|s| s.as_str())],
                edge_from_row,
            )
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(StoreError::from)?;
        Ok(edges)
    }

    fn edge_between(&self, a: PersonId, b: PersonId) -> Result<Option<RelationshipEdge>> {
        let conn = self.lock()?;
        let edge = find_edge(&conn, a, b)?.filter(RelationshipEdge::is_accepted);
        Ok(edge)
    }

    fn put_pair(&self, pair: &EdgePair) -> Result<RelationshipEdge> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        let edge = write_pair(&tx, pair, current_timestamp())?;
        tx.commit().map_err(StoreError::from)?;
        Ok(edge)
    }

    fn revoke_pair(&self, a: PersonId, b: PersonId) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        let changed = tx
            .execute(
                "UPDATE relationship_edges SET status = 'rejected'
                 WHERE status = 'accepted'
                   AND ((from_person_id = ?1 AND to_person_id = ?2)
                     OR (from_person_id = ?2 AND to_person_id = ?1))",
                params![to_sql_id(a), to_sql_id(b)],
            )
            .map_err(StoreError::from)?;
        if changed == 0 {
            return Err(KinshipError::NotFound(format!(
                "accepted relationship between {} and {}",
                a, b
            )));
        }
        tx.commit().map_err(StoreError::from)?;
        debug!(%a, %b, "Edge pair revoked");
        Ok(())
    }
}
