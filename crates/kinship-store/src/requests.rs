//! Relationship requests and the `RequestRepository` implementation

use crate::graph::write_pair;
use crate::{conversion_error, from_sql_id, to_sql_id, SqliteStore, StoreError};
use kinship_domain::traits::RequestRepository;
use kinship_domain::{
    EdgePair, KinshipError, PersonId, RelationshipEdge, RelationshipRequest, RequestId,
    RequestStatus, Result,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const REQUEST_COLUMNS: &str =
    "id, requester_id, target_id, proposed_type_code, message, status, created_at, responded_at";

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<RelationshipRequest> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = RequestId::from_bytes(&id_bytes)
        .map_err(|e| conversion_error(0, rusqlite::types::Type::Blob, e))?;
    let status: String = row.get(5)?;
    let status = RequestStatus::parse(&status).ok_or_else(|| {
        conversion_error(5, rusqlite::types::Type::Text, format!("Unknown request status: {}", status))
    })?;
    let responded_at: Option<i64> = row.get(7)?;

    Ok(RelationshipRequest {
        id,
        requester_id: from_sql_id(row.get(1)?),
        target_id: from_sql_id(row.get(2)?),
        proposed_type_code: row.get(3)?,
        message: row.get(4)?,
        status,
        created_at: row.get::<_, i64>(6)? as u64,
        responded_at: responded_at.map(|t| t as u64),
    })
}

fn find_request(
    conn: &Connection,
    id: RequestId,
) -> std::result::Result<Option<RelationshipRequest>, StoreError> {
    let sql = format!("SELECT {} FROM relationship_requests WHERE id = ?1", REQUEST_COLUMNS);
    let request = conn
        .query_row(&sql, params![&id.to_bytes()[..]], request_from_row)
        .optional()?;
    Ok(request)
}

/// Load a request that must still be pending
fn require_pending(
    conn: &Connection,
    id: RequestId,
) -> std::result::Result<RelationshipRequest, StoreError> {
    let request = find_request(conn, id)?
        .ok_or_else(|| KinshipError::NotFound(format!("request {}", id)))?;
    if !request.is_pending() {
        return Err(KinshipError::AlreadyResolved(format!(
            "request {} is already {}",
            id,
            request.status.as_str()
        ))
        .into());
    }
    Ok(request)
}

fn resolve(
    conn: &Connection,
    id: RequestId,
    status: RequestStatus,
    at: u64,
) -> std::result::Result<(), StoreError> {
    conn.execute(
        "UPDATE relationship_requests SET status = ?1, responded_at = ?2
         WHERE id = ?3 AND status = 'pending'",
        params![status.as_str(), at as i64, &id.to_bytes()[..]],
    )?;
    Ok(())
}

impl RequestRepository for SqliteStore {
    fn insert_request(&self, request: &RelationshipRequest) -> Result<()> {
        let conn = self.lock()?;
        if let Some(existing) =
            pending_between(&conn, request.requester_id, request.target_id)?
        {
            return Err(KinshipError::Duplicate(format!(
                "pending request {} already exists from {} to {}",
                existing.id, request.requester_id, request.target_id
            )));
        }

        conn.execute(
            "INSERT INTO relationship_requests
             (id, requester_id, target_id, proposed_type_code, message, status, created_at, responded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &request.id.to_bytes()[..],
                to_sql_id(request.requester_id),
                to_sql_id(request.target_id),
                &request.proposed_type_code,
                &request.message,
                request.status.as_str(),
                request.created_at as i64,
                request.responded_at.map(|t| t as i64),
            ],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    fn get_request(&self, id: RequestId) -> Result<Option<RelationshipRequest>> {
        let conn = self.lock()?;
        Ok(find_request(&conn, id)?)
    }

    fn pending_request_between(
        &self,
        requester: PersonId,
        target: PersonId,
    ) -> Result<Option<RelationshipRequest>> {
        let conn = self.lock()?;
        Ok(pending_between(&conn, requester, target)?)
    }

    fn pending_requests_for(&self, target: PersonId) -> Result<Vec<RelationshipRequest>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM relationship_requests
             WHERE target_id = ?1 AND status = 'pending'
             ORDER BY created_at, id",
            REQUEST_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(StoreError::from)?;
        let requests = stmt
            .query_map(params![to_sql_id(target)], request_from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(StoreError::from)?;
        Ok(requests)
    }

    fn accept_request(&self, id: RequestId, pair: &EdgePair, at: u64) -> Result<RelationshipEdge> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        require_pending(&tx, id)?;
        let edge = write_pair(&tx, pair, at)?;
        resolve(&tx, id, RequestStatus::Accepted, at)?;
        tx.commit().map_err(StoreError::from)?;

        debug!(request = %id, "Request accepted");
        Ok(edge)
    }

    fn reject_request(&self, id: RequestId, at: u64) -> Result<RelationshipRequest> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        let mut request = require_pending(&tx, id)?;
        resolve(&tx, id, RequestStatus::Rejected, at)?;
        tx.commit().map_err(StoreError::from)?;

        request.status = RequestStatus::Rejected;
        request.responded_at = Some(at);
        debug!(request = %id, "Request rejected");
        Ok(request)
    }
}

fn pending_between(
    conn: &Connection,
    requester: PersonId,
    target: PersonId,
) -> std::result::Result<Option<RelationshipRequest>, StoreError> {
    let sql = format!(
        "SELECT {} FROM relationship_requests
         WHERE requester_id = ?1 AND target_id = ?2 AND status = 'pending'",
        REQUEST_COLUMNS
    );
    let request = conn
        .query_row(&sql, params![to_sql_id(requester), to_sql_id(target)], request_from_row)
        .optional()?;
    Ok(request)
}
