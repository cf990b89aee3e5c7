//! Suggestions and the `SuggestionRepository` implementation

use crate::graph::accepted_between;
use crate::{conversion_error, from_sql_id, to_sql_id, SqliteStore, StoreError};
use kinship_domain::traits::SuggestionRepository;
use kinship_domain::{KinshipError, PersonId, Result, Suggestion, SuggestionId, SuggestionStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use tracing::debug;

const SUGGESTION_COLUMNS: &str = "id, subject_person_id, suggested_person_id, suggested_type_code, \
                                  reason, confidence_score, status, created_at, resolved_at";

fn suggestion_from_row(row: &Row<'_>) -> rusqlite::Result<Suggestion> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = SuggestionId::from_bytes(&id_bytes)
        .map_err(|e| conversion_error(0, rusqlite::types::Type::Blob, e))?;
    let confidence: i64 = row.get(5)?;
    let confidence_score = u8::try_from(confidence).map_err(|_| {
        conversion_error(5, rusqlite::types::Type::Integer, format!("Confidence out of range: {}", confidence))
    })?;
    let status: String = row.get(6)?;
    let status = SuggestionStatus::parse(&status).ok_or_else(|| {
        conversion_error(6, rusqlite::types::Type::Text, format!("Unknown suggestion status: {}", status))
    })?;
    let resolved_at: Option<i64> = row.get(8)?;

    Ok(Suggestion {
        id,
        subject_person_id: from_sql_id(row.get(1)?),
        suggested_person_id: from_sql_id(row.get(2)?),
        suggested_type_code: row.get(3)?,
        reason: row.get(4)?,
        confidence_score,
        status,
        created_at: row.get::<_, i64>(7)? as u64,
        resolved_at: resolved_at.map(|t| t as u64),
    })
}

fn find_suggestion(
    conn: &Connection,
    id: SuggestionId,
) -> std::result::Result<Option<Suggestion>, StoreError> {
    let sql = format!("SELECT {} FROM suggestions WHERE id = ?1", SUGGESTION_COLUMNS);
    let suggestion = conn
        .query_row(&sql, params![&id.to_bytes()[..]], suggestion_from_row)
        .optional()?;
    Ok(suggestion)
}

fn pending_for(
    conn: &Connection,
    subject: PersonId,
) -> std::result::Result<Vec<Suggestion>, StoreError> {
    let sql = format!(
        "SELECT {} FROM suggestions
         WHERE subject_person_id = ?1 AND status = 'pending'
         ORDER BY confidence_score DESC, suggested_person_id ASC, id ASC",
        SUGGESTION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let suggestions = stmt
        .query_map(params![to_sql_id(subject)], suggestion_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(suggestions)
}

/// Whether the subject dismissed a suggestion for this person at or after `cutoff`
fn dismissed_since(
    conn: &Connection,
    subject: PersonId,
    suggested: PersonId,
    cutoff: u64,
) -> std::result::Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM suggestions
             WHERE subject_person_id = ?1 AND suggested_person_id = ?2
               AND status = 'dismissed' AND resolved_at >= ?3
             LIMIT 1",
            params![to_sql_id(subject), to_sql_id(suggested), cutoff as i64],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(found)
}

fn same_content(stored: &Suggestion, fresh: &Suggestion) -> bool {
    stored.suggested_person_id == fresh.suggested_person_id
        && stored.suggested_type_code == fresh.suggested_type_code
        && stored.confidence_score == fresh.confidence_score
        && stored.reason == fresh.reason
}

fn insert_suggestion(conn: &Connection, s: &Suggestion) -> std::result::Result<(), StoreError> {
    conn.execute(
        "INSERT INTO suggestions
         (id, subject_person_id, suggested_person_id, suggested_type_code, reason,
          confidence_score, status, created_at, resolved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &s.id.to_bytes()[..],
            to_sql_id(s.subject_person_id),
            to_sql_id(s.suggested_person_id),
            &s.suggested_type_code,
            &s.reason,
            s.confidence_score as i64,
            s.status.as_str(),
            s.created_at as i64,
            s.resolved_at.map(|t| t as i64),
        ],
    )?;
    Ok(())
}

impl SuggestionRepository for SqliteStore {
    fn replace_pending(
        &self,
        subject: PersonId,
        fresh: Vec<Suggestion>,
        dismissal_cutoff: u64,
    ) -> Result<Vec<Suggestion>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        // One suggestion per suggested person; the caller's order decides
        let mut seen = HashSet::new();
        let mut wanted = Vec::with_capacity(fresh.len());
        for suggestion in fresh {
            let other = suggestion.suggested_person_id;
            if other == subject || !seen.insert(other) {
                continue;
            }
            if accepted_between(&tx, subject, other)? {
                continue;
            }
            if dismissed_since(&tx, subject, other, dismissal_cutoff)? {
                debug!(%subject, suggested = %other, "Skipping recently dismissed suggestion");
                continue;
            }
            wanted.push(suggestion);
        }

        let mut kept = 0usize;
        let mut removed = 0usize;
        for stored in pending_for(&tx, subject)? {
            if let Some(pos) = wanted.iter().position(|w| same_content(&stored, w)) {
                wanted.remove(pos);
                kept += 1;
            } else {
                tx.execute(
                    "DELETE FROM suggestions WHERE id = ?1",
                    params![&stored.id.to_bytes()[..]],
                )
                .map_err(StoreError::from)?;
                removed += 1;
            }
        }

        for suggestion in &wanted {
            insert_suggestion(&tx, suggestion)?;
        }

        let result = pending_for(&tx, subject)?;
        tx.commit().map_err(StoreError::from)?;

        debug!(
            %subject,
            kept,
            removed,
            inserted = wanted.len(),
            "Pending suggestions replaced"
        );
        Ok(result)
    }

    fn get_suggestion(&self, id: SuggestionId) -> Result<Option<Suggestion>> {
        let conn = self.lock()?;
        Ok(find_suggestion(&conn, id)?)
    }

    fn pending_suggestions(&self, subject: PersonId) -> Result<Vec<Suggestion>> {
        let conn = self.lock()?;
        Ok(pending_for(&conn, subject)?)
    }

    fn transition_suggestion(
        &self,
        id: SuggestionId,
        from: SuggestionStatus,
        to: SuggestionStatus,
        resolved_at: Option<u64>,
    ) -> Result<Suggestion> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE suggestions SET status = ?1, resolved_at = ?2
                 WHERE id = ?3 AND status = ?4",
                params![
                    to.as_str(),
                    resolved_at.map(|t| t as i64),
                    &id.to_bytes()[..],
                    from.as_str()
                ],
            )
            .map_err(StoreError::from)?;

        let current = find_suggestion(&conn, id)?
            .ok_or_else(|| KinshipError::NotFound(format!("suggestion {}", id)))?;
        if changed == 0 {
            return Err(KinshipError::AlreadyResolved(format!(
                "suggestion {} is {}, expected {}",
                id,
                current.status.as_str(),
                from.as_str()
            )));
        }
        Ok(current)
    }

    fn release_suggestion(&self, id: SuggestionId) -> Result<Suggestion> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        let claimed = find_suggestion(&tx, id)?
            .ok_or_else(|| KinshipError::NotFound(format!("suggestion {}", id)))?;
        if claimed.status != SuggestionStatus::Accepted {
            return Err(KinshipError::AlreadyResolved(format!(
                "suggestion {} is {}, expected accepted",
                id,
                claimed.status.as_str()
            )));
        }

        let superseded = tx
            .execute(
                "DELETE FROM suggestions
                 WHERE subject_person_id = ?1 AND suggested_person_id = ?2
                   AND status = 'pending' AND id != ?3",
                params![
                    to_sql_id(claimed.subject_person_id),
                    to_sql_id(claimed.suggested_person_id),
                    &id.to_bytes()[..]
                ],
            )
            .map_err(StoreError::from)?;
        tx.execute(
            "UPDATE suggestions SET status = 'pending', resolved_at = NULL WHERE id = ?1",
            params![&id.to_bytes()[..]],
        )
        .map_err(StoreError::from)?;

        let released = find_suggestion(&tx, id)?
            .ok_or_else(|| KinshipError::NotFound(format!("suggestion {}", id)))?;
        tx.commit().map_err(StoreError::from)?;

        debug!(suggestion = %id, superseded, "Suggestion released");
        Ok(released)
    }
}
