//! `photo_assets` repository.
//!
//! `(token, url)` is unique: re-running an extraction updates rows in place.
//! Rows are only deleted by `purge_token`.

use crate::error::Result;
use chrono::{DateTime, Utc};
use common::model::asset::{AssetCounts, AssetStatus, PhotoAsset};
use common::model::photo::{FilteredPhoto, PhotoKind};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "id, token, url, kind, width, height, hash, status, fetched_at, error_message";

fn conversion_error(column: usize, value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        format!("unexpected value '{}'", value).into(),
    )
}

fn row_to_asset(row: &Row<'_>) -> rusqlite::Result<PhotoAsset> {
    let kind: String = row.get(3)?;
    let status: String = row.get(7)?;
    Ok(PhotoAsset {
        id: row.get(0)?,
        token: row.get(1)?,
        url: row.get(2)?,
        kind: PhotoKind::parse(&kind).ok_or_else(|| conversion_error(3, kind.clone()))?,
        width: row.get(4)?,
        height: row.get(5)?,
        hash: row.get(6)?,
        status: AssetStatus::parse(&status).ok_or_else(|| conversion_error(7, status.clone()))?,
        fetched_at: row.get::<_, DateTime<Utc>>(8)?,
        error_message: row.get(9)?,
    })
}

fn known(dimension: u32) -> Option<u32> {
    (dimension > 0).then_some(dimension)
}

/// Registers classified photos as `pending`. Existing rows for the same
/// `(token, url)` are reset to `pending` and keep their id.
pub fn insert_pending(conn: &mut Connection, token: &str, photos: &[FilteredPhoto]) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO photo_assets (id, token, url, kind, width, height, hash, status, fetched_at, error_message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, 'pending', ?7, NULL)
             ON CONFLICT (token, url) DO UPDATE SET
                kind = excluded.kind,
                width = excluded.width,
                height = excluded.height,
                status = 'pending',
                fetched_at = excluded.fetched_at,
                error_message = NULL",
        )?;
        let now = Utc::now();
        for photo in photos {
            stmt.execute(params![
                Uuid::new_v4().to_string(),
                token,
                photo.url,
                photo.kind.as_str(),
                known(photo.width),
                known(photo.height),
                now,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn mark_available(conn: &Connection, token: &str, url: &str, hash: Option<&str>) -> Result<()> {
    conn.execute(
        "UPDATE photo_assets
         SET status = ?5, hash = ?3, fetched_at = ?4, error_message = NULL
         WHERE token = ?1 AND url = ?2",
        params![token, url, hash, Utc::now(), AssetStatus::Available.as_str()],
    )?;
    Ok(())
}

pub fn mark_failed(conn: &Connection, token: &str, url: &str, message: &str) -> Result<()> {
    conn.execute(
        "UPDATE photo_assets
         SET status = ?5, fetched_at = ?4, error_message = ?3
         WHERE token = ?1 AND url = ?2",
        params![token, url, message, Utc::now(), AssetStatus::Failed.as_str()],
    )?;
    Ok(())
}

/// Records that the tracking page itself could not be fetched or parsed.
/// The row is keyed by the page URL so repeated failures update one row.
pub fn record_page_failure(conn: &Connection, token: &str, page_url: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO photo_assets (id, token, url, kind, width, height, hash, status, fetched_at, error_message)
         VALUES (?1, ?2, ?3, 'photo', NULL, NULL, NULL, 'failed', ?4, ?5)
         ON CONFLICT (token, url) DO UPDATE SET
            status = 'failed',
            fetched_at = excluded.fetched_at,
            error_message = excluded.error_message",
        params![Uuid::new_v4().to_string(), token, page_url, Utc::now(), message],
    )?;
    Ok(())
}

pub fn list_assets(conn: &Connection, token: &str) -> Result<Vec<PhotoAsset>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM photo_assets WHERE token = ?1 ORDER BY rowid",
        SELECT_COLUMNS
    ))?;
    let assets = stmt
        .query_map(params![token], row_to_asset)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(assets)
}

/// Available photos and signatures. Photos sharing a hash count once.
pub fn count_available(conn: &Connection, token: &str) -> Result<AssetCounts> {
    let count = |kind: PhotoKind| -> Result<u32> {
        let n = conn.query_row(
            "SELECT COUNT(DISTINCT COALESCE(hash, url)) FROM photo_assets
             WHERE token = ?1 AND status = ?3 AND kind = ?2",
            params![token, kind.as_str(), AssetStatus::Available.as_str()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(n)
    };
    Ok(AssetCounts {
        photos: count(PhotoKind::Photo)?,
        signatures: count(PhotoKind::Signature)?,
    })
}

pub fn has_available(conn: &Connection, token: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM photo_assets WHERE token = ?1 AND status = ?2)",
        params![token, AssetStatus::Available.as_str()],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

/// Bulk purge of a consignment's assets. Returns the number of deleted rows.
pub fn purge_token(conn: &Connection, token: &str) -> Result<usize> {
    Ok(conn.execute("DELETE FROM photo_assets WHERE token = ?1", params![token])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn photo(url: &str, kind: PhotoKind, width: u32, height: u32) -> FilteredPhoto {
        FilteredPhoto {
            url: url.to_string(),
            kind,
            width,
            height,
            is_thumbnail: Some(false),
        }
    }

    #[test]
    fn pending_then_available() {
        let mut conn = open_memory_database().unwrap();
        insert_pending(
            &mut conn,
            "T1",
            &[
                photo("https://a/1.jpg", PhotoKind::Photo, 768, 1024),
                photo("https://a/s", PhotoKind::Signature, 600, 150),
            ],
        )
        .unwrap();

        let assets = list_assets(&conn, "T1").unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.status == AssetStatus::Pending));
        assert!(!has_available(&conn, "T1").unwrap());
        assert_eq!(count_available(&conn, "T1").unwrap(), AssetCounts::default());

        mark_available(&conn, "T1", "https://a/1.jpg", Some("h1")).unwrap();
        mark_available(&conn, "T1", "https://a/s", None).unwrap();

        assert!(has_available(&conn, "T1").unwrap());
        assert_eq!(
            count_available(&conn, "T1").unwrap(),
            AssetCounts { photos: 1, signatures: 1 }
        );
        let assets = list_assets(&conn, "T1").unwrap();
        assert_eq!(assets[0].url, "https://a/1.jpg");
        assert_eq!(assets[0].hash.as_deref(), Some("h1"));
        assert_eq!(assets[0].width, Some(768));
        assert_eq!(assets[1].hash, None);
    }

    #[test]
    fn reinsert_keeps_one_row_per_url() {
        let mut conn = open_memory_database().unwrap();
        let rows = [photo("https://a/1.jpg", PhotoKind::Photo, 768, 1024)];
        insert_pending(&mut conn, "T1", &rows).unwrap();
        let first_id = list_assets(&conn, "T1").unwrap()[0].id.clone();
        mark_available(&conn, "T1", "https://a/1.jpg", None).unwrap();

        insert_pending(&mut conn, "T1", &rows).unwrap();
        let assets = list_assets(&conn, "T1").unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, first_id);
        assert_eq!(assets[0].status, AssetStatus::Pending);
    }

    #[test]
    fn same_content_counts_once() {
        let mut conn = open_memory_database().unwrap();
        insert_pending(
            &mut conn,
            "T1",
            &[
                photo("https://a/1.jpg?sig=a", PhotoKind::Photo, 768, 1024),
                photo("https://a/1.jpg?sig=b", PhotoKind::Photo, 768, 1024),
                photo("https://a/2.jpg", PhotoKind::Photo, 768, 1024),
            ],
        )
        .unwrap();
        mark_available(&conn, "T1", "https://a/1.jpg?sig=a", Some("same")).unwrap();
        mark_available(&conn, "T1", "https://a/1.jpg?sig=b", Some("same")).unwrap();
        mark_available(&conn, "T1", "https://a/2.jpg", Some("other")).unwrap();
        assert_eq!(count_available(&conn, "T1").unwrap().photos, 2);
    }

    #[test]
    fn failures_are_recorded_and_not_counted() {
        let mut conn = open_memory_database().unwrap();
        insert_pending(&mut conn, "T1", &[photo("https://a/1.jpg", PhotoKind::Photo, 0, 0)]).unwrap();
        mark_failed(&conn, "T1", "https://a/1.jpg", "404").unwrap();
        record_page_failure(&conn, "T1", "https://tracking/T1", "timeout").unwrap();
        record_page_failure(&conn, "T1", "https://tracking/T1", "timeout again").unwrap();

        let assets = list_assets(&conn, "T1").unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].width, None);
        assert_eq!(assets[0].error_message.as_deref(), Some("404"));
        assert_eq!(assets[1].error_message.as_deref(), Some("timeout again"));
        assert!(assets.iter().all(|a| a.status == AssetStatus::Failed));
        assert_eq!(count_available(&conn, "T1").unwrap().photos, 0);
    }

    #[test]
    fn purge_only_touches_one_token() {
        let mut conn = open_memory_database().unwrap();
        let rows = [photo("https://a/1.jpg", PhotoKind::Photo, 768, 1024)];
        insert_pending(&mut conn, "T1", &rows).unwrap();
        insert_pending(&mut conn, "T2", &rows).unwrap();
        assert_eq!(purge_token(&conn, "T1").unwrap(), 1);
        assert!(list_assets(&conn, "T1").unwrap().is_empty());
        assert_eq!(list_assets(&conn, "T2").unwrap().len(), 1);
    }
}
