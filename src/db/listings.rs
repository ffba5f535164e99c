use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::scraper::RawListing;
use rusqlite::{params, Connection};

const SQL_INSERT_LISTING: &str = r#"
    INSERT INTO annonces (title, price, property_type, location, publication_date, link)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT DO NOTHING
"#;

/// Insert every listing in one transaction. Rows already in the table are
/// skipped; returns how many were new.
pub fn insert_listings(
    conn: &mut Connection,
    listings: &[RawListing],
) -> Result<usize, rusqlite::Error> {
    let tx = conn.transaction()?;
    let mut inserted = 0usize;

    {
        let mut stmt = tx.prepare(SQL_INSERT_LISTING)?;
        for item in listings {
            inserted += stmt.execute(params![
                item.title,
                item.price,
                item.property_type,
                item.location,
                item.publication_date,
                item.link,
            ])?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

pub fn load_listings(conn: &Connection) -> Result<Vec<RawListing>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        r#"
        SELECT title, price, property_type, location, publication_date, link
        FROM annonces
        ORDER BY id
        "#,
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(RawListing {
            title: row.get(0)?,
            price: row.get(1)?,
            property_type: row.get(2)?,
            location: row.get(3)?,
            publication_date: row.get(4)?,
            link: row.get(5)?,
        })
    })?;

    let mut listings = Vec::new();
    for r in rows {
        listings.push(r?);
    }
    Ok(listings)
}

pub fn count_listings(conn: &Connection) -> Result<i64, rusqlite::Error> {
    conn.query_row("SELECT COUNT(*) FROM annonces", [], |r| r.get(0))
}

/// Full stored collection, for the read API and the dashboard cache.
pub fn get_all_listings(db: &Database) -> Result<Vec<RawListing>, ServerError> {
    db.with_conn(|conn| load_listings(conn).map_err(|e| ServerError::DbError(e.to_string())))
}
