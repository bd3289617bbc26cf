//! Frame and spot metadata from the `analysis.tdf` SQLite database.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::{DataAccessError, Frame};

/// File name of the metadata database inside a `.d` directory.
pub const ANALYSIS_TDF: &str = "analysis.tdf";

fn open_read_only(tdf_path: &Path) -> Result<Connection, DataAccessError> {
    Ok(Connection::open_with_flags(
        tdf_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?)
}

fn has_table(conn: &Connection, table: &str) -> Result<bool, DataAccessError> {
    let mut stmt = conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")?;
    Ok(stmt.exists([table])?)
}

/// Read every MALDI frame with its spot name and scan count, ordered by frame id.
///
/// Frames are taken from `MaldiFrameInfo` and joined with `Frames` for
/// `NumScans`. A NULL `SpotName` is read as an empty name, which the
/// aggregation step flags as malformed. A dataset without `MaldiFrameInfo`
/// is not a MALDI acquisition and yields [`DataAccessError::MissingTable`].
pub fn read_maldi_frames(tdf_path: &Path) -> Result<Vec<Frame>, DataAccessError> {
    let conn = open_read_only(tdf_path)?;
    for table in ["Frames", "MaldiFrameInfo"] {
        if !has_table(&conn, table)? {
            return Err(DataAccessError::MissingTable(table.to_string()));
        }
    }

    let query = "SELECT m.Frame, m.SpotName, f.NumScans \
                 FROM MaldiFrameInfo m JOIN Frames f ON f.Id = m.Frame \
                 ORDER BY m.Frame";
    let frames: Result<Vec<Frame>, _> = conn
        .prepare(query)?
        .query_map([], |row| {
            let spot_name: Option<String> = row.get(1)?;
            Ok(Frame {
                id: row.get(0)?,
                spot_name: spot_name.unwrap_or_default(),
                num_scans: row.get(2)?,
            })
        })?
        .collect();

    Ok(frames?)
}

/// Read the `GlobalMetadata` key/value table.
pub fn read_global_metadata(tdf_path: &Path) -> Result<BTreeMap<String, String>, DataAccessError> {
    let conn = open_read_only(tdf_path)?;
    if !has_table(&conn, "GlobalMetadata")? {
        return Err(DataAccessError::MissingTable("GlobalMetadata".to_string()));
    }

    let rows: Result<BTreeMap<String, String>, _> = conn
        .prepare("SELECT Key, Value FROM GlobalMetadata")?
        .query_map([], |row| {
            let value: Option<String> = row.get(1)?;
            Ok((row.get::<_, String>(0)?, value.unwrap_or_default()))
        })?
        .collect();

    Ok(rows?)
}
