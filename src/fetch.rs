use crate::driver::Odbc;
use crate::types::*;
use crate::wchar_to_string;
use tracing::{debug, error, warn};

/// Output value for a column whose indicator reports no data.
pub const NULL_SENTINEL: &str = "NULL";

/// Per-column read buffer, in wide characters. Longer values are
/// truncated; continuation reads are not attempted.
pub const COLUMN_BUFFER_LEN: usize = 1024;

/// Materializes the statement's result set into rows of column text.
///
/// Never fails: the column count is read once, rows are fetched until the
/// driver reports no more data, and any driver error mid-loop ends the
/// loop with the rows read so far. A `SQL_NULL_DATA` indicator becomes
/// [`NULL_SENTINEL`], everything else is the buffer content up to its NUL
/// terminator. A drained cursor yields an empty result until the
/// statement is re-executed.
pub fn fetch_all(odbc: &dyn Odbc, stmt: SQLHANDLE) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();

    let (ret, num_cols) = odbc.num_result_cols(stmt);
    if !sql_succeeded(ret) {
        warn!(code = ret, "column count unavailable, returning no rows");
        return rows;
    }
    if num_cols <= 0 {
        debug!("statement produced no result set");
        return rows;
    }

    loop {
        let ret = odbc.fetch(stmt);
        if ret == SQL_NO_DATA {
            break;
        }
        if !sql_succeeded(ret) {
            error!(
                code = ret,
                rows = rows.len(),
                "fetch failed, returning partial results"
            );
            break;
        }

        let mut row = Vec::with_capacity(num_cols as usize);
        for col in 1..=num_cols {
            let mut buffer = [0 as SQLWCHAR; COLUMN_BUFFER_LEN];
            let (ret, indicator) =
                odbc.get_data(stmt, col as SQLUSMALLINT, SQL_C_WCHAR, &mut buffer);
            if !sql_succeeded(ret) {
                error!(code = ret, column = col, "reading column failed");
                row.push(String::new());
            } else if indicator == SQL_NULL_DATA {
                row.push(NULL_SENTINEL.to_string());
            } else {
                row.push(wchar_to_string(&buffer));
            }
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), "materialized result set");
    rows
}
