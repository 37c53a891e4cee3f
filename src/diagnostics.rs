use crate::driver::Odbc;
use crate::error::OdbcError;
use crate::types::*;
use tracing::error;

/// Diagnostic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagRec {
    pub state: String, // 5-char SQLSTATE e.g. "HY000"
    pub native_error: SQLINTEGER,
    pub message: String,
}

/// Drains and logs every diagnostic record for `handle`, then escalates
/// when `ret_code` is the hard-failure code.
///
/// Records are requested at ascending record numbers until the driver
/// reports no more, so the loop terminates even with zero records. On
/// `SQL_ERROR` the first record becomes the error; with no records at all
/// the raw return code is carried instead. Any other code only logs.
pub fn report(
    odbc: &dyn Odbc,
    handle: SQLHANDLE,
    handle_type: SQLSMALLINT,
    ret_code: SQLRETURN,
) -> Result<(), OdbcError> {
    let mut first: Option<DiagRec> = None;
    let mut rec_number: SQLSMALLINT = 1;

    while let Some(rec) = odbc.diag_rec(
        handle_type,
        handle,
        rec_number,
        SQL_MAX_MESSAGE_LENGTH as SQLSMALLINT,
    ) {
        error!(
            state = %rec.state,
            native_error = rec.native_error,
            message = %rec.message,
            "driver diagnostic"
        );
        if first.is_none() {
            first = Some(rec);
        }
        rec_number += 1;
    }

    if ret_code != SQL_ERROR {
        return Ok(());
    }

    match first {
        Some(DiagRec {
            state,
            native_error,
            message,
        }) => Err(OdbcError::Diagnostic {
            state,
            native_error,
            message,
        }),
        None => Err(OdbcError::NoDiagnostic { code: ret_code }),
    }
}
