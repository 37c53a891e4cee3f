//! Capability surface for the native driver manager.
//!
//! The session talks to ODBC only through this trait, so the whole
//! lifecycle can run against the real driver manager or against a
//! scripted double in tests.

use crate::diagnostics::DiagRec;
use crate::types::*;

pub trait Odbc {
    /// Allocate a handle of `handle_type` under `input_handle`
    /// (`SQL_NULL_HANDLE` for the environment). Returns the driver's
    /// return code and the new handle, `SQL_NULL_HANDLE` on failure.
    fn alloc_handle(
        &self,
        handle_type: SQLSMALLINT,
        input_handle: SQLHANDLE,
    ) -> (SQLRETURN, SQLHANDLE);

    fn set_env_attr(&self, env: SQLHANDLE, attribute: SQLINTEGER, value: SQLINTEGER) -> SQLRETURN;

    fn connect(&self, dbc: SQLHANDLE, dsn: &str, user: &str, password: &str) -> SQLRETURN;

    fn disconnect(&self, dbc: SQLHANDLE) -> SQLRETURN;

    fn free_handle(&self, handle_type: SQLSMALLINT, handle: SQLHANDLE) -> SQLRETURN;

    fn exec_direct(&self, stmt: SQLHANDLE, statement_text: &str) -> SQLRETURN;

    fn num_result_cols(&self, stmt: SQLHANDLE) -> (SQLRETURN, SQLSMALLINT);

    fn fetch(&self, stmt: SQLHANDLE) -> SQLRETURN;

    /// Read column `column` (1-based) of the current row into `buffer`.
    /// Returns the return code and the length-or-indicator value; an
    /// indicator of `SQL_NULL_DATA` means the column has no value.
    fn get_data(
        &self,
        stmt: SQLHANDLE,
        column: SQLUSMALLINT,
        target_type: SQLSMALLINT,
        buffer: &mut [SQLWCHAR],
    ) -> (SQLRETURN, SQLLEN);

    fn row_count(&self, stmt: SQLHANDLE) -> (SQLRETURN, SQLLEN);

    /// Diagnostic record `rec_number` (1-based) for `handle`, or `None`
    /// once the driver reports no more records.
    fn diag_rec(
        &self,
        handle_type: SQLSMALLINT,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        message_capacity: SQLSMALLINT,
    ) -> Option<DiagRec>;
}
