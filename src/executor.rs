//! Pass-through to the native ODBC driver manager.
//!
//! Every capability call forwards 1:1 to the driver manager through the
//! wide (UTF-16) entry points. Compiled only with the `driver-manager`
//! feature so the default build never links the platform ODBC library.

use odbc_sys as sys;

use crate::diagnostics::DiagRec;
use crate::driver::Odbc;
use crate::types::*;
use crate::wchar_to_string;

pub struct DriverManager;

fn handle_kind(handle_type: SQLSMALLINT) -> sys::HandleType {
    match handle_type {
        SQL_HANDLE_ENV => sys::HandleType::Env,
        SQL_HANDLE_DBC => sys::HandleType::Dbc,
        _ => sys::HandleType::Stmt,
    }
}

/// NUL-terminated UTF-16 for the wide entry points.
fn wide(text: &str) -> Vec<SQLWCHAR> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

impl Odbc for DriverManager {
    fn alloc_handle(
        &self,
        handle_type: SQLSMALLINT,
        input_handle: SQLHANDLE,
    ) -> (SQLRETURN, SQLHANDLE) {
        let mut output: sys::Handle = std::ptr::null_mut();
        let ret = unsafe {
            sys::SQLAllocHandle(
                handle_kind(handle_type),
                input_handle as sys::Handle,
                &mut output,
            )
        };
        (ret.0, output as SQLHANDLE)
    }

    fn set_env_attr(&self, env: SQLHANDLE, attribute: SQLINTEGER, value: SQLINTEGER) -> SQLRETURN {
        let attr = match attribute {
            SQL_ATTR_ODBC_VERSION => sys::EnvironmentAttribute::OdbcVersion,
            _ => return SQL_ERROR,
        };
        let ret = unsafe {
            sys::SQLSetEnvAttr(env as sys::HEnv, attr, value as isize as sys::Pointer, 0)
        };
        ret.0
    }

    fn connect(&self, dbc: SQLHANDLE, dsn: &str, user: &str, password: &str) -> SQLRETURN {
        let dsn = wide(dsn);
        let user = wide(user);
        let password = wide(password);
        let ret = unsafe {
            sys::SQLConnectW(
                dbc as sys::HDbc,
                dsn.as_ptr(),
                SQL_NTS as i16,
                user.as_ptr(),
                SQL_NTS as i16,
                password.as_ptr(),
                SQL_NTS as i16,
            )
        };
        ret.0
    }

    fn disconnect(&self, dbc: SQLHANDLE) -> SQLRETURN {
        unsafe { sys::SQLDisconnect(dbc as sys::HDbc) }.0
    }

    fn free_handle(&self, handle_type: SQLSMALLINT, handle: SQLHANDLE) -> SQLRETURN {
        unsafe { sys::SQLFreeHandle(handle_kind(handle_type), handle as sys::Handle) }.0
    }

    fn exec_direct(&self, stmt: SQLHANDLE, statement_text: &str) -> SQLRETURN {
        let text = wide(statement_text);
        unsafe { sys::SQLExecDirectW(stmt as sys::HStmt, text.as_ptr(), SQL_NTS as i32) }.0
    }

    fn num_result_cols(&self, stmt: SQLHANDLE) -> (SQLRETURN, SQLSMALLINT) {
        let mut columns: SQLSMALLINT = 0;
        let ret = unsafe { sys::SQLNumResultCols(stmt as sys::HStmt, &mut columns) };
        (ret.0, columns)
    }

    fn fetch(&self, stmt: SQLHANDLE) -> SQLRETURN {
        unsafe { sys::SQLFetch(stmt as sys::HStmt) }.0
    }

    fn get_data(
        &self,
        stmt: SQLHANDLE,
        column: SQLUSMALLINT,
        target_type: SQLSMALLINT,
        buffer: &mut [SQLWCHAR],
    ) -> (SQLRETURN, SQLLEN) {
        let c_type = match target_type {
            SQL_C_WCHAR => sys::CDataType::WChar,
            _ => sys::CDataType::Char,
        };
        let mut indicator: sys::Len = 0;
        let ret = unsafe {
            sys::SQLGetData(
                stmt as sys::HStmt,
                column,
                c_type,
                buffer.as_mut_ptr() as sys::Pointer,
                (buffer.len() * std::mem::size_of::<SQLWCHAR>()) as sys::Len,
                &mut indicator,
            )
        };
        (ret.0, indicator)
    }

    fn row_count(&self, stmt: SQLHANDLE) -> (SQLRETURN, SQLLEN) {
        let mut count: sys::Len = 0;
        let ret = unsafe { sys::SQLRowCount(stmt as sys::HStmt, &mut count) };
        (ret.0, count)
    }

    fn diag_rec(
        &self,
        handle_type: SQLSMALLINT,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        message_capacity: SQLSMALLINT,
    ) -> Option<DiagRec> {
        let mut state = [0 as SQLWCHAR; 6];
        let mut native_error: SQLINTEGER = 0;
        let mut message = vec![0 as SQLWCHAR; message_capacity.max(1) as usize];
        let mut text_length: SQLSMALLINT = 0;
        let ret = unsafe {
            sys::SQLGetDiagRecW(
                handle_kind(handle_type),
                handle as sys::Handle,
                rec_number,
                state.as_mut_ptr(),
                &mut native_error,
                message.as_mut_ptr(),
                message.len() as SQLSMALLINT,
                &mut text_length,
            )
        };
        if !sql_succeeded(ret.0) {
            return None;
        }
        Some(DiagRec {
            state: wchar_to_string(&state),
            native_error,
            message: wchar_to_string(&message),
        })
    }
}
