//! ODBC scalar types and the constants this crate consumes.

use std::ffi::c_void;
use std::ptr;

pub type SQLRETURN = i16;
pub type SQLSMALLINT = i16;
pub type SQLUSMALLINT = u16;
pub type SQLINTEGER = i32;
pub type SQLLEN = isize;
pub type SQLULEN = usize;
pub type SQLWCHAR = u16;
pub type SQLPOINTER = *mut c_void;
pub type SQLHANDLE = *mut c_void;

pub const SQL_SUCCESS: SQLRETURN = 0;
pub const SQL_SUCCESS_WITH_INFO: SQLRETURN = 1;
pub const SQL_NO_DATA: SQLRETURN = 100;
pub const SQL_ERROR: SQLRETURN = -1;
pub const SQL_INVALID_HANDLE: SQLRETURN = -2;

pub const SQL_HANDLE_ENV: SQLSMALLINT = 1;
pub const SQL_HANDLE_DBC: SQLSMALLINT = 2;
pub const SQL_HANDLE_STMT: SQLSMALLINT = 3;

pub const SQL_NULL_HANDLE: SQLHANDLE = ptr::null_mut();

pub const SQL_ATTR_ODBC_VERSION: SQLINTEGER = 200;
pub const SQL_OV_ODBC3: SQLINTEGER = 3;

pub const SQL_NTS: SQLLEN = -3;
pub const SQL_NULL_DATA: SQLLEN = -1;

pub const SQL_C_WCHAR: SQLSMALLINT = -8;
pub const SQL_C_CHAR: SQLSMALLINT = 1;

/// Capacity used when draining diagnostic messages, in wide characters.
pub const SQL_MAX_MESSAGE_LENGTH: usize = 512;

/// Mirror of the `SQL_SUCCEEDED` macro.
pub fn sql_succeeded(ret: SQLRETURN) -> bool {
    ret == SQL_SUCCESS || ret == SQL_SUCCESS_WITH_INFO
}
