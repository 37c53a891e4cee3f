//! Lifecycle management for a single ODBC session.
//!
//! One environment handle, one connection handle, one active statement
//! handle, owned by [`OdbcSession`] and torn down in that reverse order.
//! Driver return codes are translated into silent success, logged
//! warnings, or [`OdbcError`] failures, and result sets are materialized
//! into a plain `Vec<Vec<String>>` grid.
//!
//! The driver manager itself is reached only through the [`Odbc`]
//! capability trait: [`DriverManager`] forwards to the native library
//! (behind the `driver-manager` feature), while [`ScriptedOdbc`] answers
//! with canned return codes for deterministic tests.

mod diagnostics;
mod driver;
mod error;
#[cfg(feature = "driver-manager")]
mod executor;
mod fetch;
mod mock;
mod session;
mod types;

pub use diagnostics::{report, DiagRec};
pub use driver::Odbc;
pub use error::OdbcError;
#[cfg(feature = "driver-manager")]
pub use executor::DriverManager;
pub use fetch::{fetch_all, COLUMN_BUFFER_LEN, NULL_SENTINEL};
pub use mock::{Call, ScriptedOdbc};
pub use session::OdbcSession;
pub use types::*;

// ── Helper: extract string from a SQLWCHAR buffer ───────────────────

pub(crate) fn wchar_to_string(buf: &[SQLWCHAR]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wchar_stops_at_terminator() {
        let mut buf: Vec<SQLWCHAR> = "data1".encode_utf16().collect();
        buf.push(0);
        buf.extend("junk".encode_utf16());
        assert_eq!(wchar_to_string(&buf), "data1");
    }

    #[test]
    fn wchar_without_terminator_takes_whole_buffer() {
        let buf: Vec<SQLWCHAR> = "ab".encode_utf16().collect();
        assert_eq!(wchar_to_string(&buf), "ab");
    }

    #[test]
    fn wchar_empty_buffer_is_empty_string() {
        assert_eq!(wchar_to_string(&[]), "");
    }
}
