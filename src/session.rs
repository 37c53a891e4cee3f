//! Three-level handle lifecycle: environment, connection, statement.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::diagnostics::report;
use crate::driver::Odbc;
use crate::error::OdbcError;
use crate::fetch::fetch_all;
use crate::types::*;

/// Owns the ODBC environment, connection, and statement handles and
/// sequences their lifecycle against the driver capability interface.
///
/// States run `Uninitialized → EnvironmentReady → ConnectionReady →
/// Connected → Disconnected(→ConnectionReady)`. All three handles are
/// exclusively owned here; teardown on drop always frees statement,
/// connection, environment, in that order.
pub struct OdbcSession {
    henv: SQLHANDLE,
    hdbc: SQLHANDLE,
    hstmt: SQLHANDLE,
    connected: bool,
    odbc: Arc<dyn Odbc>,
}

impl OdbcSession {
    /// Session backed by the native driver manager.
    #[cfg(feature = "driver-manager")]
    pub fn new() -> Self {
        Self::with_driver(Arc::new(crate::executor::DriverManager))
    }

    pub fn with_driver(odbc: Arc<dyn Odbc>) -> Self {
        Self {
            henv: SQL_NULL_HANDLE,
            hdbc: SQL_NULL_HANDLE,
            hstmt: SQL_NULL_HANDLE,
            connected: false,
            odbc,
        }
    }

    /// Allocates the environment handle, selects ODBC 3 behavior, and
    /// allocates the connection handle.
    ///
    /// A failing step reports its diagnostics against the environment
    /// handle and stops; nothing is freed here — cleanup is deferred to
    /// drop.
    pub fn initialize(&mut self) -> Result<(), OdbcError> {
        let (ret, henv) = self.odbc.alloc_handle(SQL_HANDLE_ENV, SQL_NULL_HANDLE);
        if !sql_succeeded(ret) {
            return report(self.odbc.as_ref(), SQL_NULL_HANDLE, SQL_HANDLE_ENV, ret);
        }
        self.henv = henv;
        debug!("environment handle allocated");

        let ret = self
            .odbc
            .set_env_attr(self.henv, SQL_ATTR_ODBC_VERSION, SQL_OV_ODBC3);
        if !sql_succeeded(ret) {
            return report(self.odbc.as_ref(), self.henv, SQL_HANDLE_ENV, ret);
        }

        let (ret, hdbc) = self.odbc.alloc_handle(SQL_HANDLE_DBC, self.henv);
        if !sql_succeeded(ret) {
            return report(self.odbc.as_ref(), self.henv, SQL_HANDLE_ENV, ret);
        }
        self.hdbc = hdbc;
        debug!("connection handle allocated");
        Ok(())
    }

    /// Connects to `dsn` and allocates the statement handle.
    ///
    /// Warning diagnostics are drained and logged, then the connect still
    /// counts as a success. A hard failure propagates after its
    /// diagnostics are logged; other non-success codes come back as
    /// `Ok(false)`.
    pub fn connect(&mut self, dsn: &str, user: &str, password: &str) -> Result<bool, OdbcError> {
        info!(dsn = %dsn, "connecting");
        let ret = self.odbc.connect(self.hdbc, dsn, user, password);
        if sql_succeeded(ret) {
            if ret == SQL_SUCCESS_WITH_INFO {
                report(self.odbc.as_ref(), self.hdbc, SQL_HANDLE_DBC, ret)?;
            }
            self.connected = true;
            let (alloc_ret, hstmt) = self.odbc.alloc_handle(SQL_HANDLE_STMT, self.hdbc);
            if sql_succeeded(alloc_ret) {
                self.hstmt = hstmt;
            } else {
                // Not escalated; a later execute surfaces the driver's
                // own error for the missing statement handle.
                error!(code = alloc_ret, "statement handle allocation failed");
            }
            info!("connected");
            return Ok(true);
        }
        report(self.odbc.as_ref(), self.hdbc, SQL_HANDLE_DBC, ret)?;
        Ok(false)
    }

    /// Frees the statement handle and disconnects. Idempotent; the
    /// connection handle itself stays allocated until drop.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        if !self.hstmt.is_null() {
            debug!("freeing statement handle");
            self.odbc.free_handle(SQL_HANDLE_STMT, self.hstmt);
            self.hstmt = SQL_NULL_HANDLE;
        }
        if !self.hdbc.is_null() {
            info!("disconnecting");
            self.odbc.disconnect(self.hdbc);
        }
        self.connected = false;
    }

    pub fn execute_query(&mut self, sql: &str) -> Result<bool, OdbcError> {
        if !self.connected {
            warn!("execute_query called while not connected");
            return Ok(false);
        }
        let ret = self.odbc.exec_direct(self.hstmt, sql);
        if sql_succeeded(ret) {
            if ret == SQL_SUCCESS_WITH_INFO {
                report(self.odbc.as_ref(), self.hstmt, SQL_HANDLE_STMT, ret)?;
            }
            return Ok(true);
        }
        report(self.odbc.as_ref(), self.hstmt, SQL_HANDLE_STMT, ret)?;
        Ok(false)
    }

    /// Like [`execute_query`](Self::execute_query) but additionally
    /// consumes the driver's affected-row count after a successful
    /// execution.
    pub fn execute_update(&mut self, sql: &str) -> Result<bool, OdbcError> {
        if !self.connected {
            warn!("execute_update called while not connected");
            return Ok(false);
        }
        let ret = self.odbc.exec_direct(self.hstmt, sql);
        if sql_succeeded(ret) {
            if ret == SQL_SUCCESS_WITH_INFO {
                report(self.odbc.as_ref(), self.hstmt, SQL_HANDLE_STMT, ret)?;
            }
            let (_, affected) = self.odbc.row_count(self.hstmt);
            debug!(rows = affected, "update executed");
            return Ok(true);
        }
        report(self.odbc.as_ref(), self.hstmt, SQL_HANDLE_STMT, ret)?;
        Ok(false)
    }

    /// Materializes the current result set; empty when not connected.
    pub fn fetch_results(&mut self) -> Vec<Vec<String>> {
        if !self.connected {
            warn!("fetch_results called while not connected");
            return Vec::new();
        }
        fetch_all(self.odbc.as_ref(), self.hstmt)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // Raw handle accessors, for diagnostics and tests.

    pub fn env_handle(&self) -> SQLHANDLE {
        self.henv
    }

    pub fn connection_handle(&self) -> SQLHANDLE {
        self.hdbc
    }

    pub fn statement_handle(&self) -> SQLHANDLE {
        self.hstmt
    }
}

impl Drop for OdbcSession {
    fn drop(&mut self) {
        self.disconnect();
        if !self.hstmt.is_null() {
            self.odbc.free_handle(SQL_HANDLE_STMT, self.hstmt);
            self.hstmt = SQL_NULL_HANDLE;
        }
        if !self.hdbc.is_null() {
            self.odbc.free_handle(SQL_HANDLE_DBC, self.hdbc);
            self.hdbc = SQL_NULL_HANDLE;
        }
        if !self.henv.is_null() {
            self.odbc.free_handle(SQL_HANDLE_ENV, self.henv);
            self.henv = SQL_NULL_HANDLE;
        }
    }
}
