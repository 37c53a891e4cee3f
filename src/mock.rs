//! Scriptable stand-in for the native driver manager.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::diagnostics::DiagRec;
use crate::driver::Odbc;
use crate::types::*;

/// One recorded capability call, for ordering assertions in tests.
///
/// Handles are recorded as the integer tokens the double hands out, so
/// teardown order and double-free checks can compare them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AllocHandle {
        handle_type: SQLSMALLINT,
        parent: usize,
    },
    SetEnvAttr {
        attribute: SQLINTEGER,
        value: SQLINTEGER,
    },
    Connect {
        dsn: String,
        user: String,
    },
    Disconnect {
        dbc: usize,
    },
    FreeHandle {
        handle_type: SQLSMALLINT,
        handle: usize,
    },
    ExecDirect {
        sql: String,
    },
    NumResultCols,
    Fetch,
    GetData {
        column: SQLUSMALLINT,
    },
    RowCount,
    DiagRec {
        handle_type: SQLSMALLINT,
        rec_number: SQLSMALLINT,
    },
}

#[derive(Default)]
struct Script {
    next_handle: usize,
    alloc_handle: VecDeque<SQLRETURN>,
    set_env_attr: VecDeque<SQLRETURN>,
    connect: VecDeque<SQLRETURN>,
    disconnect: VecDeque<SQLRETURN>,
    free_handle: VecDeque<SQLRETURN>,
    exec_direct: VecDeque<SQLRETURN>,
    fetch: VecDeque<SQLRETURN>,
    num_result_cols: Option<(SQLRETURN, SQLSMALLINT)>,
    row_count: Option<(SQLRETURN, SQLLEN)>,
    diag_recs: Vec<DiagRec>,
    columns: SQLSMALLINT,
    rows: Vec<Vec<Option<String>>>,
    cursor: usize, // 0 = before the first row
    calls: Vec<Call>,
}

/// Test double for [`Odbc`].
///
/// Every operation answers `SQL_SUCCESS` unless a canned return code was
/// queued for it. Handles are fabricated from a counter and never
/// dereferenced. `load_result_set` drives the fetch/get-data/column-count
/// defaults; a successful execute-direct rewinds the cursor.
#[derive(Default)]
pub struct ScriptedOdbc {
    script: Mutex<Script>,
}

impl ScriptedOdbc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_alloc_handle(&self, ret: SQLRETURN) {
        self.script.lock().alloc_handle.push_back(ret);
    }

    pub fn script_set_env_attr(&self, ret: SQLRETURN) {
        self.script.lock().set_env_attr.push_back(ret);
    }

    pub fn script_connect(&self, ret: SQLRETURN) {
        self.script.lock().connect.push_back(ret);
    }

    pub fn script_disconnect(&self, ret: SQLRETURN) {
        self.script.lock().disconnect.push_back(ret);
    }

    pub fn script_free_handle(&self, ret: SQLRETURN) {
        self.script.lock().free_handle.push_back(ret);
    }

    pub fn script_exec_direct(&self, ret: SQLRETURN) {
        self.script.lock().exec_direct.push_back(ret);
    }

    pub fn script_fetch(&self, ret: SQLRETURN) {
        self.script.lock().fetch.push_back(ret);
    }

    pub fn script_num_result_cols(&self, ret: SQLRETURN, columns: SQLSMALLINT) {
        self.script.lock().num_result_cols = Some((ret, columns));
    }

    pub fn script_row_count(&self, ret: SQLRETURN, count: SQLLEN) {
        self.script.lock().row_count = Some((ret, count));
    }

    /// Appends a diagnostic record; records are served back at ascending
    /// record numbers starting from 1.
    pub fn add_diag_rec(&self, state: &str, native_error: SQLINTEGER, message: &str) {
        self.script.lock().diag_recs.push(DiagRec {
            state: state.to_string(),
            native_error,
            message: message.to_string(),
        });
    }

    /// Loads an in-memory result set; `None` cells read back as SQL NULL.
    pub fn load_result_set(&self, columns: SQLSMALLINT, rows: Vec<Vec<Option<String>>>) {
        let mut s = self.script.lock();
        s.columns = columns;
        s.rows = rows;
        s.cursor = 0;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }
}

impl Odbc for ScriptedOdbc {
    fn alloc_handle(
        &self,
        handle_type: SQLSMALLINT,
        input_handle: SQLHANDLE,
    ) -> (SQLRETURN, SQLHANDLE) {
        let mut s = self.script.lock();
        s.calls.push(Call::AllocHandle {
            handle_type,
            parent: input_handle as usize,
        });
        let ret = s.alloc_handle.pop_front().unwrap_or(SQL_SUCCESS);
        if sql_succeeded(ret) {
            s.next_handle += 1;
            (ret, s.next_handle as SQLHANDLE)
        } else {
            (ret, SQL_NULL_HANDLE)
        }
    }

    fn set_env_attr(&self, _env: SQLHANDLE, attribute: SQLINTEGER, value: SQLINTEGER) -> SQLRETURN {
        let mut s = self.script.lock();
        s.calls.push(Call::SetEnvAttr { attribute, value });
        s.set_env_attr.pop_front().unwrap_or(SQL_SUCCESS)
    }

    fn connect(&self, _dbc: SQLHANDLE, dsn: &str, user: &str, _password: &str) -> SQLRETURN {
        let mut s = self.script.lock();
        s.calls.push(Call::Connect {
            dsn: dsn.to_string(),
            user: user.to_string(),
        });
        s.connect.pop_front().unwrap_or(SQL_SUCCESS)
    }

    fn disconnect(&self, dbc: SQLHANDLE) -> SQLRETURN {
        let mut s = self.script.lock();
        s.calls.push(Call::Disconnect { dbc: dbc as usize });
        s.disconnect.pop_front().unwrap_or(SQL_SUCCESS)
    }

    fn free_handle(&self, handle_type: SQLSMALLINT, handle: SQLHANDLE) -> SQLRETURN {
        let mut s = self.script.lock();
        s.calls.push(Call::FreeHandle {
            handle_type,
            handle: handle as usize,
        });
        s.free_handle.pop_front().unwrap_or(SQL_SUCCESS)
    }

    fn exec_direct(&self, _stmt: SQLHANDLE, statement_text: &str) -> SQLRETURN {
        let mut s = self.script.lock();
        s.calls.push(Call::ExecDirect {
            sql: statement_text.to_string(),
        });
        let ret = s.exec_direct.pop_front().unwrap_or(SQL_SUCCESS);
        if sql_succeeded(ret) {
            s.cursor = 0; // re-execution rewinds the cursor
        }
        ret
    }

    fn num_result_cols(&self, _stmt: SQLHANDLE) -> (SQLRETURN, SQLSMALLINT) {
        let mut s = self.script.lock();
        s.calls.push(Call::NumResultCols);
        let columns = s.columns;
        s.num_result_cols.unwrap_or((SQL_SUCCESS, columns))
    }

    fn fetch(&self, _stmt: SQLHANDLE) -> SQLRETURN {
        let mut s = self.script.lock();
        s.calls.push(Call::Fetch);
        if let Some(ret) = s.fetch.pop_front() {
            if sql_succeeded(ret) && s.cursor < s.rows.len() {
                s.cursor += 1;
            }
            return ret;
        }
        if s.cursor < s.rows.len() {
            s.cursor += 1;
            SQL_SUCCESS
        } else {
            SQL_NO_DATA
        }
    }

    fn get_data(
        &self,
        _stmt: SQLHANDLE,
        column: SQLUSMALLINT,
        _target_type: SQLSMALLINT,
        buffer: &mut [SQLWCHAR],
    ) -> (SQLRETURN, SQLLEN) {
        let mut s = self.script.lock();
        s.calls.push(Call::GetData { column });
        if s.cursor == 0 || s.cursor > s.rows.len() {
            return (SQL_ERROR, 0);
        }
        let row = &s.rows[s.cursor - 1];
        let value = match row.get((column as usize).wrapping_sub(1)) {
            Some(v) => v,
            None => return (SQL_ERROR, 0),
        };
        match value {
            None => (SQL_SUCCESS, SQL_NULL_DATA),
            Some(text) => {
                let utf16: Vec<SQLWCHAR> = text.encode_utf16().collect();
                let indicator = (utf16.len() * 2) as SQLLEN;
                if buffer.is_empty() {
                    return (SQL_SUCCESS_WITH_INFO, indicator);
                }
                let copy = utf16.len().min(buffer.len() - 1);
                buffer[..copy].copy_from_slice(&utf16[..copy]);
                buffer[copy] = 0;
                if utf16.len() > copy {
                    (SQL_SUCCESS_WITH_INFO, indicator)
                } else {
                    (SQL_SUCCESS, indicator)
                }
            }
        }
    }

    fn row_count(&self, _stmt: SQLHANDLE) -> (SQLRETURN, SQLLEN) {
        let mut s = self.script.lock();
        s.calls.push(Call::RowCount);
        s.row_count.unwrap_or((SQL_SUCCESS, 0))
    }

    fn diag_rec(
        &self,
        handle_type: SQLSMALLINT,
        _handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        message_capacity: SQLSMALLINT,
    ) -> Option<DiagRec> {
        let mut s = self.script.lock();
        s.calls.push(Call::DiagRec {
            handle_type,
            rec_number,
        });
        if rec_number < 1 {
            return None;
        }
        let rec = s.diag_recs.get(rec_number as usize - 1)?.clone();
        let capacity = message_capacity.max(1) as usize;
        let message = if rec.message.chars().count() >= capacity {
            rec.message.chars().take(capacity - 1).collect()
        } else {
            rec.message
        };
        Some(DiagRec {
            state: rec.state,
            native_error: rec.native_error,
            message,
        })
    }
}
