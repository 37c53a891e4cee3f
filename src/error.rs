use crate::types::{SQLINTEGER, SQLRETURN};
use thiserror::Error;

/// Failure escalated out of a session operation.
///
/// Only hard failures (`SQL_ERROR`) cross the component boundary as errors;
/// warnings are logged and absorbed, caller misuse comes back as
/// `false`/empty return values.
#[derive(Debug, Error)]
pub enum OdbcError {
    /// The driver reported a hard failure together with at least one
    /// diagnostic record. Carries the first record.
    #[error("[{state}] {message} (native error {native_error})")]
    Diagnostic {
        state: String,
        native_error: SQLINTEGER,
        message: String,
    },

    /// The driver reported a hard failure but produced no diagnostics.
    #[error("driver call failed with return code {code} and no diagnostics")]
    NoDiagnostic { code: SQLRETURN },
}
