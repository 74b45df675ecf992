//! Process exit statuses (BSD `sysexits.h` values)

/// All was well
pub const EX_OK: i32 = 0;
/// Input data was incorrect, e.g. missing or malformed puzzle letters
pub const EX_DATAERR: i32 = 65;
/// The dictionary file could not be opened
pub const EX_NOINPUT: i32 = 66;
/// Internal software error
pub const EX_SOFTWARE: i32 = 70;
/// The operating system refused a request, e.g. starting a worker
pub const EX_OSERR: i32 = 71;
/// A worker could not commit its results
pub const EX_IOERR: i32 = 74;

/// Statuses above this mean the shell saw a signal
const KILLED_BY_SIGNAL: i32 = 128;
const KILLED_BY_MAX: i32 = 161;

/// Human-readable name for an exit status
#[must_use]
pub fn describe(code: i32) -> String {
    match code {
        EX_OK => "success".to_string(),
        1 => "general error".to_string(),
        EX_DATAERR => "data error".to_string(),
        EX_NOINPUT => "cannot open input".to_string(),
        EX_SOFTWARE => "internal software error".to_string(),
        EX_OSERR => "system error".to_string(),
        EX_IOERR => "input/output error".to_string(),
        c if c > KILLED_BY_SIGNAL && c < KILLED_BY_MAX => {
            format!("killed by signal {}", c - KILLED_BY_SIGNAL)
        }
        c => format!("exit code {c}"),
    }
}
