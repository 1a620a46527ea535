//! Statement execution handles.
//!
//! A [`Cursor`] drives one statement at a time over its connection. The
//! current operation is an explicit state machine rather than a nullable
//! handle: `Idle`, an update count, or a materialized result page. Starting
//! a new statement (or closing) always releases the prior operation's
//! server-side state first, even when that release itself fails.

use crate::connection::Connection;
use crate::error::SnappyError;
use crate::escape::ParamEscaper;
use crate::results::{self, ColumnDescription, ResultBuffer};
use crate::value::Value;

/// Default number of rows returned by an unsized `fetch_many`.
pub const DEFAULT_ARRAY_SIZE: usize = 1000;

/// Current operation of a cursor.
enum CursorState {
    /// No statement has run, or the prior one was released.
    Idle,
    /// The last statement reported an update count and no rows.
    UpdateCount(i64),
    /// The last statement produced rows; `cursor_id > 0` means further
    /// batches can be paged.
    ResultSet {
        cursor_id: i64,
        buffer: ResultBuffer,
        pos: usize,
    },
}

/// Statement-execution handle bound to one [`Connection`].
///
/// The mutable borrow keeps the one-statement-in-flight rule checked at
/// compile time: a second cursor on the same connection cannot exist while
/// this one is alive.
pub struct Cursor<'conn> {
    connection: &'conn mut Connection,
    escaper: Box<dyn ParamEscaper>,
    state: CursorState,
    row_count: i64,
    /// Default batch size for [`Cursor::fetch_many`].
    pub array_size: usize,
}

impl<'conn> Cursor<'conn> {
    pub fn new(connection: &'conn mut Connection, escaper: Box<dyn ParamEscaper>) -> Self {
        Cursor {
            connection,
            escaper,
            state: CursorState::Idle,
            row_count: 0,
            array_size: DEFAULT_ARRAY_SIZE,
        }
    }

    /// Executes a statement, releasing whatever operation was live before.
    ///
    /// When `params` is given, the escaper renders them into the `?`
    /// placeholders of `sql` first. A returned result set is materialized
    /// eagerly into the row buffer.
    ///
    /// # Errors
    ///
    /// Propagates release, escape, RPC and decode failures. A benign
    /// "no current statement" answer to the release sequence is swallowed;
    /// the prior operation is considered released either way.
    pub fn execute(&mut self, sql: &str, params: Option<&[Value]>) -> Result<(), SnappyError> {
        let substituted;
        let sql = match params {
            Some(values) => {
                substituted = self.escaper.substitute(sql, values)?;
                substituted.as_str()
            }
            None => sql,
        };

        self.release()?;

        let handle = self.connection.execute(sql, None, None)?;
        self.row_count = 0;
        match handle.result_set {
            Some(batch) => {
                let buffer = results::materialize(&batch)?;
                self.row_count = if handle.update_count != 0 {
                    handle.update_count
                } else {
                    buffer.rows.len() as i64
                };
                self.state = CursorState::ResultSet {
                    cursor_id: handle.cursor_id,
                    buffer,
                    pos: 0,
                };
            }
            None => {
                if handle.update_count != 0 {
                    self.row_count = handle.update_count;
                }
                self.state = CursorState::UpdateCount(handle.update_count);
            }
        }
        Ok(())
    }

    /// Column descriptions of the current result set, or `None` when the
    /// last statement produced no rows.
    pub fn description(&self) -> Option<&[ColumnDescription]> {
        match &self.state {
            CursorState::ResultSet { buffer, .. } => Some(&buffer.description),
            _ => None,
        }
    }

    /// Rows affected by the last statement, or the size of its result set.
    pub fn row_count(&self) -> i64 {
        self.row_count
    }

    /// The next row of the buffer, advancing the cursor position.
    pub fn fetch_one(&mut self) -> Option<&[Value]> {
        match &mut self.state {
            CursorState::ResultSet { buffer, pos, .. } if *pos < buffer.rows.len() => {
                let index = *pos;
                *pos += 1;
                Some(&buffer.rows[index])
            }
            _ => None,
        }
    }

    /// The next `size` rows (default [`Cursor::array_size`]).
    pub fn fetch_many(&mut self, size: Option<usize>) -> &[Vec<Value>] {
        let size = size.unwrap_or(self.array_size);
        match &mut self.state {
            CursorState::ResultSet { buffer, pos, .. } => {
                let start = *pos;
                let end = (start + size).min(buffer.rows.len());
                *pos = end;
                &buffer.rows[start..end]
            }
            _ => &[],
        }
    }

    /// All remaining rows of the buffer.
    pub fn fetch_all(&mut self) -> &[Vec<Value>] {
        match &mut self.state {
            CursorState::ResultSet { buffer, pos, .. } => {
                let start = *pos;
                *pos = buffer.rows.len();
                &buffer.rows[start..]
            }
            _ => &[],
        }
    }

    /// Pages the next result batch, replacing the row buffer and rewinding
    /// the position to the first row.
    ///
    /// Returns `false` when the current operation has no further batches.
    pub fn next_set(&mut self) -> Result<bool, SnappyError> {
        let cursor_id = match &self.state {
            CursorState::ResultSet { cursor_id, .. } if *cursor_id > 0 => *cursor_id,
            _ => return Ok(false),
        };

        let handle = self.connection.get_next_result_set(cursor_id)?;
        match handle.result_set {
            Some(batch) => {
                let buffer = results::materialize(&batch)?;
                self.state = CursorState::ResultSet {
                    cursor_id: handle.cursor_id,
                    buffer,
                    pos: 0,
                };
                Ok(true)
            }
            None => {
                self.state = CursorState::UpdateCount(handle.update_count);
                Ok(false)
            }
        }
    }

    /// Best-effort cancellation of the statement currently running on the
    /// session.
    pub fn cancel(&mut self) -> Result<(), SnappyError> {
        self.connection.cancel_current_statement()?;
        Ok(())
    }

    /// Releases the current operation. Calling `close` on an already-closed
    /// cursor is a no-op.
    pub fn close(&mut self) -> Result<(), SnappyError> {
        self.release()
    }

    /// Clears the current operation locally, then releases its server-side
    /// state. The local handle is cleared even when the release errors, so
    /// a failed release is not retried on the next statement.
    fn release(&mut self) -> Result<(), SnappyError> {
        if matches!(self.state, CursorState::Idle) {
            return Ok(());
        }
        self.state = CursorState::Idle;
        self.connection.reset()?;
        Ok(())
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
