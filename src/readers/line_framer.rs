use memchr::memchr;

use crate::error::{ProcessingError, Result};

/// Turns a stream of byte chunks into complete lines.
///
/// Lines end at `\n`; a `\r` directly before the terminator is dropped.
/// The unterminated tail of each chunk is kept in `carry` and joined with the
/// head of the next chunk. Empty lines are skipped.
#[derive(Debug)]
pub struct LineFramer {
    carry: Vec<u8>,
    max_line_len: usize,
    line_number: u64,
    records: u64,
    empty_lines: u64,
}

impl LineFramer {
    pub fn new(max_line_len: usize) -> Self {
        Self {
            carry: Vec::with_capacity(max_line_len + 1),
            max_line_len,
            line_number: 0,
            records: 0,
            empty_lines: 0,
        }
    }

    /// Frame `chunk`, calling `on_line(line_number, line)` for every complete,
    /// non-empty line. The slice passed to `on_line` is only valid for the
    /// duration of the call.
    pub fn feed<F>(&mut self, chunk: &[u8], mut on_line: F) -> Result<()>
    where
        F: FnMut(u64, &[u8]) -> Result<()>,
    {
        let mut rest = chunk;

        if !self.carry.is_empty() {
            match memchr(b'\n', rest) {
                Some(pos) => {
                    self.stash(&rest[..pos])?;
                    rest = &rest[pos + 1..];
                    self.emit_carry(&mut on_line)?;
                }
                None => return self.stash(rest),
            }
        }

        while let Some(pos) = memchr(b'\n', rest) {
            self.emit(&rest[..pos], &mut on_line)?;
            rest = &rest[pos + 1..];
        }

        if !rest.is_empty() {
            self.stash(rest)?;
        }

        Ok(())
    }

    /// Flush the carry as a final, unterminated line.
    pub fn finish<F>(&mut self, mut on_line: F) -> Result<()>
    where
        F: FnMut(u64, &[u8]) -> Result<()>,
    {
        if self.carry.is_empty() {
            return Ok(());
        }
        self.emit_carry(&mut on_line)
    }

    /// Non-empty lines handed to the caller so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn empty_lines(&self) -> u64 {
        self.empty_lines
    }

    fn stash(&mut self, bytes: &[u8]) -> Result<()> {
        // One spare byte for a `\r` whose `\n` is still in the next chunk.
        if self.carry.len() + bytes.len() > self.max_line_len + 1 {
            return Err(ProcessingError::LineTooLong {
                line: self.line_number + 1,
                limit: self.max_line_len,
            });
        }
        self.carry.extend_from_slice(bytes);
        Ok(())
    }

    fn emit_carry<F>(&mut self, on_line: &mut F) -> Result<()>
    where
        F: FnMut(u64, &[u8]) -> Result<()>,
    {
        // Taken out so `emit` can borrow self mutably; the allocation is reused.
        let mut carry = std::mem::take(&mut self.carry);
        let result = self.emit(&carry, on_line);
        carry.clear();
        self.carry = carry;
        result
    }

    #[inline]
    fn emit<F>(&mut self, line: &[u8], on_line: &mut F) -> Result<()>
    where
        F: FnMut(u64, &[u8]) -> Result<()>,
    {
        self.line_number += 1;

        let line = match line.split_last() {
            Some((b'\r', head)) => head,
            _ => line,
        };

        if line.len() > self.max_line_len {
            return Err(ProcessingError::LineTooLong {
                line: self.line_number,
                limit: self.max_line_len,
            });
        }

        if line.is_empty() {
            self.empty_lines += 1;
            return Ok(());
        }

        self.records += 1;
        on_line(self.line_number, line)
    }
}
