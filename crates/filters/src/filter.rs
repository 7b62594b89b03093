//! The filter trait and built-in implementations.

use std::fmt;

use crate::{FilterDirection, FilterResult};

/// A byte transformation between working-tree and canonical form.
///
/// Implementations must be pure with respect to their input: the same
/// bytes and direction always produce the same output, and applying the
/// opposite direction to the result restores an equivalent form.
pub trait ContentFilter: fmt::Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Transforms `input` in the given direction.
    fn apply(&self, input: &[u8], direction: FilterDirection) -> FilterResult<Vec<u8>>;
}

/// Line-ending normalization: CRLF on disk, LF in storage.
///
/// Lone carriage returns are left untouched in both directions; only the
/// two-byte CRLF sequence is rewritten toward storage, and only bare LF
/// grows a CR toward the working tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrlfToLf;

impl ContentFilter for CrlfToLf {
    fn name(&self) -> &str {
        "crlf"
    }

    fn apply(&self, input: &[u8], direction: FilterDirection) -> FilterResult<Vec<u8>> {
        let mut out = Vec::with_capacity(input.len());
        match direction {
            FilterDirection::ToObjectDatabase => {
                let mut i = 0;
                while i < input.len() {
                    if input[i] == b'\r' && input.get(i + 1) == Some(&b'\n') {
                        out.push(b'\n');
                        i += 2;
                    } else {
                        out.push(input[i]);
                        i += 1;
                    }
                }
            }
            FilterDirection::ToWorkingTree => {
                let mut prev = 0u8;
                for &byte in input {
                    if byte == b'\n' && prev != b'\r' {
                        out.push(b'\r');
                    }
                    out.push(byte);
                    prev = byte;
                }
            }
        }
        Ok(out)
    }
}
