#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `linediff` is the line-level diff primitive of the oxvcs workspace. It
//! splits two byte buffers into line records, computes a shortest edit
//! script between them, and emits the result as unified-diff hunks through
//! a caller-supplied callback.
//!
//! # Design
//!
//! The output interface is deliberately low-level: the callback receives
//! *buffer batches*, slices of one to three byte spans, and interprets them
//! by arity —
//!
//! - **1 buffer**: a hunk header line (`@@ -a,b +c,d @@` plus newline);
//! - **2 buffers**: an origin byte (`' '`, `'+'`, or `'-'`) and the line
//!   payload;
//! - **3 buffers**: additionally the end-of-file-newline marker
//!   ([`NO_NEWLINE_MARKER`]), emitted when the payload is the final record
//!   of its side and does not end in a newline.
//!
//! Higher layers demultiplex the batches into their own event model. The
//! callback returns a `Result`; the first error unwinds the emitter
//! immediately, which is also the cancellation channel.
//!
//! Comparison behavior is tuned through [`DiffParams`] (whitespace
//! handling, see [`CompareFlags`]) and hunk shaping through [`EmitConfig`]
//! (context lines, inter-hunk gap coalescing).
//!
//! # Examples
//!
//! ```
//! use linediff::{diff, DiffParams, EmitConfig};
//!
//! let mut output = Vec::new();
//! diff(
//!     b"a\nb\n",
//!     b"a\nc\n",
//!     &DiffParams::default(),
//!     &EmitConfig::default(),
//!     |bufs| -> Result<(), ()> {
//!         for buf in bufs {
//!             output.extend_from_slice(buf);
//!         }
//!         Ok(())
//!     },
//! )
//! .unwrap();
//!
//! let text = String::from_utf8(output).unwrap();
//! assert!(text.starts_with("@@ -1,2 +1,2 @@\n"));
//! assert!(text.contains("-b\n"));
//! assert!(text.contains("+c\n"));
//! ```

mod emit;
mod myers;
mod record;

pub use crate::emit::{diff, DiffParams, EmitConfig, NO_NEWLINE_MARKER};
pub use crate::record::CompareFlags;
