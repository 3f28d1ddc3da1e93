// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only tree construction and markup insertion can fail. A missing container
//! or a stale handle is not an error: the affected render, measurement, or
//! toggle is skipped.

use alloc::string::String;

/// Errors surfaced by tree construction and rendering.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// A child built against a different template set was inserted into a tree.
    #[error("child at index {index} does not share the tree's templates")]
    InvalidChild {
        /// Index the child was inserted at.
        index: usize,
    },
    /// Insert position past the end of the children.
    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of children.
        len: usize,
    },
    /// The rendering target refused the generated markup.
    #[error("markup rejected: {0}")]
    Markup(#[from] MarkupError),
}

/// Errors produced while parsing markup into a [`Surface`](crate::surface::Surface).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// The reader rejected the input, for example an unterminated tag or an unknown entity.
    #[error("syntax error at byte {offset}: {reason}")]
    Syntax {
        /// Byte offset reported by the reader.
        offset: u64,
        /// Reader's description of the problem.
        reason: String,
    },
    /// A duplicated or unparsable attribute.
    #[error("malformed attribute at byte {offset}")]
    MalformedAttribute {
        /// Byte offset of the enclosing tag.
        offset: u64,
    },
    /// A closing tag with nothing open.
    #[error("unexpected closing tag </{tag}>")]
    UnexpectedClose {
        /// Tag name of the closing tag.
        tag: String,
    },
    /// A closing tag that does not match the innermost open element.
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedClose {
        /// Innermost open tag.
        expected: String,
        /// Closing tag found.
        found: String,
    },
    /// Input ended with elements still open.
    #[error("unclosed <{tag}>")]
    Unclosed {
        /// Innermost open tag.
        tag: String,
    },
}
