// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters binding the resize watcher to async runtimes.
//!
//! Enabled via feature flags to keep the core small and `no_std` by default.

#[cfg(feature = "tokio")]
pub mod tokio;
