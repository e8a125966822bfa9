// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (text file).

pub mod file_store;

pub use file_store::FeedbackStore;
