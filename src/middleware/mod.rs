// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules.

pub mod error_path;
pub mod security;

pub use error_path::add_error_path;
pub use security::add_security_headers;
