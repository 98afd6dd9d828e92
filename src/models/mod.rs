// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data model and session state.

pub mod annotation;
pub mod session;
pub mod store;
