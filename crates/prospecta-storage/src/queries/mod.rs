// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, grouped by table.

pub mod calls;
pub mod campaigns;
pub mod leads;
pub mod pipeline;
pub mod sessions;
