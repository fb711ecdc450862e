// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

pub mod a3m;
pub mod fasta;
pub mod file;
pub mod m8;
pub mod record;
