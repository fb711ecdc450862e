// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use msafetch::errors::MsaFetchError;

fn main() -> Result<(), MsaFetchError> {
    msafetch::run()
}
