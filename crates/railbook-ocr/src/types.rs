// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the recognition backend.

use serde::{Deserialize, Serialize};

/// Request body: the challenge image as unpadded base64url.
#[derive(Debug, Clone, Serialize)]
pub struct OcrRequest {
    pub base64_str: String,
}

/// Response body: the recognized text.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrResponse {
    pub data: String,
}
