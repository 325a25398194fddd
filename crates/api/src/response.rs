//! JSON envelope for every endpoint that answers with a body.
//!
//! Article form posts, deletes and uploads redirect instead.

use serde::Serialize;

/// `{ "data": T }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
