//! Domain logic for the stockqr article service.
//!
//! Nothing in this crate touches the database or HTTP: it holds the QR
//! field vocabulary, the payload builder and parser, the PNG codec and the
//! interchange directory used for manual download / upload of QR images.

pub mod error;
pub mod interchange;
pub mod qr_codec;
pub mod qr_field;
pub mod qr_payload;
pub mod types;
