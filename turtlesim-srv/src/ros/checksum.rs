//! ROS1 md5sums

use md5::{Digest, Md5};

/// Lowercase hex md5 digest of `text`.
pub fn md5_hex(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}
