pub(crate) mod serde;
#[cfg(feature = "tower")]
pub(crate) mod tower;
