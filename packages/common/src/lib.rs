pub mod cw;
pub mod serde;
