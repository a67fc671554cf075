mod handler;

pub use handler::{health, index, not_found};
