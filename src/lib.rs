pub use util::*;

#[macro_use]
pub mod util;

solutions![(y2022, [d12, d16, d17, d19, d24])];
