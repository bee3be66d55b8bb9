pub mod bootstrap;
pub mod config;
#[cfg(feature = "render")]
pub mod font;
#[cfg(feature = "render")]
pub mod icon_gen;
