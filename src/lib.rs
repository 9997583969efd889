#[macro_use]
pub mod macros;

pub mod api;
pub mod cache;
pub mod chrono_util;
pub mod collector;
pub mod config;
pub mod fs_json_util;
pub mod merge;
pub mod normalize;
pub mod schema;
pub mod wiki;
