pub mod error;
pub mod consts;
pub mod frame;
pub mod store;
pub mod session;
pub mod matching;
pub mod scoring;
pub mod recommend;
pub mod aggregate;
