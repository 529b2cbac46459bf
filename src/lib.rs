pub mod config;
pub mod daily;
pub mod export;
pub mod provider;
pub mod session;
pub mod storage;
pub mod vocab;
