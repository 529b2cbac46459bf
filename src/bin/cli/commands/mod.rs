pub mod assist;
pub mod daily;
pub mod export;
pub mod generate;
pub mod library;
pub mod progress;
