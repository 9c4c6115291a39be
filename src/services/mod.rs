pub mod file_service;
pub mod metadata;
pub mod notifier;
pub mod scanner;
pub mod storage;
