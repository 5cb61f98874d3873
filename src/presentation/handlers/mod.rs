pub mod offline_handler;

pub use offline_handler::OfflineHandler;
