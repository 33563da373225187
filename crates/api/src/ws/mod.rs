pub mod handler;
pub mod manager;

pub use handler::ws_handler;
pub use manager::WsManager;
