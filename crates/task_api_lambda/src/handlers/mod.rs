pub mod dispatch;
pub mod processors;
