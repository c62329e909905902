pub mod analysis;
pub mod chat;
pub mod design;
pub mod session;
pub mod summary;
