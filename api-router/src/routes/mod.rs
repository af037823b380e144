pub mod chat;
pub mod home;
pub mod model;
pub mod upload;
