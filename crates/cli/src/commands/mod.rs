pub mod catalog;
pub mod chat;
pub mod doctor;
pub mod init;
pub mod serve;
