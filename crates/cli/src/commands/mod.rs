pub mod check;
pub mod dump;
pub mod init;
pub mod list;
