pub mod add;
pub mod delete;
pub mod init;
pub mod read;
