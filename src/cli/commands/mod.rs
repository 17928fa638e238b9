pub mod generate;
mod helper;
pub mod init;
pub mod inject;
