pub mod add;
pub mod audit_cmd;
pub mod delete;
pub mod edit;
pub mod export_cmd;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod show;
