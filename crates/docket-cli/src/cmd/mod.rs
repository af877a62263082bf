pub mod completions;
pub mod create;
pub mod dashboard;
pub mod export;
pub mod history;
pub mod import;
pub mod init;
pub mod list;
pub mod reminders;
pub mod show;
pub mod stats;
pub mod upcoming;
pub mod update;
pub mod users;
pub mod watch;
