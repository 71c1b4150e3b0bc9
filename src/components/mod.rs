pub mod auth_shell;
pub mod flowchart;
pub mod production;
pub mod report_dialog;
pub mod toast;
