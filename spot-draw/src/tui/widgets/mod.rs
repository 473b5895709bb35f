// TUI widget modules for each dashboard panel and overlay.

pub mod conflicts;
pub mod form;
pub mod notice_bar;
pub mod participants;
pub mod quit_confirm;
pub mod spots;
pub mod status_bar;
