pub mod blocker;
pub mod help_window;
pub mod logging;
pub mod settings;
pub mod win_util;
