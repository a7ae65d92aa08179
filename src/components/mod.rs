pub mod app;
pub mod hud_panel;
pub mod pan_controls;
pub mod settings_modal;
