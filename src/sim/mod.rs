pub mod action;
pub mod clock;
pub mod event;
pub mod state;
pub mod transition;
pub mod view;
