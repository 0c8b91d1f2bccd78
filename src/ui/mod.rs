/// UI module exports
pub mod components;
pub mod dashboard;
pub mod popup;
pub mod recommendations;
