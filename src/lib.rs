pub mod catalog;
pub mod error;
pub mod gui;
pub mod model;
pub mod preview;
pub mod rig;
