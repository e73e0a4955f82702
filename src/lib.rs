//! petquest - guided terminal walkthrough of the pet/account API
//!
//! The wizard core lives in [`wizard`]; [`api`] carries requests to the
//! server and [`ui`] / [`app`] drive the interactive terminal front end.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod ui;
pub mod wizard;
