// Library crate: the editor core (store, parser, dispatch) behind the
// headless driver and integration tests.

pub mod command;
pub mod dispatch;
pub mod fixtures;
pub mod measure;
pub mod parser;
pub mod registry;
pub mod state;
