pub mod callback_data;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod keyboards;
pub mod render;
pub mod state;
pub mod wizard;
