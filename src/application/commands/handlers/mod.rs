//! Command Handlers

mod auth_handlers;
mod book_handlers;

pub use auth_handlers::{LoginOrRegisterHandler, LoginResponse, LogoutHandler, LogoutResponse};
pub use book_handlers::{
    DeleteBookHandler, GenerateBookHandler, GenerateBookResponse, PipelineError, PipelineStage,
};
