pub mod prompt;
pub mod response;
pub mod retry;
pub mod service;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{BirthRecord, FortuneType, InterpretationRequest, InterpretationResult};
pub use crate::domain::ports::{Backoff, ChatClient};
pub use crate::utils::error::Result;
