pub mod frontend_service;

pub use frontend_service::{
    request_submit, request_submit_at, request_tropical, FrontendError, FrontendMessage,
};
