//! Maps UI service errors to bear_core::AppError for consistent user-facing messages.

mod frontend;
