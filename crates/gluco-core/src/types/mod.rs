//! Domain types for the forecasting service.

mod forecast;
mod window;

pub use forecast::Forecast;
pub use window::ReadingWindow;
