mod trade;
mod window;

pub use trade::{ParseError, TradeRecord};
pub use window::TradeWindow;
