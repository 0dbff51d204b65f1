//! Value indicators based on fundamental valuation metrics.
//!
//! - Book-to-price: book value of equity relative to market value

mod book_to_price;

pub use book_to_price::{BookToPrice, BookToPriceConfig};
