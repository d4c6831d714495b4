//! Promotion types

mod percent_discount;
mod second_half_price;
mod third_one_free;

pub use percent_discount::PercentDiscountPromotion;
pub use second_half_price::SecondHalfPricePromotion;
pub use third_one_free::ThirdOneFreePromotion;
