//! Currency codes and conversion into the company's base currency.

pub mod conversion;

#[cfg(test)]
mod props;

pub use conversion::{
    AMOUNT_LIMIT, BASE_AMOUNT_SCALE, RATE_LIMIT, RATE_SCALE, convert_amount, is_storable_amount,
    is_storable_rate, normalize_code, to_base,
};
