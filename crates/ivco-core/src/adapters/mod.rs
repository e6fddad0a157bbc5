mod fmp;

pub use fmp::{FmpFetcher, FMP_API_KEY_ENV, FMP_BASE_URL};
