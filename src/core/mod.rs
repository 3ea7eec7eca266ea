pub mod assembler;
pub mod cache_key;
pub mod house_cache;
pub mod houses;
pub mod time;
pub mod validator;
pub mod zodiac;

pub use crate::domain::model::{BirthEvent, NatalChartRecord, RawBirthEvent};
pub use crate::domain::ports::{CacheStore, EphemerisPort, HouseSystemPort};
pub use crate::utils::error::Result;
