pub mod convert;
pub mod rates;
pub mod search;
pub mod setup;
pub mod ui;
