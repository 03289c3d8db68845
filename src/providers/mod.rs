pub mod currencybeacon;

pub use currencybeacon::CurrencyBeaconProvider;
