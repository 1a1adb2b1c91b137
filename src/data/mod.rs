pub mod bar;
pub mod loader;
pub mod series;

pub use bar::PriceBar;
pub use loader::load_csv;
pub use series::PriceSeries;
