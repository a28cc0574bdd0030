pub mod headers;
pub mod panels;
pub mod plot;
