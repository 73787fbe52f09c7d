pub mod analyzers;
pub mod catalog;
pub mod fetch;
pub mod filters;
pub mod model;
pub mod output;
pub mod responses;
pub mod store;
