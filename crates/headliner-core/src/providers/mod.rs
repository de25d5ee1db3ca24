// Provider implementations backed by real HTTP APIs
pub mod newsapi;

pub use newsapi::NewsApiProvider;
