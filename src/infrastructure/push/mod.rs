mod http;

pub use http::HttpPushGateway;
