mod consumer;

pub use consumer::EventConsumer;
